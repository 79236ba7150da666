use num_enum::TryFromPrimitive;

/// SMPP v3.4 data_coding values (Section 5.2.19) and the text encoding
/// name each one stands for.
///
/// The names are the strings accepted by the codec registry; a message with
/// an explicit `encoding` must name one of these (or a caller override) so
/// the matching byte can be emitted on the wire. Value 0 doubles as "SMSC
/// default", which is why an Sm encoded with the session default encoding
/// carries `data_coding = 0` rather than the default's own value.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataCoding {
    /// GSM 03.38 default alphabet (also the SMSC-default marker).
    Gsm0338 = 0b0000_0000,
    /// IA5/ASCII.
    Ascii = 0b0000_0001,
    /// 8-bit binary, octet stream left uninterpreted.
    OctetUnspecified = 0b0000_0010,
    /// ISO-8859-1.
    Latin1 = 0b0000_0011,
    /// 8-bit binary (duplicate assignment in the protocol table).
    OctetUnspecifiedCommon = 0b0000_0100,
    /// JIS X 0208-1990.
    ShiftJis = 0b0000_0101,
    /// ISO-8859-5 Cyrillic.
    Cyrillic = 0b0000_0110,
    /// ISO-8859-8 Latin/Hebrew.
    LatinHebrew = 0b0000_0111,
    /// UCS-2 (ISO/IEC-10646), carried as UTF-16BE.
    Ucs2 = 0b0000_1000,
    /// Pictogram encoding.
    Pictogram = 0b0000_1001,
    /// ISO-2022-JP music codes.
    Iso2022Jp = 0b0000_1010,
    /// KS C 5601 Korean.
    EucKr = 0b0000_1110,
}

impl DataCoding {
    /// Registry name of this coding.
    pub fn encoding_name(self) -> &'static str {
        match self {
            DataCoding::Gsm0338 => "gsm0338",
            DataCoding::Ascii => "ascii",
            DataCoding::OctetUnspecified => "octet_unspecified",
            DataCoding::Latin1 => "latin_1",
            DataCoding::OctetUnspecifiedCommon => "octet_unspecified_common",
            DataCoding::ShiftJis => "shift_jis",
            DataCoding::Cyrillic => "iso8859_5",
            DataCoding::LatinHebrew => "iso8859_8",
            DataCoding::Ucs2 => "ucs2",
            DataCoding::Pictogram => "pictogram",
            DataCoding::Iso2022Jp => "iso2022_jp",
            DataCoding::EucKr => "euc_kr",
        }
    }

    /// Inverse of [`encoding_name`](Self::encoding_name).
    pub fn from_encoding_name(name: &str) -> Option<Self> {
        match name {
            "gsm0338" => Some(DataCoding::Gsm0338),
            "ascii" => Some(DataCoding::Ascii),
            "octet_unspecified" => Some(DataCoding::OctetUnspecified),
            "latin_1" => Some(DataCoding::Latin1),
            "octet_unspecified_common" => Some(DataCoding::OctetUnspecifiedCommon),
            "shift_jis" => Some(DataCoding::ShiftJis),
            "iso8859_5" => Some(DataCoding::Cyrillic),
            "iso8859_8" => Some(DataCoding::LatinHebrew),
            "ucs2" => Some(DataCoding::Ucs2),
            "pictogram" => Some(DataCoding::Pictogram),
            "iso2022_jp" => Some(DataCoding::Iso2022Jp),
            "euc_kr" => Some(DataCoding::EucKr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_mapping_is_symmetric() {
        for value in 0u8..=0x0E {
            if let Ok(coding) = DataCoding::try_from(value) {
                assert_eq!(
                    DataCoding::from_encoding_name(coding.encoding_name()),
                    Some(coding)
                );
            }
        }
    }

    #[test]
    fn ucs2_is_eight() {
        assert_eq!(DataCoding::Ucs2 as u8, 0x08);
        assert_eq!(DataCoding::from_encoding_name("ucs2"), Some(DataCoding::Ucs2));
    }

    #[test]
    fn reserved_bytes_fail() {
        assert!(DataCoding::try_from(0x0Bu8).is_err());
        assert!(DataCoding::try_from(0xF0u8).is_err());
    }
}
