use crate::codec::{CodecError, get_octet_string, get_u8, get_u16, get_u32};
use bytes::{BufMut, BytesMut};
use num_enum::TryFromPrimitive;
use std::io::Cursor;

/// SMPP v3.4 optional parameter tags (Section 5.3.2).
///
/// The tag set is closed: a PDU carrying a tag outside this table fails to
/// decode. Each tag declares the kind (and for integers, the width) of its
/// value, which drives both serialization and parsing.
#[derive(TryFromPrimitive)]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionalTag {
    DestAddrSubunit = 0x0005,
    DestNetworkType = 0x0006,
    DestBearerType = 0x0007,
    DestTelematicsId = 0x0008,
    SourceAddrSubunit = 0x000D,
    SourceNetworkType = 0x000E,
    SourceBearerType = 0x000F,
    SourceTelematicsId = 0x0010,
    QosTimeToLive = 0x0017,
    PayloadType = 0x0019,
    AdditionalStatusInfoText = 0x001D,
    ReceiptedMessageId = 0x001E,
    MsMsgWaitFacilities = 0x0030,
    PrivacyIndicator = 0x0201,
    SourceSubaddress = 0x0202,
    DestSubaddress = 0x0203,
    UserMessageReference = 0x0204,
    UserResponseCode = 0x0205,
    SourcePort = 0x020A,
    DestinationPort = 0x020B,
    SarMsgRefNum = 0x020C,
    LanguageIndicator = 0x020D,
    SarTotalSegments = 0x020E,
    SarSegmentSeqnum = 0x020F,
    ScInterfaceVersion = 0x0210,
    CallbackNumPresInd = 0x0302,
    CallbackNumAtag = 0x0303,
    NumberOfMessages = 0x0304,
    CallbackNum = 0x0381,
    DpfResult = 0x0420,
    SetDpf = 0x0421,
    MsAvailabilityStatus = 0x0422,
    NetworkErrorCode = 0x0423,
    MessagePayload = 0x0424,
    DeliveryFailureReason = 0x0425,
    MoreMessagesToSend = 0x0426,
    MessageState = 0x0427,
    UssdServiceOp = 0x0501,
    DisplayTime = 0x1201,
    SmsSignal = 0x1203,
    MsValidity = 0x1204,
    AlertOnMessageDelivery = 0x130C,
    ItsReplyType = 0x1380,
    ItsSessionInfo = 0x1383,
}

/// Kind of value a tag carries on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Unsigned big-endian integer; the width in octets is fixed per tag.
    Int(usize),
    /// Zero-length parameter whose presence means "true".
    Bool,
    /// Raw octets, carried without a NUL terminator.
    Str,
}

impl OptionalTag {
    pub fn value_kind(self) -> ValueKind {
        use OptionalTag::*;
        match self {
            AdditionalStatusInfoText | ReceiptedMessageId | SourceSubaddress | DestSubaddress
            | CallbackNumAtag | CallbackNum | MessagePayload => ValueKind::Str,
            AlertOnMessageDelivery => ValueKind::Bool,
            QosTimeToLive => ValueKind::Int(4),
            // network_error_code is a 1-octet type plus a 2-octet code
            // (Section 5.3.2.31), carried here as one 3-octet integer.
            NetworkErrorCode => ValueKind::Int(3),
            DestTelematicsId | SourceTelematicsId | UserMessageReference | SourcePort
            | DestinationPort | SarMsgRefNum | SmsSignal | ItsSessionInfo => ValueKind::Int(2),
            _ => ValueKind::Int(1),
        }
    }
}

/// Value of an optional parameter, matching the tag's declared kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionalValue {
    Int(u32),
    Bool,
    Str(String),
}

/// A tag-length-value optional parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionalParam {
    pub tag: OptionalTag,
    pub value: OptionalValue,
}

impl OptionalParam {
    /// Builds a parameter, rejecting values that do not match the tag's
    /// declared kind or that cannot be represented in its wire format.
    pub fn new(tag: OptionalTag, value: OptionalValue) -> Result<Self, CodecError> {
        match (tag.value_kind(), &value) {
            (ValueKind::Int(width), OptionalValue::Int(int)) => {
                let max = match width {
                    1 => u32::from(u8::MAX),
                    2 => u32::from(u16::MAX),
                    3 => 0x00FF_FFFF,
                    _ => u32::MAX,
                };
                if *int > max {
                    return Err(CodecError::InvalidParameter {
                        field: "optional_params",
                        reason: format!("{tag:?} value {int} does not fit in {width} octet(s)"),
                    });
                }
            }
            (ValueKind::Bool, OptionalValue::Bool) => {}
            (ValueKind::Str, OptionalValue::Str(text)) => {
                if !text.is_ascii() {
                    return Err(CodecError::InvalidParameter {
                        field: "optional_params",
                        reason: format!("{tag:?} value must be ASCII"),
                    });
                }
                if text.len() > usize::from(u16::MAX) {
                    return Err(CodecError::InvalidParameter {
                        field: "optional_params",
                        reason: format!("{tag:?} value exceeds the 16-bit length field"),
                    });
                }
            }
            (kind, _) => {
                return Err(CodecError::InvalidParameter {
                    field: "optional_params",
                    reason: format!("{tag:?} requires a {kind:?} value"),
                });
            }
        }
        Ok(Self { tag, value })
    }

    /// Serializes `tag | length | value` onto the buffer.
    pub(crate) fn write(&self, buf: &mut BytesMut) {
        buf.put_u16(self.tag as u16);
        match (&self.value, self.tag.value_kind()) {
            (OptionalValue::Int(int), ValueKind::Int(width)) => {
                buf.put_u16(width as u16);
                match width {
                    1 => buf.put_u8(*int as u8),
                    2 => buf.put_u16(*int as u16),
                    3 => {
                        buf.put_u8((*int >> 16) as u8);
                        buf.put_u16(*int as u16);
                    }
                    _ => buf.put_u32(*int),
                }
            }
            (OptionalValue::Bool, _) => buf.put_u16(0),
            (OptionalValue::Str(text), _) => {
                buf.put_u16(text.len() as u16);
                buf.put_slice(text.as_bytes());
            }
            // new() keeps value and kind consistent; an Int value can only
            // be paired with an Int kind.
            (OptionalValue::Int(_), _) => unreachable!("int value with non-int tag"),
        }
    }

    /// Reads the tag and length of the next parameter. The caller decides
    /// how to consume the value (message_payload gets special treatment).
    pub(crate) fn read_header(buf: &mut Cursor<&[u8]>) -> Result<(OptionalTag, u16), CodecError> {
        let offset = buf.position() as usize;
        let raw_tag = get_u16(buf)?;
        let tag = OptionalTag::try_from(raw_tag)
            .map_err(|_| CodecError::UnknownOptionalTag { tag: raw_tag, offset })?;
        let length = get_u16(buf)?;
        Ok((tag, length))
    }

    /// Reads a value of `length` octets according to the tag's kind.
    pub(crate) fn read_value(
        tag: OptionalTag,
        length: u16,
        buf: &mut Cursor<&[u8]>,
    ) -> Result<Self, CodecError> {
        let value = match tag.value_kind() {
            ValueKind::Int(_) => OptionalValue::Int(match length {
                1 => u32::from(get_u8(buf)?),
                2 => u32::from(get_u16(buf)?),
                3 => (u32::from(get_u8(buf)?) << 16) | u32::from(get_u16(buf)?),
                4 => get_u32(buf)?,
                other => {
                    return Err(CodecError::InvalidParameter {
                        field: "optional_params",
                        reason: format!("{tag:?} has unsupported integer length {other}"),
                    });
                }
            }),
            // Zero-length on the wire; presence is the value.
            ValueKind::Bool => OptionalValue::Bool,
            ValueKind::Str => OptionalValue::Str(get_octet_string(buf, usize::from(length))?),
        };
        Ok(Self { tag, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(param: &OptionalParam) -> OptionalParam {
        let mut buf = BytesMut::new();
        param.write(&mut buf);
        let bytes = buf.freeze();
        let mut cursor = Cursor::new(bytes.as_ref());
        let (tag, length) = OptionalParam::read_header(&mut cursor).unwrap();
        OptionalParam::read_value(tag, length, &mut cursor).unwrap()
    }

    #[test]
    fn int_widths_follow_the_tag() {
        let one = OptionalParam::new(OptionalTag::MsValidity, OptionalValue::Int(1)).unwrap();
        let two = OptionalParam::new(OptionalTag::SmsSignal, OptionalValue::Int(0x1234)).unwrap();
        let four =
            OptionalParam::new(OptionalTag::QosTimeToLive, OptionalValue::Int(86_400)).unwrap();

        let mut buf = BytesMut::new();
        one.write(&mut buf);
        assert_eq!(buf.as_ref(), &[0x12, 0x04, 0x00, 0x01, 0x01]);

        assert_eq!(round_trip(&two), two);
        assert_eq!(round_trip(&four), four);
    }

    #[test]
    fn telematics_ids_are_two_octets() {
        let source =
            OptionalParam::new(OptionalTag::SourceTelematicsId, OptionalValue::Int(300)).unwrap();
        let mut buf = BytesMut::new();
        source.write(&mut buf);
        assert_eq!(buf.as_ref(), &[0x00, 0x10, 0x00, 0x02, 0x01, 0x2C]);
        assert_eq!(round_trip(&source), source);

        let dest =
            OptionalParam::new(OptionalTag::DestTelematicsId, OptionalValue::Int(300)).unwrap();
        assert_eq!(round_trip(&dest), dest);
    }

    #[test]
    fn network_error_code_is_three_binary_octets() {
        // Error type 0x03 (GSM), error code 0x0108.
        let param =
            OptionalParam::new(OptionalTag::NetworkErrorCode, OptionalValue::Int(0x0003_0108))
                .unwrap();
        let mut buf = BytesMut::new();
        param.write(&mut buf);
        assert_eq!(buf.as_ref(), &[0x04, 0x23, 0x00, 0x03, 0x03, 0x01, 0x08]);
        assert_eq!(round_trip(&param), param);

        assert!(
            OptionalParam::new(OptionalTag::NetworkErrorCode, OptionalValue::Int(0x0100_0000))
                .is_err(),
            "value must fit in three octets"
        );
    }

    #[test]
    fn bool_serializes_with_zero_length() {
        let param =
            OptionalParam::new(OptionalTag::AlertOnMessageDelivery, OptionalValue::Bool).unwrap();
        let mut buf = BytesMut::new();
        param.write(&mut buf);
        assert_eq!(buf.as_ref(), &[0x13, 0x0C, 0x00, 0x00]);
        assert_eq!(round_trip(&param), param);
    }

    #[test]
    fn string_carries_no_terminator() {
        let param = OptionalParam::new(
            OptionalTag::ReceiptedMessageId,
            OptionalValue::Str("msg-77".into()),
        )
        .unwrap();
        let mut buf = BytesMut::new();
        param.write(&mut buf);
        assert_eq!(&buf.as_ref()[..4], &[0x00, 0x1E, 0x00, 0x06]);
        assert_eq!(&buf.as_ref()[4..], b"msg-77");
        assert_eq!(round_trip(&param), param);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        assert!(OptionalParam::new(OptionalTag::MsValidity, OptionalValue::Str("1".into())).is_err());
        assert!(OptionalParam::new(OptionalTag::ReceiptedMessageId, OptionalValue::Bool).is_err());
        assert!(
            OptionalParam::new(OptionalTag::MsValidity, OptionalValue::Int(256)).is_err(),
            "one-octet tag cannot hold 256"
        );
    }

    #[test]
    fn unknown_tag_reports_offset() {
        let bytes = [0xAB, 0xCD, 0x00, 0x00];
        let mut cursor = Cursor::new(&bytes[..]);
        let err = OptionalParam::read_header(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownOptionalTag { tag: 0xABCD, offset: 0 }
        ));
    }
}
