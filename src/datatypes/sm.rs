use crate::codec::{
    CodecError, PDU_HEADER_LENGTH, PduHeader, check_ascii, get_c_octet_string, get_octets, get_u8,
    put_c_octet_string,
};
use crate::datatypes::{DataCoding, Npi, OptionalParam, OptionalTag, PhoneNumber, SmppTime, Ton};
use crate::encoding::{CodecRegistry, ErrorHandling};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// Longest text that fits the inline short_message field (Section 5.2.21).
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// The body shared by submit_sm and deliver_sm (Sections 4.4.1 and 4.6.1).
///
/// Exactly one of `short_message` and `message_payload` carries the text.
/// `short_message` goes out inline when its encoded form fits 254 octets;
/// `message_payload` always goes out as the 0x0424 TLV. With
/// `auto_message_payload` set, an oversized `short_message` is promoted to
/// the TLV instead of failing.
///
/// `encoding` names the text codec explicitly; when unset, encoding first
/// tries the registry default and falls back to UCS-2, and the wire
/// `data_coding` is 0 (SMSC default) or 8 respectively.
#[derive(Clone, Debug, PartialEq)]
pub struct Sm {
    pub short_message: String,
    pub message_payload: String,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
    pub service_type: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: Option<SmppTime>,
    pub validity_period: Option<SmppTime>,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub encoding: Option<String>,
    pub sm_default_msg_id: u8,
    pub optional_params: Vec<OptionalParam>,
    pub auto_message_payload: bool,
    pub error_handling: ErrorHandling,
}

impl Default for Sm {
    fn default() -> Self {
        Self {
            short_message: String::new(),
            message_payload: String::new(),
            source: PhoneNumber::default(),
            destination: PhoneNumber::default(),
            service_type: "CMT".to_string(),
            esm_class: 0,
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: None,
            validity_period: None,
            registered_delivery: 0b0000_0001,
            replace_if_present_flag: 0,
            encoding: None,
            sm_default_msg_id: 0,
            optional_params: Vec::new(),
            auto_message_payload: true,
            error_handling: ErrorHandling::Strict,
        }
    }
}

impl Sm {
    /// Checks the constructor preconditions that cannot be expressed in the
    /// type: one text source, no smuggled message_payload TLV, ASCII-only
    /// C-octet fields.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.short_message.is_empty() && self.message_payload.is_empty() {
            return Err(CodecError::InvalidParameter {
                field: "short_message",
                reason: "either short_message or message_payload must be set".into(),
            });
        }
        if !self.short_message.is_empty() && !self.message_payload.is_empty() {
            return Err(CodecError::InvalidParameter {
                field: "short_message",
                reason: "short_message and message_payload are mutually exclusive".into(),
            });
        }
        if self
            .optional_params
            .iter()
            .any(|param| param.tag == OptionalTag::MessagePayload)
        {
            return Err(CodecError::InvalidParameter {
                field: "optional_params",
                reason: "message_payload has a dedicated field and cannot appear as a TLV".into(),
            });
        }
        check_ascii(&self.service_type, "service_type")?;
        check_ascii(&self.source.number, "source")?;
        check_ascii(&self.destination.number, "destination")?;
        Ok(())
    }

    /// Encodes the message text, negotiating the codec per the encoding
    /// policy. Returns the octets and the wire data_coding value.
    fn encode_text(&self, codecs: &CodecRegistry) -> Result<(Vec<u8>, u8), CodecError> {
        let text = if self.short_message.is_empty() {
            &self.message_payload
        } else {
            &self.short_message
        };
        match &self.encoding {
            Some(name) => {
                let coding = DataCoding::from_encoding_name(name)
                    .ok_or_else(|| CodecError::UnknownEncoding(name.clone()))?;
                let encoded = codecs.resolve(name)?.encode(text, self.error_handling)?;
                Ok((encoded, coding as u8))
            }
            None => {
                let default = codecs.resolve(codecs.default_encoding())?;
                match default.encode(text, self.error_handling) {
                    // The default worked: data_coding 0 tells the peer to
                    // apply its own default, which the session agreed on.
                    Ok(encoded) => Ok((encoded, 0)),
                    Err(CodecError::EncodingFailure { .. }) => {
                        let encoded = codecs
                            .resolve("ucs2")?
                            .encode(text, self.error_handling)?;
                        Ok((encoded, DataCoding::Ucs2 as u8))
                    }
                    Err(other) => Err(other),
                }
            }
        }
    }

    /// Serializes the shared body (Section 4.4.1 field order).
    pub(crate) fn to_body(&self, codecs: &CodecRegistry) -> Result<BytesMut, CodecError> {
        self.validate()?;

        let (mut encoded_text, data_coding) = self.encode_text(codecs)?;
        let mut payload_text = Vec::new();
        if encoded_text.len() > MAX_SHORT_MESSAGE_LENGTH
            && !self.short_message.is_empty()
            && !self.auto_message_payload
        {
            return Err(CodecError::ShortMessageTooLong {
                length: encoded_text.len(),
            });
        }
        if encoded_text.len() > MAX_SHORT_MESSAGE_LENGTH || !self.message_payload.is_empty() {
            if encoded_text.len() > usize::from(u16::MAX) {
                return Err(CodecError::InvalidParameter {
                    field: "message_payload",
                    reason: format!(
                        "encoded payload is {} octets, exceeding the TLV length field",
                        encoded_text.len()
                    ),
                });
            }
            payload_text = std::mem::take(&mut encoded_text);
        }

        let mut body = BytesMut::new();
        put_c_octet_string(&mut body, &self.service_type);
        body.put_u8(self.source.ton as u8);
        body.put_u8(self.source.npi as u8);
        put_c_octet_string(&mut body, &self.source.number);
        body.put_u8(self.destination.ton as u8);
        body.put_u8(self.destination.npi as u8);
        put_c_octet_string(&mut body, &self.destination.number);
        body.put_u8(self.esm_class);
        body.put_u8(self.protocol_id);
        body.put_u8(self.priority_flag);
        put_c_octet_string(
            &mut body,
            &SmppTime::format_field(self.schedule_delivery_time.as_ref())?,
        );
        put_c_octet_string(&mut body, &SmppTime::format_field(self.validity_period.as_ref())?);
        body.put_u8(self.registered_delivery);
        body.put_u8(self.replace_if_present_flag);
        body.put_u8(data_coding);
        body.put_u8(self.sm_default_msg_id);
        body.put_u8(encoded_text.len() as u8);
        body.put_slice(&encoded_text);
        if !payload_text.is_empty() {
            body.put_u16(OptionalTag::MessagePayload as u16);
            body.put_u16(payload_text.len() as u16);
            body.put_slice(&payload_text);
        }
        // TLVs may appear in any order; emission order is not significant.
        for param in &self.optional_params {
            param.write(&mut body);
        }
        Ok(body)
    }

    /// Parses the shared body. `pdu` is the complete PDU; parsing starts
    /// after the header and stops at `header.pdu_length`.
    pub(crate) fn from_body(
        pdu: &[u8],
        header: &PduHeader,
        codecs: &CodecRegistry,
    ) -> Result<Sm, CodecError> {
        let mut buf = Cursor::new(pdu);
        buf.set_position(PDU_HEADER_LENGTH as u64);

        let service_type = get_c_octet_string(&mut buf, "service_type")?;
        let source_ton = read_ton(&mut buf)?;
        let source_npi = read_npi(&mut buf)?;
        let source = PhoneNumber {
            number: get_c_octet_string(&mut buf, "source_addr")?,
            ton: source_ton,
            npi: source_npi,
        };
        let dest_ton = read_ton(&mut buf)?;
        let dest_npi = read_npi(&mut buf)?;
        let destination = PhoneNumber {
            number: get_c_octet_string(&mut buf, "destination_addr")?,
            ton: dest_ton,
            npi: dest_npi,
        };
        let esm_class = get_u8(&mut buf)?;
        let protocol_id = get_u8(&mut buf)?;
        let priority_flag = get_u8(&mut buf)?;
        let schedule_delivery_time =
            SmppTime::parse(&get_c_octet_string(&mut buf, "schedule_delivery_time")?)?;
        let validity_period = SmppTime::parse(&get_c_octet_string(&mut buf, "validity_period")?)?;
        let registered_delivery = get_u8(&mut buf)?;
        let replace_if_present_flag = get_u8(&mut buf)?;
        let data_coding = get_u8(&mut buf)?;

        // data_coding 0 means the session default; anything else names the
        // codec for both short_message and a message_payload TLV.
        let (codec, encoding) = if data_coding == 0 {
            (codecs.resolve(codecs.default_encoding())?, None)
        } else {
            let coding = DataCoding::try_from(data_coding)
                .map_err(|_| CodecError::UnsupportedDataCoding(data_coding))?;
            let name = coding.encoding_name();
            (codecs.resolve(name)?, Some(name.to_string()))
        };

        let sm_default_msg_id = get_u8(&mut buf)?;
        let sm_length = get_u8(&mut buf)?;
        let short_message = codec.decode(get_octets(&mut buf, usize::from(sm_length))?)?;

        let mut message_payload = String::new();
        let mut optional_params = Vec::new();
        while (buf.position() as usize) < header.pdu_length as usize {
            let (tag, length) = OptionalParam::read_header(&mut buf)?;
            if tag == OptionalTag::MessagePayload {
                // Alternative carrier for the text, not a user-visible TLV.
                message_payload = codec.decode(get_octets(&mut buf, usize::from(length))?)?;
            } else {
                optional_params.push(OptionalParam::read_value(tag, length, &mut buf)?);
            }
        }

        let sm = Sm {
            short_message,
            message_payload,
            source,
            destination,
            service_type,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            encoding,
            sm_default_msg_id,
            optional_params,
            auto_message_payload: true,
            error_handling: ErrorHandling::Strict,
        };
        sm.validate()?;
        Ok(sm)
    }
}

fn read_ton(buf: &mut Cursor<&[u8]>) -> Result<Ton, CodecError> {
    let raw = get_u8(buf)?;
    Ton::try_from(raw).map_err(|_| CodecError::InvalidParameter {
        field: "ton",
        reason: format!("unknown type of number {raw:#04x}"),
    })
}

fn read_npi(buf: &mut Cursor<&[u8]>) -> Result<Npi, CodecError> {
    let raw = get_u8(buf)?;
    Npi::try_from(raw).map_err(|_| CodecError::InvalidParameter {
        field: "npi",
        reason: format!("unknown numbering plan {raw:#04x}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::OptionalValue;

    fn sample() -> Sm {
        Sm {
            short_message: "hello".into(),
            source: PhoneNumber::international("41791112233").unwrap(),
            destination: PhoneNumber::international("41794445566").unwrap(),
            ..Sm::default()
        }
    }

    #[test]
    fn both_text_sources_rejected() {
        let sm = Sm {
            message_payload: "also set".into(),
            ..sample()
        };
        assert!(sm.validate().is_err());
    }

    #[test]
    fn neither_text_source_rejected() {
        let sm = Sm {
            short_message: String::new(),
            ..sample()
        };
        assert!(sm.validate().is_err());
    }

    #[test]
    fn message_payload_tlv_cannot_be_supplied_directly() {
        let sm = Sm {
            optional_params: vec![OptionalParam {
                tag: OptionalTag::MessagePayload,
                value: OptionalValue::Str("sneaky".into()),
            }],
            ..sample()
        };
        assert!(sm.validate().is_err());
    }

    #[test]
    fn auto_encoding_falls_back_to_ucs2() {
        let codecs = CodecRegistry::default();
        let sm = Sm {
            short_message: "Здраво".into(), // not in the GSM alphabet
            ..sample()
        };
        let (encoded, data_coding) = sm.encode_text(&codecs).unwrap();
        assert_eq!(data_coding, DataCoding::Ucs2 as u8);
        assert_eq!(encoded.len(), 12);
    }

    #[test]
    fn explicit_encoding_does_not_fall_back() {
        let codecs = CodecRegistry::default();
        let sm = Sm {
            short_message: "Здраво".into(),
            encoding: Some("latin_1".into()),
            ..sample()
        };
        assert!(matches!(
            sm.encode_text(&codecs),
            Err(CodecError::EncodingFailure { .. })
        ));
    }
}
