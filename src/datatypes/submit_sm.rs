use crate::codec::{
    CodecError, PDU_HEADER_LENGTH, PduHeader, check_ascii, get_c_octet_string, pack_pdu,
    put_c_octet_string,
};
use crate::datatypes::{CommandId, CommandStatus, Sm};
use crate::encoding::CodecRegistry;
use bytes::{Bytes, BytesMut};
use std::io::Cursor;

/// submit_sm (Section 4.4.1): an ESME handing a short message to the SMSC.
///
/// `log_id` and `extra_data` are correlation handles for the layers above
/// the codec; they never reach the wire. `log_id` is mandatory because a
/// submission that cannot be correlated with its response is useless to
/// the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub sequence_number: u32,
    pub sm: Sm,
    pub log_id: String,
    pub extra_data: String,
}

impl SubmitSm {
    pub fn new(
        mut sm: Sm,
        sequence_number: u32,
        log_id: impl Into<String>,
        extra_data: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let log_id = log_id.into();
        if log_id.is_empty() {
            return Err(CodecError::InvalidParameter {
                field: "log_id",
                reason: "log_id cannot be empty".into(),
            });
        }
        if sm.esm_class == 0 {
            // Store-and-forward with default messaging mode.
            sm.esm_class = 0b0000_0011;
        }
        sm.validate()?;
        Ok(Self {
            sequence_number,
            sm,
            log_id,
            extra_data: extra_data.into(),
        })
    }

    pub fn to_pdu(&self, codecs: &CodecRegistry) -> Result<Bytes, CodecError> {
        let body = self.sm.to_body(codecs)?;
        Ok(pack_pdu(
            CommandId::SubmitSm,
            CommandStatus::Ok,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(
        pdu: &[u8],
        header: &PduHeader,
        codecs: &CodecRegistry,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            sequence_number: header.sequence_number,
            sm: Sm::from_body(pdu, header, codecs)?,
            log_id: String::new(),
            extra_data: String::new(),
        })
    }
}

/// submit_sm_resp (Section 4.4.2): the SMSC's message id for a submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResp {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
    pub message_id: String,
    pub log_id: String,
    pub extra_data: String,
}

impl SubmitSmResp {
    pub fn new(
        sequence_number: u32,
        command_status: CommandStatus,
        message_id: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let message_id = message_id.into();
        check_ascii(&message_id, "message_id")?;
        Ok(Self {
            sequence_number,
            command_status,
            message_id,
            log_id: String::new(),
            extra_data: String::new(),
        })
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        check_ascii(&self.message_id, "message_id")?;
        let mut body = BytesMut::new();
        put_c_octet_string(&mut body, &self.message_id);
        Ok(pack_pdu(
            CommandId::SubmitSmResp,
            self.command_status,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(pdu: &[u8], header: &PduHeader) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(pdu);
        buf.set_position(PDU_HEADER_LENGTH as u64);
        let message_id = get_c_octet_string(&mut buf, "message_id")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            command_status: header.command_status,
            message_id,
            log_id: String::new(),
            extra_data: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_header;
    use crate::datatypes::PhoneNumber;

    fn sample_sm() -> Sm {
        Sm {
            short_message: "hello".into(),
            source: PhoneNumber::international("41791112233").unwrap(),
            destination: PhoneNumber::international("41794445566").unwrap(),
            ..Sm::default()
        }
    }

    #[test]
    fn log_id_is_mandatory() {
        let err = SubmitSm::new(sample_sm(), 1, "", "").unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidParameter { field: "log_id", .. }
        ));
    }

    #[test]
    fn new_applies_the_submit_esm_default() {
        let submit = SubmitSm::new(sample_sm(), 1, "log-1", "").unwrap();
        assert_eq!(submit.sm.esm_class, 0b0000_0011);
    }

    #[test]
    fn response_round_trip() {
        let resp = SubmitSmResp::new(9, CommandStatus::Ok, "msg-123").unwrap();
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(header.pdu_length as usize, pdu.len());
        assert_eq!(header.command_id, CommandId::SubmitSmResp);
        let decoded = SubmitSmResp::from_pdu(&pdu, &header).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn error_response_keeps_its_status() {
        let resp = SubmitSmResp::new(10, CommandStatus::ThrottlingError, "").unwrap();
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(header.command_status, CommandStatus::ThrottlingError);
    }
}
