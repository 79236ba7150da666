use crate::codec::{CodecError, PduHeader, pack_pdu};
use crate::datatypes::{CommandId, CommandStatus};
use bytes::Bytes;

/// generic_nack (Section 4.3.1): rejects a PDU that could not be handled as
/// any specific command. Header only; the status says what went wrong.
///
/// Carries `log_id`/`extra_data` so a nack triggered by one of our own
/// requests can be routed back to its originator. Neither is serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericNack {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
    pub log_id: String,
    pub extra_data: String,
}

impl GenericNack {
    pub fn new(sequence_number: u32, command_status: CommandStatus) -> Self {
        Self {
            sequence_number,
            command_status,
            log_id: String::new(),
            extra_data: String::new(),
        }
    }
}

impl Default for GenericNack {
    fn default() -> Self {
        Self::new(0, CommandStatus::UnknownError)
    }
}

impl GenericNack {
    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        Ok(pack_pdu(
            CommandId::GenericNack,
            self.command_status,
            self.sequence_number,
            &[],
        ))
    }

    pub(crate) fn from_pdu(header: &PduHeader) -> Self {
        Self {
            sequence_number: header.sequence_number,
            command_status: header.command_status,
            log_id: String::new(),
            extra_data: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_header;

    #[test]
    fn defaults_to_unknown_error() {
        assert_eq!(GenericNack::default().command_status, CommandStatus::UnknownError);
    }

    #[test]
    fn round_trip_ignores_tracking_fields() {
        let mut nack = GenericNack::new(31, CommandStatus::InvalidCommandId);
        nack.log_id = "req-7".into();
        let pdu = nack.to_pdu().unwrap();
        assert_eq!(pdu.len(), 16, "tracking fields must not be serialized");
        let header = parse_header(&pdu).unwrap();
        let decoded = GenericNack::from_pdu(&header);
        assert_eq!(decoded.command_status, CommandStatus::InvalidCommandId);
        assert_eq!(decoded.log_id, "");
    }
}
