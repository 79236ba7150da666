use crate::codec::{CodecError, PduHeader, pack_pdu};
use crate::datatypes::{CommandId, CommandStatus};
use bytes::Bytes;

/// unbind (Section 4.2.1): orderly session teardown. Header only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unbind {
    pub sequence_number: u32,
}

impl Unbind {
    pub fn new(sequence_number: u32) -> Self {
        Self { sequence_number }
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        Ok(pack_pdu(
            CommandId::Unbind,
            CommandStatus::Ok,
            self.sequence_number,
            &[],
        ))
    }

    pub(crate) fn from_pdu(header: &PduHeader) -> Self {
        Self {
            sequence_number: header.sequence_number,
        }
    }
}

/// unbind_resp (Section 4.2.2). Header only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnbindResp {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
}

impl UnbindResp {
    pub fn new(sequence_number: u32, command_status: CommandStatus) -> Self {
        Self {
            sequence_number,
            command_status,
        }
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        Ok(pack_pdu(
            CommandId::UnbindResp,
            self.command_status,
            self.sequence_number,
            &[],
        ))
    }

    pub(crate) fn from_pdu(header: &PduHeader) -> Self {
        Self {
            sequence_number: header.sequence_number,
            command_status: header.command_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_header;

    #[test]
    fn round_trip() {
        let unbind = Unbind::new(12);
        let header = parse_header(&unbind.to_pdu().unwrap()).unwrap();
        assert_eq!(Unbind::from_pdu(&header), unbind);

        let resp = UnbindResp::new(12, CommandStatus::Ok);
        let header = parse_header(&resp.to_pdu().unwrap()).unwrap();
        assert_eq!(UnbindResp::from_pdu(&header), resp);
    }
}
