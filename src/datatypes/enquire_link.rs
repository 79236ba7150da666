use crate::codec::{CodecError, PduHeader, pack_pdu};
use crate::datatypes::{CommandId, CommandStatus};
use bytes::Bytes;

/// enquire_link (Section 4.11.1): the keepalive probe. Header only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnquireLink {
    pub sequence_number: u32,
}

impl EnquireLink {
    pub fn new(sequence_number: u32) -> Self {
        Self { sequence_number }
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        Ok(pack_pdu(
            CommandId::EnquireLink,
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

/// enquire_link_resp (Section 4.11.2). Header only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnquireLinkResp {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
}

impl EnquireLinkResp {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            sequence_number,
            command_status: CommandStatus::Ok,
        }
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        Ok(pack_pdu(
            CommandId::EnquireLinkResp,
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
    fn header_only_round_trip() {
        let probe = EnquireLink::new(77);
        let pdu = probe.to_pdu().unwrap();
        assert_eq!(pdu.len(), 16);
        let header = parse_header(&pdu).unwrap();
        assert_eq!(EnquireLink::from_pdu(&header), probe);

        let resp = EnquireLinkResp::new(77);
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(EnquireLinkResp::from_pdu(&header), resp);
    }
}
