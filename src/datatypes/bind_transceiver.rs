use crate::codec::{
    CodecError, PDU_HEADER_LENGTH, PduHeader, check_ascii, get_c_octet_string, get_u8, pack_pdu,
    put_c_octet_string,
};
use crate::datatypes::{
    CommandId, CommandStatus, Npi, OptionalParam, OptionalTag, OptionalValue, SMPP_VERSION_3_4,
    Ton,
};
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::io::Cursor;

/// bind_transceiver (Section 4.1.5): opens a session that both submits and
/// receives messages.
///
/// The `Debug` form is the logging projection of this PDU, and it always
/// prints `{REDACTED}` in place of the password; dump the field itself if
/// a credential is genuinely needed.
#[derive(Clone, PartialEq, Eq)]
pub struct BindTransceiver {
    pub sequence_number: u32,
    pub system_id: String,
    pub password: String,
    pub system_type: String,
    pub interface_version: u8,
    pub addr_ton: Ton,
    pub addr_npi: Npi,
    pub address_range: String,
}

impl BindTransceiver {
    pub fn new(
        sequence_number: u32,
        system_id: impl Into<String>,
        password: impl Into<String>,
        system_type: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let bind = Self {
            sequence_number,
            system_id: system_id.into(),
            password: password.into(),
            system_type: system_type.into(),
            interface_version: SMPP_VERSION_3_4,
            addr_ton: Ton::Unknown,
            addr_npi: Npi::Unknown,
            address_range: String::new(),
        };
        bind.validate()?;
        Ok(bind)
    }

    fn validate(&self) -> Result<(), CodecError> {
        check_ascii(&self.system_id, "system_id")?;
        check_ascii(&self.password, "password")?;
        check_ascii(&self.system_type, "system_type")?;
        check_ascii(&self.address_range, "address_range")
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        self.validate()?;
        let mut body = BytesMut::new();
        put_c_octet_string(&mut body, &self.system_id);
        put_c_octet_string(&mut body, &self.password);
        put_c_octet_string(&mut body, &self.system_type);
        body.extend_from_slice(&[
            self.interface_version,
            self.addr_ton as u8,
            self.addr_npi as u8,
        ]);
        put_c_octet_string(&mut body, &self.address_range);
        Ok(pack_pdu(
            CommandId::BindTransceiver,
            CommandStatus::Ok,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(pdu: &[u8], header: &PduHeader) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(pdu);
        buf.set_position(PDU_HEADER_LENGTH as u64);
        let system_id = get_c_octet_string(&mut buf, "system_id")?;
        let password = get_c_octet_string(&mut buf, "password")?;
        let system_type = get_c_octet_string(&mut buf, "system_type")?;
        let interface_version = get_u8(&mut buf)?;
        let addr_ton = Ton::try_from(get_u8(&mut buf)?).map_err(|err| {
            CodecError::InvalidParameter {
                field: "addr_ton",
                reason: format!("unknown type of number {:#04x}", err.number),
            }
        })?;
        let addr_npi = Npi::try_from(get_u8(&mut buf)?).map_err(|err| {
            CodecError::InvalidParameter {
                field: "addr_npi",
                reason: format!("unknown numbering plan {:#04x}", err.number),
            }
        })?;
        let address_range = get_c_octet_string(&mut buf, "address_range")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

impl fmt::Debug for BindTransceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindTransceiver")
            .field("sequence_number", &self.sequence_number)
            .field("system_id", &self.system_id)
            .field("password", &"{REDACTED}")
            .field("system_type", &self.system_type)
            .field("interface_version", &self.interface_version)
            .field("addr_ton", &self.addr_ton)
            .field("addr_npi", &self.addr_npi)
            .field("address_range", &self.address_range)
            .finish()
    }
}

/// bind_transceiver_resp (Section 4.1.6). The SMSC may append its supported
/// interface version as the sc_interface_version TLV.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindTransceiverResp {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
    pub system_id: String,
    pub sc_interface_version: Option<u8>,
}

impl BindTransceiverResp {
    pub fn new(
        sequence_number: u32,
        command_status: CommandStatus,
        system_id: impl Into<String>,
        sc_interface_version: Option<u8>,
    ) -> Result<Self, CodecError> {
        let system_id = system_id.into();
        check_ascii(&system_id, "system_id")?;
        Ok(Self {
            sequence_number,
            command_status,
            system_id,
            sc_interface_version,
        })
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        check_ascii(&self.system_id, "system_id")?;
        let mut body = BytesMut::new();
        put_c_octet_string(&mut body, &self.system_id);
        if let Some(version) = self.sc_interface_version {
            let param = OptionalParam::new(
                OptionalTag::ScInterfaceVersion,
                OptionalValue::Int(u32::from(version)),
            )?;
            param.write(&mut body);
        }
        Ok(pack_pdu(
            CommandId::BindTransceiverResp,
            self.command_status,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(pdu: &[u8], header: &PduHeader) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(pdu);
        buf.set_position(PDU_HEADER_LENGTH as u64);
        let system_id = get_c_octet_string(&mut buf, "system_id")?;

        // A trailing sc_interface_version TLV is a fixed five-octet record:
        // skip its tag and length, then read the version byte, provided
        // exactly one octet remains. Other trailers are ignored.
        let mut sc_interface_version = None;
        let position = buf.position() as usize;
        if position < header.pdu_length as usize {
            buf.set_position((position + 4) as u64);
            if buf.position() as usize + 1 == header.pdu_length as usize {
                sc_interface_version = Some(get_u8(&mut buf)?);
            }
        }
        Ok(Self {
            sequence_number: header.sequence_number,
            command_status: header.command_status,
            system_id,
            sc_interface_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_header;

    fn sample() -> BindTransceiver {
        BindTransceiver::new(5, "esme01", "hunter2", "VMS").unwrap()
    }

    #[test]
    fn round_trip() {
        let bind = sample();
        let pdu = bind.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(header.pdu_length as usize, pdu.len());
        assert_eq!(BindTransceiver::from_pdu(&pdu, &header).unwrap(), bind);
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("{REDACTED}"));
        assert!(rendered.contains("esme01"));
    }

    #[test]
    fn new_defaults_to_version_34() {
        assert_eq!(sample().interface_version, SMPP_VERSION_3_4);
    }

    #[test]
    fn resp_round_trip_with_version() {
        let resp =
            BindTransceiverResp::new(6, CommandStatus::Ok, "SMSC", Some(SMPP_VERSION_3_4)).unwrap();
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(BindTransceiverResp::from_pdu(&pdu, &header).unwrap(), resp);
    }

    #[test]
    fn resp_without_version() {
        let resp = BindTransceiverResp::new(7, CommandStatus::BindFailed, "SMSC", None).unwrap();
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        let decoded = BindTransceiverResp::from_pdu(&pdu, &header).unwrap();
        assert_eq!(decoded.sc_interface_version, None);
        assert_eq!(decoded.command_status, CommandStatus::BindFailed);
    }
}
