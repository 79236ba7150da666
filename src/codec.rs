//! PDU framing: the 16-octet header codec, the octet-stream primitives the
//! message bodies are built from, and the command-id dispatch table used on
//! decode.
//!
//! Everything here is pure. Callers own sequencing, response correlation
//! and transport; the codec turns messages into bytes and bytes into
//! messages, nothing else.

use crate::datatypes::{
    BindTransceiver, BindTransceiverResp, CommandId, CommandStatus, DeliverSm, DeliverSmResp,
    EnquireLink, EnquireLinkResp, GenericNack, SubmitSm, SubmitSmResp, Unbind, UnbindResp,
};
use crate::encoding::CodecRegistry;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

/// Every PDU starts with pdu_length, command_id, command_status and
/// sequence_number, four big-endian u32s.
pub const PDU_HEADER_LENGTH: usize = 16;

/// The parsed fixed header. `pdu_length` counts the header's own 16 octets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PduHeader {
    pub pdu_length: u32,
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

/// Errors surfaced at the codec boundary. All are recoverable: a failed
/// decode leaves no partial message, a failed encode leaves no bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PDU header needs {PDU_HEADER_LENGTH} octets, got {available}")]
    TruncatedHeader { available: usize },

    #[error("PDU declares {expected} octets but only {available} are available")]
    TruncatedPdu { expected: usize, available: usize },

    #[error("C-octet string at offset {offset} has no NUL terminator before PDU end")]
    MissingTerminator { offset: usize },

    #[error("unknown command_id {0:#010x}")]
    UnknownCommand(u32),

    #[error("unknown command_status {0:#010x}")]
    UnknownStatus(u32),

    #[error("unknown optional parameter tag {tag:#06x} at offset {offset}")]
    UnknownOptionalTag { tag: u16, offset: usize },

    #[error("no codec registered for encoding {0:?}")]
    UnknownEncoding(String),

    #[error("data_coding {0:#04x} does not name a known encoding")]
    UnsupportedDataCoding(u8),

    #[error("text cannot be represented in {encoding}: {reason}")]
    EncodingFailure { encoding: String, reason: String },

    #[error("encoded short message is {length} octets, maximum is 254")]
    ShortMessageTooLong { length: usize },

    #[error("relative validity of {weeks} weeks exceeds the 63-week maximum")]
    ValidityOutOfRange { weeks: i64 },

    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// Parses the fixed header from the first 16 octets of a PDU.
pub fn parse_header(data: &[u8]) -> Result<PduHeader, CodecError> {
    if data.len() < PDU_HEADER_LENGTH {
        return Err(CodecError::TruncatedHeader {
            available: data.len(),
        });
    }
    let mut buf = Cursor::new(data);
    let pdu_length = buf.get_u32();
    let raw_command = buf.get_u32();
    let command_id =
        CommandId::try_from(raw_command).map_err(|_| CodecError::UnknownCommand(raw_command))?;
    let raw_status = buf.get_u32();
    let command_status =
        CommandStatus::try_from(raw_status).map_err(|_| CodecError::UnknownStatus(raw_status))?;
    let sequence_number = buf.get_u32();
    Ok(PduHeader {
        pdu_length,
        command_id,
        command_status,
        sequence_number,
    })
}

/// Frames `body` with a header; `pdu_length` is filled in from the body.
pub(crate) fn pack_pdu(
    command_id: CommandId,
    command_status: CommandStatus,
    sequence_number: u32,
    body: &[u8],
) -> Bytes {
    let mut buf = BytesMut::with_capacity(PDU_HEADER_LENGTH + body.len());
    buf.put_u32((PDU_HEADER_LENGTH + body.len()) as u32);
    buf.put_u32(command_id as u32);
    buf.put_u32(command_status as u32);
    buf.put_u32(sequence_number);
    buf.put_slice(body);
    buf.freeze()
}

// Octet-stream reader primitives. All operate on a cursor over the full
// PDU slice so error offsets are PDU offsets.

/// Reads an ASCII C-octet string: octets up to and excluding a NUL, cursor
/// left after the NUL.
pub(crate) fn get_c_octet_string(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<String, CodecError> {
    let start = buf.position() as usize;
    let data = *buf.get_ref();
    let terminator = data[start..]
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(CodecError::MissingTerminator { offset: start })?;
    let raw = &data[start..start + terminator];
    if !raw.is_ascii() {
        return Err(CodecError::InvalidParameter {
            field,
            reason: "C-octet string is not ASCII".into(),
        });
    }
    buf.set_position((start + terminator + 1) as u64);
    Ok(raw.iter().map(|&byte| byte as char).collect())
}

/// Reads a counted octet string. Some peers NUL-terminate counted strings,
/// so one trailing NUL is stripped when present.
pub(crate) fn get_octet_string(
    buf: &mut Cursor<&[u8]>,
    count: usize,
) -> Result<String, CodecError> {
    let start = buf.position() as usize;
    let data = *buf.get_ref();
    if data.len() - start < count {
        return Err(CodecError::TruncatedPdu {
            expected: start + count,
            available: data.len(),
        });
    }
    let mut raw = &data[start..start + count];
    if let [head @ .., 0] = raw {
        raw = head;
    }
    if !raw.is_ascii() {
        return Err(CodecError::InvalidParameter {
            field: "octet_string",
            reason: "octet string is not ASCII".into(),
        });
    }
    buf.set_position((start + count) as u64);
    Ok(raw.iter().map(|&byte| byte as char).collect())
}

/// Reads `count` raw octets without interpretation.
pub(crate) fn get_octets<'a>(
    buf: &mut Cursor<&'a [u8]>,
    count: usize,
) -> Result<&'a [u8], CodecError> {
    let start = buf.position() as usize;
    let data = *buf.get_ref();
    if data.len() - start < count {
        return Err(CodecError::TruncatedPdu {
            expected: start + count,
            available: data.len(),
        });
    }
    buf.set_position((start + count) as u64);
    Ok(&data[start..start + count])
}

pub(crate) fn get_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8())
}

pub(crate) fn get_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    ensure_remaining(buf, 2)?;
    Ok(buf.get_u16())
}

pub(crate) fn get_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_u32())
}

fn ensure_remaining(buf: &Cursor<&[u8]>, needed: usize) -> Result<(), CodecError> {
    let available = buf.get_ref().len();
    let wanted = buf.position() as usize + needed;
    if wanted > available {
        return Err(CodecError::TruncatedPdu {
            expected: wanted,
            available,
        });
    }
    Ok(())
}

/// Appends an ASCII string and its NUL terminator.
pub(crate) fn put_c_octet_string(buf: &mut BytesMut, value: &str) {
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
}

/// Rejects non-ASCII text before it reaches a C-octet string field.
pub(crate) fn check_ascii(value: &str, field: &'static str) -> Result<(), CodecError> {
    if value.is_ascii() {
        Ok(())
    } else {
        Err(CodecError::InvalidParameter {
            field,
            reason: "value must be ASCII".into(),
        })
    }
}

/// A decoded PDU of any supported command.
///
/// Large Sm variants are boxed so the enum stays cheap to move through
/// channels and collections.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    BindTransceiver(BindTransceiver),
    BindTransceiverResp(BindTransceiverResp),
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResp),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResp(DeliverSmResp),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResp),
    Unbind(Unbind),
    UnbindResp(UnbindResp),
    GenericNack(GenericNack),
}

impl Message {
    pub fn command_id(&self) -> CommandId {
        match self {
            Message::BindTransceiver(_) => CommandId::BindTransceiver,
            Message::BindTransceiverResp(_) => CommandId::BindTransceiverResp,
            Message::SubmitSm(_) => CommandId::SubmitSm,
            Message::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Message::DeliverSm(_) => CommandId::DeliverSm,
            Message::DeliverSmResp(_) => CommandId::DeliverSmResp,
            Message::EnquireLink(_) => CommandId::EnquireLink,
            Message::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Message::Unbind(_) => CommandId::Unbind,
            Message::UnbindResp(_) => CommandId::UnbindResp,
            Message::GenericNack(_) => CommandId::GenericNack,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        match self {
            Message::BindTransceiver(pdu) => pdu.sequence_number,
            Message::BindTransceiverResp(pdu) => pdu.sequence_number,
            Message::SubmitSm(pdu) => pdu.sequence_number,
            Message::SubmitSmResp(pdu) => pdu.sequence_number,
            Message::DeliverSm(pdu) => pdu.sequence_number,
            Message::DeliverSmResp(pdu) => pdu.sequence_number,
            Message::EnquireLink(pdu) => pdu.sequence_number,
            Message::EnquireLinkResp(pdu) => pdu.sequence_number,
            Message::Unbind(pdu) => pdu.sequence_number,
            Message::UnbindResp(pdu) => pdu.sequence_number,
            Message::GenericNack(pdu) => pdu.sequence_number,
        }
    }

    /// Status carried in the header. Requests always report `Ok`.
    pub fn command_status(&self) -> CommandStatus {
        match self {
            Message::BindTransceiverResp(pdu) => pdu.command_status,
            Message::SubmitSmResp(pdu) => pdu.command_status,
            Message::DeliverSmResp(pdu) => pdu.command_status,
            Message::EnquireLinkResp(pdu) => pdu.command_status,
            Message::UnbindResp(pdu) => pdu.command_status,
            Message::GenericNack(pdu) => pdu.command_status,
            _ => CommandStatus::Ok,
        }
    }

    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }

    /// Encodes the full PDU, header included. `codecs` supplies the text
    /// encodings consulted by the Sm variants; the rest ignore it.
    pub fn encode(&self, codecs: &CodecRegistry) -> Result<Bytes, CodecError> {
        match self {
            Message::BindTransceiver(pdu) => pdu.to_pdu(),
            Message::BindTransceiverResp(pdu) => pdu.to_pdu(),
            Message::SubmitSm(pdu) => pdu.to_pdu(codecs),
            Message::SubmitSmResp(pdu) => pdu.to_pdu(),
            Message::DeliverSm(pdu) => pdu.to_pdu(codecs),
            Message::DeliverSmResp(pdu) => pdu.to_pdu(),
            Message::EnquireLink(pdu) => pdu.to_pdu(),
            Message::EnquireLinkResp(pdu) => pdu.to_pdu(),
            Message::Unbind(pdu) => pdu.to_pdu(),
            Message::UnbindResp(pdu) => pdu.to_pdu(),
            Message::GenericNack(pdu) => pdu.to_pdu(),
        }
    }
}

type DecodeFn = fn(&[u8], &PduHeader, &CodecRegistry) -> Result<Message, CodecError>;

/// Maps command ids to body decoders.
///
/// The table covers every supported command, so lookups only miss when a
/// header was forged between parsing and dispatch. Build one registry and
/// reuse it; construction allocates the table.
pub struct PduRegistry {
    decoders: HashMap<CommandId, DecodeFn>,
}

impl PduRegistry {
    pub fn new() -> Self {
        let mut decoders: HashMap<CommandId, DecodeFn> = HashMap::new();
        decoders.insert(CommandId::BindTransceiver, |pdu, header, _| {
            Ok(Message::BindTransceiver(BindTransceiver::from_pdu(pdu, header)?))
        });
        decoders.insert(CommandId::BindTransceiverResp, |pdu, header, _| {
            Ok(Message::BindTransceiverResp(BindTransceiverResp::from_pdu(pdu, header)?))
        });
        decoders.insert(CommandId::SubmitSm, |pdu, header, codecs| {
            Ok(Message::SubmitSm(Box::new(SubmitSm::from_pdu(pdu, header, codecs)?)))
        });
        decoders.insert(CommandId::SubmitSmResp, |pdu, header, _| {
            Ok(Message::SubmitSmResp(SubmitSmResp::from_pdu(pdu, header)?))
        });
        decoders.insert(CommandId::DeliverSm, |pdu, header, codecs| {
            Ok(Message::DeliverSm(Box::new(DeliverSm::from_pdu(pdu, header, codecs)?)))
        });
        decoders.insert(CommandId::DeliverSmResp, |pdu, header, _| {
            Ok(Message::DeliverSmResp(DeliverSmResp::from_pdu(pdu, header)?))
        });
        decoders.insert(CommandId::EnquireLink, |_, header, _| {
            Ok(Message::EnquireLink(EnquireLink::from_pdu(header)))
        });
        decoders.insert(CommandId::EnquireLinkResp, |_, header, _| {
            Ok(Message::EnquireLinkResp(EnquireLinkResp::from_pdu(header)))
        });
        decoders.insert(CommandId::Unbind, |_, header, _| {
            Ok(Message::Unbind(Unbind::from_pdu(header)))
        });
        decoders.insert(CommandId::UnbindResp, |_, header, _| {
            Ok(Message::UnbindResp(UnbindResp::from_pdu(header)))
        });
        decoders.insert(CommandId::GenericNack, |_, header, _| {
            Ok(Message::GenericNack(GenericNack::from_pdu(header)))
        });
        Self { decoders }
    }

    /// Decodes a complete PDU. `pdu` must hold at least `header.pdu_length`
    /// octets; anything beyond that (the start of the next PDU in a read
    /// buffer) is ignored.
    #[tracing::instrument(skip(self, pdu, codecs), fields(command = ?header.command_id, sequence = header.sequence_number))]
    pub fn decode(
        &self,
        pdu: &[u8],
        header: &PduHeader,
        codecs: &CodecRegistry,
    ) -> Result<Message, CodecError> {
        let declared = header.pdu_length as usize;
        if declared < PDU_HEADER_LENGTH {
            return Err(CodecError::InvalidParameter {
                field: "pdu_length",
                reason: format!("{declared} is shorter than the header"),
            });
        }
        if pdu.len() < declared {
            return Err(CodecError::TruncatedPdu {
                expected: declared,
                available: pdu.len(),
            });
        }
        let decoder = self
            .decoders
            .get(&header.command_id)
            .ok_or(CodecError::UnknownCommand(header.command_id as u32))?;
        decoder(&pdu[..declared], header, codecs)
    }
}

impl Default for PduRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot decode for callers without a long-lived [`PduRegistry`].
pub fn decode_pdu(
    pdu: &[u8],
    header: &PduHeader,
    codecs: &CodecRegistry,
) -> Result<Message, CodecError> {
    PduRegistry::new().decode(pdu, header, codecs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let pdu = pack_pdu(CommandId::EnquireLink, CommandStatus::Ok, 42, &[]);
        assert_eq!(pdu.len(), PDU_HEADER_LENGTH);
        let header = parse_header(&pdu).unwrap();
        assert_eq!(header.pdu_length, 16);
        assert_eq!(header.command_id, CommandId::EnquireLink);
        assert_eq!(header.command_status, CommandStatus::Ok);
        assert_eq!(header.sequence_number, 42);
    }

    #[test]
    fn short_header_is_rejected() {
        let err = parse_header(&[0u8; 15]).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedHeader { available: 15 }));
    }

    #[test]
    fn unknown_command_and_status_are_rejected() {
        let mut pdu = pack_pdu(CommandId::EnquireLink, CommandStatus::Ok, 1, &[]).to_vec();
        pdu[4..8].copy_from_slice(&0x0000_0001u32.to_be_bytes()); // bind_receiver
        assert!(matches!(
            parse_header(&pdu),
            Err(CodecError::UnknownCommand(0x0000_0001))
        ));

        let mut pdu = pack_pdu(CommandId::EnquireLink, CommandStatus::Ok, 1, &[]).to_vec();
        pdu[8..12].copy_from_slice(&0x0000_0999u32.to_be_bytes());
        assert!(matches!(
            parse_header(&pdu),
            Err(CodecError::UnknownStatus(0x0000_0999))
        ));
    }

    #[test]
    fn c_octet_string_requires_terminator() {
        let data = b"hello";
        let mut cursor = Cursor::new(&data[..]);
        let err = get_c_octet_string(&mut cursor, "test").unwrap_err();
        assert!(matches!(err, CodecError::MissingTerminator { offset: 0 }));

        let data = b"hello\0world\0";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_c_octet_string(&mut cursor, "test").unwrap(), "hello");
        assert_eq!(cursor.position(), 6);
        assert_eq!(get_c_octet_string(&mut cursor, "test").unwrap(), "world");
    }

    #[test]
    fn counted_octet_string_strips_one_trailing_nul() {
        let data = b"abc\0";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_octet_string(&mut cursor, 4).unwrap(), "abc");

        let data = b"abcd";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_octet_string(&mut cursor, 4).unwrap(), "abcd");
    }

    #[test]
    fn integer_reads_are_bounds_checked() {
        let data = [0x01u8, 0x02];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_u16(&mut cursor).unwrap(), 0x0102);
        assert!(matches!(
            get_u16(&mut cursor),
            Err(CodecError::TruncatedPdu { .. })
        ));
    }

    #[test]
    fn registry_rejects_short_buffers() {
        let registry = PduRegistry::new();
        let pdu = pack_pdu(CommandId::SubmitSmResp, CommandStatus::Ok, 7, b"id\0");
        let mut header = parse_header(&pdu).unwrap();
        header.pdu_length += 4;
        let err = registry
            .decode(&pdu, &header, &CodecRegistry::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedPdu { .. }));
    }
}
