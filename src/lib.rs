//! SMPP v3.4 PDU codec.
//!
//! Turns typed SMPP messages into wire PDUs and wire PDUs back into typed
//! messages: bind/unbind session control, submit_sm/deliver_sm message
//! traffic with TLV optional parameters and delivery receipts, and
//! enquire_link keepalives. The codec is pure; sessions, sequencing and
//! transport belong to the caller.
//!
//! # Decoding
//!
//! Read 16 octets, parse the header, then hand the full PDU to the
//! dispatch table:
//!
//! ```
//! use smpp_codec::{CodecRegistry, Message, PduRegistry, parse_header};
//! use smpp_codec::datatypes::EnquireLink;
//!
//! # fn main() -> Result<(), smpp_codec::CodecError> {
//! let codecs = CodecRegistry::default();
//! let wire = EnquireLink::new(1).to_pdu()?;
//!
//! let header = parse_header(&wire)?;
//! let registry = PduRegistry::new();
//! match registry.decode(&wire, &header, &codecs)? {
//!     Message::EnquireLink(probe) => assert_eq!(probe.sequence_number, 1),
//!     other => panic!("unexpected PDU: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Encoding
//!
//! Build a message, then [`Message::encode`] (or the per-type `to_pdu`)
//! returns the complete PDU, never a partial one. Text encodings resolve
//! through a [`CodecRegistry`], which merges caller-supplied codecs over
//! the built-in `gsm0338`/`ascii`/`latin_1`/`ucs2` table.

pub mod codec;
pub mod datatypes;
pub mod encoding;


pub use codec::{CodecError, Message, PduHeader, PduRegistry, decode_pdu, parse_header};
pub use encoding::{CodecRegistry, ErrorHandling, TextCodec};
