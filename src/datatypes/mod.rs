mod address;
mod bind_transceiver;
mod command_id;
mod command_status;
mod data_coding;
mod deliver_sm;
mod enquire_link;
mod generic_nack;
mod numeric_plan_indicator;
mod receipt;
mod sm;
mod smpp_time;
mod submit_sm;
mod tlv;
mod type_of_number;
mod unbind;

pub use address::{MAX_ADDRESS_LENGTH, PhoneNumber};
pub use bind_transceiver::{BindTransceiver, BindTransceiverResp};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::DataCoding;
pub use deliver_sm::{DeliverSm, DeliverSmResp};
pub use enquire_link::{EnquireLink, EnquireLinkResp};
pub use generic_nack::GenericNack;
pub use numeric_plan_indicator::Npi;
pub use receipt::DeliveryReceipt;
pub use sm::{MAX_SHORT_MESSAGE_LENGTH, Sm};
pub use smpp_time::{MAX_VALIDITY_WEEKS, SmppTime};
pub use submit_sm::{SubmitSm, SubmitSmResp};
pub use tlv::{OptionalParam, OptionalTag, OptionalValue, ValueKind};
pub use type_of_number::Ton;
pub use unbind::{Unbind, UnbindResp};

/// Interface version byte advertised in bind PDUs.
pub const SMPP_VERSION_3_4: u8 = 0x34;
