use num_enum::TryFromPrimitive;

/// SMPP v3.4 command identifiers (Table 4-1).
///
/// The command_id is the second field of the 16-octet PDU header. Bit 31
/// distinguishes responses (set) from requests (clear); the remaining bits
/// identify the operation. Only the commands exchanged by a transceiver
/// session are represented; the set is closed, and any other wire value is
/// rejected during header parsing.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// generic_nack (Section 4.3.1), the error response for unparseable PDUs.
    GenericNack = 0x8000_0000,

    /// bind_transceiver (Section 4.1.5).
    BindTransceiver = 0x0000_0009,
    /// bind_transceiver_resp (Section 4.1.6).
    BindTransceiverResp = 0x8000_0009,

    /// submit_sm (Section 4.4.1).
    SubmitSm = 0x0000_0004,
    /// submit_sm_resp (Section 4.4.2).
    SubmitSmResp = 0x8000_0004,

    /// deliver_sm (Section 4.6.1), also carries delivery receipts.
    DeliverSm = 0x0000_0005,
    /// deliver_sm_resp (Section 4.6.2).
    DeliverSmResp = 0x8000_0005,

    /// enquire_link (Section 4.11.1), the keepalive probe.
    EnquireLink = 0x0000_0015,
    /// enquire_link_resp (Section 4.11.2).
    EnquireLinkResp = 0x8000_0015,

    /// unbind (Section 4.2.1).
    Unbind = 0x0000_0006,
    /// unbind_resp (Section 4.2.2).
    UnbindResp = 0x8000_0006,
}

impl CommandId {
    /// True for response PDUs (bit 31 set). generic_nack counts as a
    /// response even though it answers a request nobody could parse.
    pub fn is_response(self) -> bool {
        (self as u32) & 0x8000_0000 != 0
    }
}
