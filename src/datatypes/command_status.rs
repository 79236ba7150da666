use num_enum::TryFromPrimitive;

/// SMPP v3.4 command status codes (Section 5.1.3, Table 5-2).
///
/// Requests always carry `Ok` (ESME_ROK); responses carry the outcome of the
/// request they answer. The set below is the complete standard table; vendor
/// ranges are not modelled, so a status outside the table fails header
/// parsing with `UnknownStatus`.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CommandStatus {
    /// ESME_ROK: no error.
    #[default]
    Ok = 0x0000_0000,
    /// Message length is invalid.
    InvalidMsgLength = 0x0000_0001,
    /// Command length is invalid.
    InvalidCommandLength = 0x0000_0002,
    /// Invalid command id.
    InvalidCommandId = 0x0000_0003,
    /// Incorrect BIND status for the given command.
    IncorrectBindStatus = 0x0000_0004,
    /// ESME already in bound state.
    AlreadyBound = 0x0000_0005,
    /// Invalid priority flag.
    InvalidPriorityFlag = 0x0000_0006,
    /// Invalid registered delivery flag.
    InvalidRegisteredDeliveryFlag = 0x0000_0007,
    /// System error.
    SystemError = 0x0000_0008,
    /// Invalid source address.
    InvalidSourceAddress = 0x0000_000A,
    /// Invalid destination address.
    InvalidDestinationAddress = 0x0000_000B,
    /// Message ID is invalid.
    InvalidMessageId = 0x0000_000C,
    /// Bind failed.
    BindFailed = 0x0000_000D,
    /// Invalid password.
    InvalidPassword = 0x0000_000E,
    /// Invalid system id.
    InvalidSystemId = 0x0000_000F,
    /// cancel_sm request failed.
    CancelSmFailed = 0x0000_0011,
    /// replace_sm request failed.
    ReplaceSmFailed = 0x0000_0013,
    /// Message queue full.
    MessageQueueFull = 0x0000_0014,
    /// Invalid service type.
    InvalidServiceType = 0x0000_0015,
    /// Invalid number of destinations.
    InvalidNumberOfDestinations = 0x0000_0033,
    /// Invalid distribution list name.
    InvalidDistributionListName = 0x0000_0034,
    /// Invalid destination flag.
    InvalidDestinationFlag = 0x0000_0040,
    /// Invalid submit-with-replace request.
    InvalidSubmitWithReplace = 0x0000_0042,
    /// Invalid esm_class field data.
    InvalidEsmClass = 0x0000_0043,
    /// Cannot submit to distribution list.
    CannotSubmitToDistributionList = 0x0000_0044,
    /// submit_sm or submit_multi failed.
    SubmitFailed = 0x0000_0045,
    /// Invalid source address TON.
    InvalidSourceTon = 0x0000_0048,
    /// Invalid source address NPI.
    InvalidSourceNpi = 0x0000_0049,
    /// Invalid destination address TON.
    InvalidDestinationTon = 0x0000_0050,
    /// Invalid destination address NPI.
    InvalidDestinationNpi = 0x0000_0051,
    /// Invalid system_type field.
    InvalidSystemType = 0x0000_0053,
    /// Invalid replace_if_present flag.
    InvalidReplaceIfPresentFlag = 0x0000_0054,
    /// Invalid number of messages.
    InvalidNumberOfMessages = 0x0000_0055,
    /// Throttling error: ESME has exceeded allowed message limits.
    ThrottlingError = 0x0000_0058,
    /// Invalid scheduled delivery time.
    InvalidScheduledDeliveryTime = 0x0000_0061,
    /// Invalid message validity period.
    InvalidValidityPeriod = 0x0000_0062,
    /// Predefined message is invalid or not found.
    InvalidPredefinedMessage = 0x0000_0063,
    /// ESME receiver temporary application error.
    ReceiverTemporaryError = 0x0000_0064,
    /// ESME receiver permanent application error.
    ReceiverPermanentError = 0x0000_0065,
    /// ESME receiver reject message error.
    ReceiverRejectError = 0x0000_0066,
    /// query_sm request failed.
    QuerySmFailed = 0x0000_0067,
    /// Error in the optional part of the PDU body.
    InvalidOptionalPart = 0x0000_00C0,
    /// Optional parameter not allowed.
    OptionalParamNotAllowed = 0x0000_00C1,
    /// Invalid optional parameter length.
    InvalidOptionalParamLength = 0x0000_00C2,
    /// Expected optional parameter missing.
    MissingOptionalParam = 0x0000_00C3,
    /// Invalid optional parameter value.
    InvalidOptionalParamValue = 0x0000_00C4,
    /// Delivery failure (used by data_sm_resp).
    DeliveryFailure = 0x0000_00FE,
    /// ESME_RUNKNOWNERR: unknown error.
    UnknownError = 0x0000_00FF,
}

impl CommandStatus {
    pub fn is_ok(self) -> bool {
        self == CommandStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_zero() {
        assert_eq!(CommandStatus::Ok as u32, 0);
        assert!(CommandStatus::Ok.is_ok());
        assert!(!CommandStatus::UnknownError.is_ok());
    }

    #[test]
    fn lookup_round_trip() {
        for status in [
            CommandStatus::Ok,
            CommandStatus::ThrottlingError,
            CommandStatus::InvalidOptionalParamValue,
            CommandStatus::UnknownError,
        ] {
            assert_eq!(CommandStatus::try_from(status as u32), Ok(status));
        }
    }

    #[test]
    fn reserved_values_are_rejected() {
        assert!(CommandStatus::try_from(0x0000_0009u32).is_err());
        assert!(CommandStatus::try_from(0x0000_0500u32).is_err());
    }
}
