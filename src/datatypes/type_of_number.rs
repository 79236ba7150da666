use num_enum::TryFromPrimitive;

/// SMPP v3.4 Type of Number (Section 5.2.5).
///
/// Classifies an address together with [`NumericPlanIndicator`]; used for
/// the source and destination of an Sm and for the bind address range.
///
/// [`NumericPlanIndicator`]: crate::datatypes::NumericPlanIndicator
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Ton {
    #[default]
    Unknown = 0b0000_0000,
    /// E.164 country code + national number, e.g. "+41791234567".
    International = 0b0000_0001,
    National = 0b0000_0010,
    NetworkSpecific = 0b0000_0011,
    SubscriberNumber = 0b0000_0100,
    /// Text sender id, e.g. a brand name.
    Alphanumeric = 0b0000_0101,
    /// Short dial codes such as "411".
    Abbreviated = 0b0000_0110,
}
