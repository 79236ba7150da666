use num_enum::TryFromPrimitive;

/// SMPP v3.4 Numbering Plan Indicator (Section 5.2.6).
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Npi {
    #[default]
    Unknown = 0b0000_0000,
    /// ISDN/telephony (E.163/E.164), the common case for phone numbers.
    Isdn = 0b0000_0001,
    Data = 0b0000_0011,
    Telex = 0b0000_0100,
    LandMobile = 0b0000_0110,
    National = 0b0000_1000,
    Private = 0b0000_1001,
    Ermes = 0b0000_1010,
    Internet = 0b0000_1110,
    WapClientId = 0b0001_0010,
}
