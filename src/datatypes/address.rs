use crate::codec::CodecError;
use crate::datatypes::{Npi, Ton};
use std::fmt;

/// An SMPP address: the number string plus its TON/NPI classification.
///
/// The number travels on the wire as a C-octet string, so it must be ASCII
/// and fit the 20-octet address fields of the Sm body. Constructors enforce
/// both; decoded PDUs build the struct directly since the wire already is
/// the source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct PhoneNumber {
    pub number: String,
    pub ton: Ton,
    pub npi: Npi,
}

/// Longest address accepted in the source_addr / destination_addr fields.
pub const MAX_ADDRESS_LENGTH: usize = 20;

impl PhoneNumber {
    pub fn new(number: impl Into<String>, ton: Ton, npi: Npi) -> Result<Self, CodecError> {
        let number = number.into();
        if !number.is_ascii() {
            return Err(CodecError::InvalidParameter {
                field: "number",
                reason: "address must be ASCII".into(),
            });
        }
        if number.len() > MAX_ADDRESS_LENGTH {
            return Err(CodecError::InvalidParameter {
                field: "number",
                reason: format!(
                    "address is {} octets, maximum is {MAX_ADDRESS_LENGTH}",
                    number.len()
                ),
            });
        }
        Ok(Self { number, ton, npi })
    }

    /// The usual case: an international number in the ISDN plan.
    pub fn international(number: impl Into<String>) -> Result<Self, CodecError> {
        Self::new(number, Ton::International, Npi::Isdn)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_defaults() {
        let number = PhoneNumber::international("41791234567").unwrap();
        assert_eq!(number.ton, Ton::International);
        assert_eq!(number.npi, Npi::Isdn);
        assert_eq!(number.to_string(), "41791234567");
    }

    #[test]
    fn non_ascii_is_rejected() {
        assert!(PhoneNumber::international("п41").is_err());
    }

    #[test]
    fn overlong_is_rejected() {
        assert!(PhoneNumber::international("1".repeat(21)).is_err());
    }
}
