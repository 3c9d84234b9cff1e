//! GLN number, the market actor identity

use std::fmt;
use std::str::FromStr;

use crate::domain::rules::ValidationError;

/// Global Location Number of a grid operator or energy supplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlnNumber(String);

impl GlnNumber {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let well_formed = value.len() == 13
            && value.bytes().all(|b| b.is_ascii_digit())
            && super::gs1_check_digit_valid(value);

        if !well_formed {
            return Err(ValidationError::InvalidGlnNumber(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlnNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GlnNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_gln() {
        assert!(GlnNumber::create("5790000000005").is_ok());
        assert!(GlnNumber::create("5790000000012").is_ok());
    }

    #[test]
    fn invalid_gln() {
        assert!(GlnNumber::create("5790000000006").is_err());
        assert!(GlnNumber::create("579000000000").is_err());
        assert_eq!(
            GlnNumber::create("abc").unwrap_err().code(),
            "E0I"
        );
    }
}
