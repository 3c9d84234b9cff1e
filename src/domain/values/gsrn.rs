//! GSRN number, the metering point identity

use std::fmt;
use std::str::FromStr;

use crate::domain::rules::ValidationError;

const LENGTH: usize = 18;
const PREFIX: &str = "57";

/// Global Service Relation Number: 18 digits, `57` prefix, GS1 check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GsrnNumber(String);

impl GsrnNumber {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let well_formed = value.len() == LENGTH
            && value.bytes().all(|b| b.is_ascii_digit())
            && value.starts_with(PREFIX)
            && super::gs1_check_digit_valid(value);

        if !well_formed {
            return Err(ValidationError::InvalidGsrnNumber(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GsrnNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GsrnNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}
