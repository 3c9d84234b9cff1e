use std::fmt;
use std::str::FromStr;

use crate::domain::rules::ValidationError;

const MAX_LENGTH: usize = 18;

/// Serial number of a physical meter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeterId(String);

impl MeterId {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty()
            || value.len() > MAX_LENGTH
            || !value.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(ValidationError::InvalidMeterId(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MeterId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}
