use std::fmt;
use std::str::FromStr;

use crate::domain::rules::ValidationError;

/// Three digit grid area code, e.g. `870`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridAreaCode(String);

impl GridAreaCode {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidGridAreaCode(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridAreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GridAreaCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_digits() {
        assert!(GridAreaCode::create("870").is_ok());
        assert!(GridAreaCode::create("87").is_err());
        assert!(GridAreaCode::create("8a0").is_err());
    }
}
