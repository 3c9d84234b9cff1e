//! Effective date of a market request

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::rules::ValidationError;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// UTC instant from which a change applies, written `yyyy-MM-ddTHH:mm:ssZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectiveDate(DateTime<Utc>);

impl EffectiveDate {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        // Strict: whole seconds and a literal `Z`; no offsets, no fractions.
        if value.len() != 20 {
            return Err(ValidationError::InvalidEffectiveDate(value.to_string()));
        }
        NaiveDateTime::parse_from_str(value, FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| ValidationError::InvalidEffectiveDate(value.to_string()))
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        use chrono::Timelike;
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for EffectiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for EffectiveDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl From<EffectiveDate> for DateTime<Utc> {
    fn from(d: EffectiveDate) -> Self {
        d.0
    }
}
