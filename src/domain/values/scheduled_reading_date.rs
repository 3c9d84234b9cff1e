use std::fmt;
use std::str::FromStr;

use crate::domain::rules::ValidationError;

/// Yearly meter reading date, `MMdd`, always the first day of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMeterReadingDate {
    month: u32,
}

impl ScheduledMeterReadingDate {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let invalid = || ValidationError::InvalidScheduledMeterReadingDate(value.to_string());

        if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let (month, day) = value.split_at(2);
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || day != "01" {
            return Err(invalid());
        }
        Ok(Self { month })
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for ScheduledMeterReadingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}01", self.month)
    }
}

impl FromStr for ScheduledMeterReadingDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}
