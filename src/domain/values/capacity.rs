//! Installed capacity in kW

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::rules::ValidationError;

const MAX_INTEGER_DIGITS: usize = 8;
const MAX_SCALE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(Decimal);

impl Capacity {
    pub fn create(kw: Decimal) -> Result<Self, ValidationError> {
        if kw.is_sign_negative() {
            return Err(ValidationError::InvalidCapacity(format!(
                "{} must not be negative",
                kw
            )));
        }
        let kw = kw.normalize();
        if kw.scale() > MAX_SCALE {
            return Err(ValidationError::InvalidCapacity(format!(
                "{} has more than {} decimal",
                kw, MAX_SCALE
            )));
        }
        if kw.trunc().to_string().len() > MAX_INTEGER_DIGITS {
            return Err(ValidationError::InvalidCapacity(format!(
                "{} has more than {} digits",
                kw, MAX_INTEGER_DIGITS
            )));
        }
        Ok(Self(kw))
    }

    pub fn kw(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Capacity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ValidationError::InvalidCapacity(s.to_string()))?;
        Self::create(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_decimal() {
        let c: Capacity = "12.5".parse().unwrap();
        assert_eq!(c.to_string(), "12.5");
        let c: Capacity = "12.50".parse().unwrap();
        assert_eq!(c.to_string(), "12.5");
    }

    #[test]
    fn rejects_precision_and_size() {
        assert!("1.25".parse::<Capacity>().is_err());
        assert!("123456789".parse::<Capacity>().is_err());
        assert!("-1".parse::<Capacity>().is_err());
        assert!("abc".parse::<Capacity>().is_err());
        assert!("99999999.9".parse::<Capacity>().is_ok());
    }
}
