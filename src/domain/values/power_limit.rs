//! Power limit of a connection

use crate::domain::rules::ValidationError;

const MAX: i32 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerLimit {
    kw: Option<i32>,
    ampere: Option<i32>,
}

impl PowerLimit {
    pub fn create(kw: Option<i32>, ampere: Option<i32>) -> Result<Self, ValidationError> {
        if let Some(kw) = kw {
            if !(0..=MAX).contains(&kw) {
                return Err(ValidationError::InvalidPowerLimit(format!(
                    "kW must be between 0 and {}, got {}",
                    MAX, kw
                )));
            }
        }
        if let Some(ampere) = ampere {
            if !(0..=MAX).contains(&ampere) {
                return Err(ValidationError::InvalidPowerLimit(format!(
                    "ampere must be between 0 and {}, got {}",
                    MAX, ampere
                )));
            }
        }
        Ok(Self { kw, ampere })
    }

    pub fn kw(&self) -> Option<i32> {
        self.kw
    }

    pub fn ampere(&self) -> Option<i32> {
        self.ampere
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_range() {
        let limit = PowerLimit::create(Some(230), Some(16)).unwrap();
        assert_eq!(limit.kw(), Some(230));
        assert_eq!(limit.ampere(), Some(16));
        assert!(PowerLimit::create(None, None).is_ok());
    }

    #[test]
    fn out_of_range() {
        assert!(PowerLimit::create(Some(-1), None).is_err());
        assert!(PowerLimit::create(None, Some(1_000_000)).is_err());
    }
}
