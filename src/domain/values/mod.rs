//! Self-validating value objects
//!
//! A value object that exists is valid: every constructor checks its input
//! and returns a [`ValidationError`](crate::domain::rules::ValidationError)
//! otherwise.

pub mod address;
pub mod capacity;
pub mod effective_date;
pub mod gln;
pub mod grid_area_code;
pub mod gsrn;
pub mod meter_id;
pub mod power_limit;
pub mod scheduled_reading_date;

pub use address::{Address, AddressInput};
pub use capacity::Capacity;
pub use effective_date::EffectiveDate;
pub use gln::GlnNumber;
pub use grid_area_code::GridAreaCode;
pub use gsrn::GsrnNumber;
pub use meter_id::MeterId;
pub use power_limit::PowerLimit;
pub use scheduled_reading_date::ScheduledMeterReadingDate;

/// GS1 mod-10 check: weights 3,1,3,... starting from the rightmost data
/// digit. Used by both GSRN and GLN numbers.
pub(crate) fn gs1_check_digit_valid(digits: &str) -> bool {
    let Some((body, check)) = digits.split_at_checked(digits.len().saturating_sub(1)) else {
        return false;
    };
    let Some(check) = check.chars().next().and_then(|c| c.to_digit(10)) else {
        return false;
    };

    let mut sum = 0u32;
    for (i, c) in body.chars().rev().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { d * 3 } else { d };
    }

    (10 - sum % 10) % 10 == check
}
