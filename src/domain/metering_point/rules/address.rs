//! Address rules

use crate::domain::rules::{BusinessRule, ValidationError};
use crate::domain::values::Address;

pub struct StreetNameIsRequiredRule<'a> {
    pub address: &'a Address,
}

impl BusinessRule for StreetNameIsRequiredRule<'_> {
    fn is_broken(&self) -> bool {
        self.address.street_name().is_none()
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue { field: "street_name" }
    }
}

pub struct PostCodeIsRequiredRule<'a> {
    pub address: &'a Address,
}

impl BusinessRule for PostCodeIsRequiredRule<'_> {
    fn is_broken(&self) -> bool {
        self.address.post_code().is_none()
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue { field: "post_code" }
    }
}

pub struct CityIsRequiredRule<'a> {
    pub address: &'a Address,
}

impl BusinessRule for CityIsRequiredRule<'_> {
    fn is_broken(&self) -> bool {
        self.address.city().is_none()
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue { field: "city" }
    }
}

/// An address flagged as the actual (verified) address must carry the
/// reference into the geo-info register.
pub struct GeoInfoReferenceRequirementRule<'a> {
    pub address: &'a Address,
}

impl BusinessRule for GeoInfoReferenceRequirementRule<'_> {
    fn is_broken(&self) -> bool {
        self.address.is_actual_address() == Some(true)
            && self.address.geo_info_reference().is_none()
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue {
            field: "geo_info_reference",
        }
    }
}
