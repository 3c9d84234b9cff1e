//! Rules shared by every metering point type

use crate::domain::enumerations::{
    MeasurementUnitType, MeteringMethod, ProductType, ReadingOccurrence,
};
use crate::domain::metering_point::master_data::MeteringConfiguration;
use crate::domain::rules::{BusinessRule, ValidationError};

/// Physical metering needs a meter; virtual and calculated metering must
/// not name one.
pub struct MeterIdRequirementRule<'a> {
    pub configuration: &'a MeteringConfiguration,
}

impl BusinessRule for MeterIdRequirementRule<'_> {
    fn is_broken(&self) -> bool {
        match self.configuration.method {
            MeteringMethod::Physical => self.configuration.meter.is_none(),
            MeteringMethod::Virtual | MeteringMethod::Calculated => {
                self.configuration.meter.is_some()
            }
        }
    }

    fn error(&self) -> ValidationError {
        match self.configuration.method {
            MeteringMethod::Physical => ValidationError::MissingValue { field: "meter_number" },
            method => ValidationError::ValueNotAllowed {
                field: "meter_number",
                reason: format!("metering method {} has no physical meter", method),
            },
        }
    }
}

pub struct ReadingOccurrenceRule {
    pub reading_occurrence: ReadingOccurrence,
}

impl BusinessRule for ReadingOccurrenceRule {
    fn is_broken(&self) -> bool {
        !matches!(
            self.reading_occurrence,
            ReadingOccurrence::Hourly | ReadingOccurrence::Quarterly
        )
    }

    fn error(&self) -> ValidationError {
        ValidationError::ValueNotAllowed {
            field: "reading_occurrence",
            reason: format!("{} is not Hourly or Quarterly", self.reading_occurrence),
        }
    }
}

pub struct ProductTypeRule {
    pub product_type: ProductType,
}

impl BusinessRule for ProductTypeRule {
    fn is_broken(&self) -> bool {
        self.product_type != ProductType::EnergyActive
    }

    fn error(&self) -> ValidationError {
        ValidationError::ValueNotAllowed {
            field: "product_type",
            reason: format!("{} is not EnergyActive", self.product_type),
        }
    }
}

pub struct UnitTypeRule {
    pub unit_type: MeasurementUnitType,
}

impl BusinessRule for UnitTypeRule {
    fn is_broken(&self) -> bool {
        self.unit_type != MeasurementUnitType::KWh
    }

    fn error(&self) -> ValidationError {
        ValidationError::ValueNotAllowed {
            field: "unit_type",
            reason: format!("{} is not KWh", self.unit_type),
        }
    }
}

/// A field that must be present.
pub struct ValueIsRequiredRule {
    pub field: &'static str,
    pub present: bool,
}

impl ValueIsRequiredRule {
    pub fn new<T>(field: &'static str, value: &Option<T>) -> Self {
        Self {
            field,
            present: value.is_some(),
        }
    }
}

impl BusinessRule for ValueIsRequiredRule {
    fn is_broken(&self) -> bool {
        !self.present
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue { field: self.field }
    }
}

/// A field that must be absent.
pub struct ValueNotAllowedRule {
    pub field: &'static str,
    pub present: bool,
    pub reason: &'static str,
}

impl ValueNotAllowedRule {
    pub fn new<T>(field: &'static str, value: &Option<T>, reason: &'static str) -> Self {
        Self {
            field,
            present: value.is_some(),
            reason,
        }
    }
}

impl BusinessRule for ValueNotAllowedRule {
    fn is_broken(&self) -> bool {
        self.present
    }

    fn error(&self) -> ValidationError {
        ValidationError::ValueNotAllowed {
            field: self.field,
            reason: self.reason.to_string(),
        }
    }
}
