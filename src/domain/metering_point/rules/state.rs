//! Rules gating state transitions

use crate::domain::enumerations::PhysicalState;
use crate::domain::metering_point::energy_suppliers::EnergySuppliers;
use crate::domain::rules::{BusinessRule, ValidationError};
use crate::domain::values::{EffectiveDate, GsrnNumber};

/// The operation is only allowed from the listed physical states.
pub struct PhysicalStateRule {
    pub operation: &'static str,
    pub state: PhysicalState,
    pub allowed: &'static [PhysicalState],
}

impl BusinessRule for PhysicalStateRule {
    fn is_broken(&self) -> bool {
        // Closed down points are reported by MeteringPointIsClosedDownRule.
        self.state != PhysicalState::ClosedDown && !self.allowed.contains(&self.state)
    }

    fn error(&self) -> ValidationError {
        ValidationError::PhysicalStateNotAllowed {
            operation: self.operation,
            state: self.state,
        }
    }
}

pub struct MeteringPointIsClosedDownRule<'a> {
    pub gsrn: &'a GsrnNumber,
    pub state: PhysicalState,
}

impl BusinessRule for MeteringPointIsClosedDownRule<'_> {
    fn is_broken(&self) -> bool {
        self.state == PhysicalState::ClosedDown
    }

    fn error(&self) -> ValidationError {
        ValidationError::AlreadyClosedDown(self.gsrn.to_string())
    }
}

pub struct MustHaveEnergySupplierRule<'a> {
    pub gsrn: &'a GsrnNumber,
    pub energy_suppliers: &'a EnergySuppliers,
    pub effective_date: EffectiveDate,
}

impl BusinessRule for MustHaveEnergySupplierRule<'_> {
    fn is_broken(&self) -> bool {
        !self.energy_suppliers.has_supplier_at(self.effective_date)
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingEnergySupplier {
            gsrn: self.gsrn.to_string(),
            effective_date: self.effective_date.to_string(),
        }
    }
}

pub struct EnergySupplierStartIsUniqueRule<'a> {
    pub energy_suppliers: &'a EnergySuppliers,
    pub start_of_supply: EffectiveDate,
}

impl BusinessRule for EnergySupplierStartIsUniqueRule<'_> {
    fn is_broken(&self) -> bool {
        self.energy_suppliers
            .iter()
            .any(|s| s.start_of_supply == self.start_of_supply)
    }

    fn error(&self) -> ValidationError {
        ValidationError::DuplicateEnergySupplierStart(self.start_of_supply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_down_is_reported_once() {
        let gsrn = GsrnNumber::create("571313100000000010").unwrap();
        let state_rule = PhysicalStateRule {
            operation: "connect",
            state: PhysicalState::ClosedDown,
            allowed: &[PhysicalState::New],
        };
        let closed_rule = MeteringPointIsClosedDownRule {
            gsrn: &gsrn,
            state: PhysicalState::ClosedDown,
        };
        assert!(!state_rule.is_broken());
        assert!(closed_rule.is_broken());
    }

    #[test]
    fn physical_state_rule() {
        let rule = PhysicalStateRule {
            operation: "connect",
            state: PhysicalState::Connected,
            allowed: &[PhysicalState::New],
        };
        assert!(rule.is_broken());
        assert_eq!(rule.error().code(), "D16");
    }
}
