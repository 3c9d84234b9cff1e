//! Rules driven by the net settlement group, shared by consumption and
//! production points

use crate::domain::enumerations::NetSettlementGroup;
use crate::domain::rules::{BusinessRule, ValidationError};

/// Connection type is forbidden for group 0 and required for every other
/// group. Without a group the rule has nothing to say; the missing group is
/// reported on its own.
pub struct ConnectionTypeRule {
    pub net_settlement_group: Option<NetSettlementGroup>,
    pub present: bool,
}

impl BusinessRule for ConnectionTypeRule {
    fn is_broken(&self) -> bool {
        match self.net_settlement_group {
            None => false,
            Some(NetSettlementGroup::Zero) => self.present,
            Some(_) => !self.present,
        }
    }

    fn error(&self) -> ValidationError {
        if self.present {
            ValidationError::ValueNotAllowed {
                field: "connection_type",
                reason: "net settlement group 0 has no connection type".to_string(),
            }
        } else {
            ValidationError::MissingValue {
                field: "connection_type",
            }
        }
    }
}

/// Power plant, asset type and capacity are required for net settlement
/// groups 1, 2, 3 and 6.
pub struct ProductionDetailRequirementRule {
    pub field: &'static str,
    pub net_settlement_group: Option<NetSettlementGroup>,
    pub present: bool,
}

impl ProductionDetailRequirementRule {
    pub fn new<T>(
        field: &'static str,
        net_settlement_group: Option<NetSettlementGroup>,
        value: &Option<T>,
    ) -> Self {
        Self {
            field,
            net_settlement_group,
            present: value.is_some(),
        }
    }
}

impl BusinessRule for ProductionDetailRequirementRule {
    fn is_broken(&self) -> bool {
        let required = self
            .net_settlement_group
            .is_some_and(|g| g.requires_production_details());
        required && !self.present
    }

    fn error(&self) -> ValidationError {
        ValidationError::MissingValue { field: self.field }
    }
}
