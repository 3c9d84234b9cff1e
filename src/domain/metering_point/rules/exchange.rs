//! Exchange metering point rules

use crate::domain::grid_area::GridAreaLinkId;
use crate::domain::metering_point::master_data::MasterData;
use crate::domain::rules::{BusinessRule, ValidationError};

use super::common::ValueNotAllowedRule;

/// An exchange point measures the flow between two different grid areas.
pub struct ExchangeGridAreasRule {
    pub from: Option<GridAreaLinkId>,
    pub to: Option<GridAreaLinkId>,
}

impl BusinessRule for ExchangeGridAreasRule {
    fn is_broken(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from == to,
            _ => true,
        }
    }

    fn error(&self) -> ValidationError {
        match (self.from, self.to) {
            (None, _) => ValidationError::MissingValue {
                field: "exchange_from_grid_area",
            },
            (_, None) => ValidationError::MissingValue {
                field: "exchange_to_grid_area",
            },
            _ => ValidationError::ValueNotAllowed {
                field: "exchange_to_grid_area",
                reason: "from and to grid area must differ".to_string(),
            },
        }
    }
}

pub fn master_data_rules(md: &MasterData) -> Vec<Box<dyn BusinessRule + '_>> {
    vec![
        Box::new(ExchangeGridAreasRule {
            from: md.exchange_from_grid_area,
            to: md.exchange_to_grid_area,
        }),
        Box::new(ValueNotAllowedRule::new(
            "settlement_method",
            &md.settlement_method,
            "exchange metering points are not settled",
        )),
        Box::new(ValueNotAllowedRule::new(
            "net_settlement_group",
            &md.net_settlement_group,
            "exchange metering points have no net settlement group",
        )),
        Box::new(ValueNotAllowedRule::new(
            "scheduled_meter_reading_date",
            &md.scheduled_meter_reading_date,
            "exchange metering points have no scheduled meter reading date",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_areas_must_differ() {
        let a = GridAreaLinkId::new();
        let b = GridAreaLinkId::new();
        assert!(!ExchangeGridAreasRule {
            from: Some(a),
            to: Some(b)
        }
        .is_broken());

        let same = ExchangeGridAreasRule {
            from: Some(a),
            to: Some(a),
        };
        assert!(same.is_broken());
        assert!(matches!(same.error(), ValidationError::ValueNotAllowed { .. }));

        let missing = ExchangeGridAreasRule {
            from: Some(a),
            to: None,
        };
        assert_eq!(
            missing.error(),
            ValidationError::MissingValue {
                field: "exchange_to_grid_area"
            }
        );
    }
}
