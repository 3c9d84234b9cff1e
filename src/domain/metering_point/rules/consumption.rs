//! Consumption metering point rules

use crate::domain::enumerations::{MeteringMethod, NetSettlementGroup, SettlementMethod};
use crate::domain::metering_point::master_data::{MasterData, MeteringConfiguration};
use crate::domain::rules::{BusinessRule, ValidationError};

use super::common::{ValueIsRequiredRule, ValueNotAllowedRule};
use super::net_settlement::{ConnectionTypeRule, ProductionDetailRequirementRule};

/// Settlement method must be given and be Flex or NonProfiled.
pub struct SettlementMethodRule {
    pub settlement_method: Option<SettlementMethod>,
}

impl BusinessRule for SettlementMethodRule {
    fn is_broken(&self) -> bool {
        !matches!(
            self.settlement_method,
            Some(SettlementMethod::Flex) | Some(SettlementMethod::NonProfiled)
        )
    }

    fn error(&self) -> ValidationError {
        match self.settlement_method {
            None => ValidationError::MissingValue {
                field: "settlement_method",
            },
            Some(method) => ValidationError::ValueNotAllowed {
                field: "settlement_method",
                reason: format!("{} is not allowed for consumption", method),
            },
        }
    }
}

/// Calculated metering is reserved for net settlement group 99.
pub struct MeteringMethodRule<'a> {
    pub net_settlement_group: Option<NetSettlementGroup>,
    pub configuration: &'a MeteringConfiguration,
}

impl BusinessRule for MeteringMethodRule<'_> {
    fn is_broken(&self) -> bool {
        self.configuration.method == MeteringMethod::Calculated
            && self.net_settlement_group != Some(NetSettlementGroup::NinetyNine)
    }

    fn error(&self) -> ValidationError {
        ValidationError::ValueNotAllowed {
            field: "metering_method",
            reason: "Calculated is only allowed for net settlement group 99".to_string(),
        }
    }
}

/// Scheduled meter reading date is required for group 6 and forbidden for
/// every other group.
pub struct ScheduledMeterReadingDateRule {
    pub net_settlement_group: Option<NetSettlementGroup>,
    pub present: bool,
}

impl BusinessRule for ScheduledMeterReadingDateRule {
    fn is_broken(&self) -> bool {
        let required = self.net_settlement_group == Some(NetSettlementGroup::Six);
        required != self.present
    }

    fn error(&self) -> ValidationError {
        if self.present {
            ValidationError::ValueNotAllowed {
                field: "scheduled_meter_reading_date",
                reason: "only net settlement group 6 has a scheduled meter reading date"
                    .to_string(),
            }
        } else {
            ValidationError::MissingValue {
                field: "scheduled_meter_reading_date",
            }
        }
    }
}

pub fn master_data_rules(md: &MasterData) -> Vec<Box<dyn BusinessRule + '_>> {
    let group = md.net_settlement_group;
    vec![
        Box::new(SettlementMethodRule {
            settlement_method: md.settlement_method,
        }),
        Box::new(ValueIsRequiredRule::new(
            "net_settlement_group",
            &md.net_settlement_group,
        )),
        Box::new(ValueIsRequiredRule::new(
            "disconnection_type",
            &md.disconnection_type,
        )),
        Box::new(MeteringMethodRule {
            net_settlement_group: group,
            configuration: &md.metering_configuration,
        }),
        Box::new(ScheduledMeterReadingDateRule {
            net_settlement_group: group,
            present: md.scheduled_meter_reading_date.is_some(),
        }),
        Box::new(ConnectionTypeRule {
            net_settlement_group: group,
            present: md.connection_type.is_some(),
        }),
        Box::new(ProductionDetailRequirementRule::new(
            "power_plant_gsrn",
            group,
            &md.power_plant_gsrn,
        )),
        Box::new(ProductionDetailRequirementRule::new(
            "asset_type",
            group,
            &md.asset_type,
        )),
        Box::new(ProductionDetailRequirementRule::new(
            "capacity",
            group,
            &md.capacity,
        )),
        Box::new(ValueNotAllowedRule::new(
            "exchange_from_grid_area",
            &md.exchange_from_grid_area,
            "only exchange metering points connect grid areas",
        )),
        Box::new(ValueNotAllowedRule::new(
            "exchange_to_grid_area",
            &md.exchange_to_grid_area,
            "only exchange metering points connect grid areas",
        )),
    ]
}

pub fn metering_configuration_rules<'a>(
    md: &'a MasterData,
    configuration: &'a MeteringConfiguration,
) -> Vec<Box<dyn BusinessRule + 'a>> {
    vec![Box::new(MeteringMethodRule {
        net_settlement_group: md.net_settlement_group,
        configuration,
    })]
}
