//! Production metering point rules

use crate::domain::metering_point::master_data::MasterData;
use crate::domain::rules::BusinessRule;

use super::common::{ValueIsRequiredRule, ValueNotAllowedRule};
use super::net_settlement::{ConnectionTypeRule, ProductionDetailRequirementRule};

pub fn master_data_rules(md: &MasterData) -> Vec<Box<dyn BusinessRule + '_>> {
    let group = md.net_settlement_group;
    vec![
        Box::new(ValueIsRequiredRule::new(
            "net_settlement_group",
            &md.net_settlement_group,
        )),
        Box::new(ValueIsRequiredRule::new(
            "disconnection_type",
            &md.disconnection_type,
        )),
        Box::new(ValueIsRequiredRule::new("asset_type", &md.asset_type)),
        Box::new(ValueNotAllowedRule::new(
            "settlement_method",
            &md.settlement_method,
            "production metering points are not settled",
        )),
        Box::new(ValueNotAllowedRule::new(
            "scheduled_meter_reading_date",
            &md.scheduled_meter_reading_date,
            "production metering points have no scheduled meter reading date",
        )),
        Box::new(ConnectionTypeRule {
            net_settlement_group: group,
            present: md.connection_type.is_some(),
        }),
        Box::new(ProductionDetailRequirementRule::new(
            "power_plant_gsrn",
            group,
            &md.power_plant_gsrn,
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
