//! Metering point business rules, grouped per metering point type

pub mod address;
pub mod common;
pub mod consumption;
pub mod exchange;
pub mod net_settlement;
pub mod production;
pub mod state;

use crate::domain::enumerations::MeteringPointType;
use crate::domain::rules::{BusinessRule, BusinessRulesValidationResult};
use crate::domain::values::Address;

use self::address::{
    CityIsRequiredRule, GeoInfoReferenceRequirementRule, PostCodeIsRequiredRule,
    StreetNameIsRequiredRule,
};
use self::common::{MeterIdRequirementRule, ProductTypeRule, ReadingOccurrenceRule, UnitTypeRule};
use super::master_data::{MasterData, MeteringConfiguration};

/// Selects and evaluates the rule set for a metering point type.
pub struct MasterDataValidator;

impl MasterDataValidator {
    /// Full master data check, used on creation.
    pub fn check_rules_for(
        metering_point_type: MeteringPointType,
        md: &MasterData,
    ) -> BusinessRulesValidationResult {
        let mut rules: Vec<Box<dyn BusinessRule + '_>> = vec![
            Box::new(ReadingOccurrenceRule {
                reading_occurrence: md.reading_occurrence,
            }),
            Box::new(ProductTypeRule {
                product_type: md.product_type,
            }),
            Box::new(UnitTypeRule {
                unit_type: md.unit_type,
            }),
        ];
        rules.extend(address_rules(metering_point_type, &md.address));
        rules.extend(metering_configuration_rules(
            metering_point_type,
            md,
            &md.metering_configuration,
        ));
        rules.extend(match metering_point_type {
            MeteringPointType::Consumption => consumption::master_data_rules(md),
            MeteringPointType::Production => production::master_data_rules(md),
            MeteringPointType::Exchange => exchange::master_data_rules(md),
        });

        let result = BusinessRulesValidationResult::from_rules(rules);
        dedup(result)
    }

    pub fn check_address(
        metering_point_type: MeteringPointType,
        address: &Address,
    ) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules(address_rules(metering_point_type, address))
    }

    /// Check a new metering configuration against the rest of the current
    /// master data.
    pub fn check_metering_configuration(
        metering_point_type: MeteringPointType,
        md: &MasterData,
        configuration: &MeteringConfiguration,
    ) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules(metering_configuration_rules(
            metering_point_type,
            md,
            configuration,
        ))
    }
}

fn address_rules(
    metering_point_type: MeteringPointType,
    address: &Address,
) -> Vec<Box<dyn BusinessRule + '_>> {
    let mut rules: Vec<Box<dyn BusinessRule + '_>> =
        vec![Box::new(GeoInfoReferenceRequirementRule { address })];
    if metering_point_type != MeteringPointType::Exchange {
        rules.push(Box::new(StreetNameIsRequiredRule { address }));
        rules.push(Box::new(PostCodeIsRequiredRule { address }));
        rules.push(Box::new(CityIsRequiredRule { address }));
    }
    rules
}

fn metering_configuration_rules<'a>(
    metering_point_type: MeteringPointType,
    md: &'a MasterData,
    configuration: &'a MeteringConfiguration,
) -> Vec<Box<dyn BusinessRule + 'a>> {
    let mut rules: Vec<Box<dyn BusinessRule + 'a>> =
        vec![Box::new(MeterIdRequirementRule { configuration })];
    if metering_point_type == MeteringPointType::Consumption {
        rules.extend(consumption::metering_configuration_rules(md, configuration));
    }
    rules
}

// The full check runs the metering method rule from both the configuration
// and the consumption set; report it once.
fn dedup(result: BusinessRulesValidationResult) -> BusinessRulesValidationResult {
    let mut errors = Vec::new();
    for e in result.into_errors() {
        if !errors.contains(&e) {
            errors.push(e);
        }
    }
    BusinessRulesValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enumerations::{MeteringMethod, NetSettlementGroup, ReadingOccurrence};
    use crate::domain::grid_area::GridAreaLinkId;
    use crate::domain::metering_point::master_data::fixtures::*;
    use crate::domain::metering_point::master_data::MasterDataInput;
    use crate::domain::rules::ValidationError;
    use crate::domain::values::AddressInput;

    #[test]
    fn valid_consumption() {
        let md = consumption_master_data();
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Consumption, &md);
        assert!(result.success(), "{:?}", result.errors());
    }

    #[test]
    fn consumption_group_six_needs_production_details() {
        let md = MasterDataInput {
            net_settlement_group: Some("Six".into()),
            ..consumption_input()
        }
        .build()
        .unwrap();
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Consumption, &md);
        let missing: Vec<_> = result
            .errors()
            .iter()
            .filter_map(|e| match e {
                ValidationError::MissingValue { field } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(
            missing,
            vec![
                "scheduled_meter_reading_date",
                "connection_type",
                "power_plant_gsrn",
                "asset_type",
                "capacity"
            ]
        );
    }

    #[test]
    fn calculated_method_reported_once() {
        let mut md = consumption_master_data();
        md.metering_configuration = MeteringConfiguration::new(MeteringMethod::Calculated, None);
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Consumption, &md);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn production_rejects_settlement_method() {
        let md = MasterDataInput {
            asset_type: Some("WindTurbines".into()),
            ..consumption_input()
        }
        .build()
        .unwrap();
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Production, &md);
        assert_eq!(
            result.errors(),
            &[ValidationError::ValueNotAllowed {
                field: "settlement_method",
                reason: "production metering points are not settled".into(),
            }]
        );
    }

    #[test]
    fn exchange_requires_grid_areas_but_not_street() {
        let md = MasterDataInput {
            address: AddressInput::default(),
            settlement_method: None,
            net_settlement_group: None,
            disconnection_type: None,
            exchange_from_grid_area: Some(GridAreaLinkId::new().0),
            exchange_to_grid_area: Some(GridAreaLinkId::new().0),
            ..consumption_input()
        }
        .build()
        .unwrap();
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Exchange, &md);
        assert!(result.success(), "{:?}", result.errors());

        let result = MasterDataValidator::check_rules_for(MeteringPointType::Consumption, &md);
        assert!(!result.success());
    }

    #[test]
    fn reading_occurrence_and_address_rules_combine() {
        let mut md = consumption_master_data();
        md.reading_occurrence = ReadingOccurrence::Yearly;
        md.net_settlement_group = Some(NetSettlementGroup::Zero);
        md.address = Address::default();
        let result = MasterDataValidator::check_rules_for(MeteringPointType::Consumption, &md);
        assert_eq!(result.errors().len(), 4);
    }
}
