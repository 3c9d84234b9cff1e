//! Master data of a metering point
//!
//! [`MasterDataInput`] carries the raw values of a market document;
//! [`MasterDataInput::build`] parses each into its value object and reports
//! every parse failure together.

use std::str::FromStr;

use uuid::Uuid;

use crate::domain::enumerations::{
    AssetType, ConnectionType, DisconnectionType, MeasurementUnitType, MeteringMethod,
    MeteringPointType, NetSettlementGroup, PriceAreaCode, ProductType, ReadingOccurrence,
    SettlementMethod,
};
use crate::domain::grid_area::GridAreaLinkId;
use crate::domain::rules::{BusinessRulesValidationResult, ValidationError};
use crate::domain::values::{
    Address, AddressInput, Capacity, EffectiveDate, GsrnNumber, MeterId, PowerLimit,
    ScheduledMeterReadingDate,
};

/// How a metering point is measured, and by which meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeteringConfiguration {
    pub method: MeteringMethod,
    pub meter: Option<MeterId>,
}

impl MeteringConfiguration {
    pub fn new(method: MeteringMethod, meter: Option<MeterId>) -> Self {
        Self { method, meter }
    }

    /// Parse raw method and meter values.
    pub fn parse(
        method: Option<&str>,
        meter: Option<&str>,
    ) -> Result<Self, BusinessRulesValidationResult> {
        let mut result = BusinessRulesValidationResult::valid();
        let method = required(&mut result, "metering_method", method, parse_enum::<MeteringMethod>);
        let meter = optional(&mut result, meter, MeterId::create);
        match method {
            Some(method) if result.success() => Ok(Self { method, meter }),
            _ => Err(result),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterData {
    pub address: Address,
    pub metering_configuration: MeteringConfiguration,
    pub reading_occurrence: ReadingOccurrence,
    pub product_type: ProductType,
    pub unit_type: MeasurementUnitType,
    pub power_limit: PowerLimit,
    pub settlement_method: Option<SettlementMethod>,
    pub net_settlement_group: Option<NetSettlementGroup>,
    pub disconnection_type: Option<DisconnectionType>,
    pub connection_type: Option<ConnectionType>,
    pub asset_type: Option<AssetType>,
    pub capacity: Option<Capacity>,
    pub scheduled_meter_reading_date: Option<ScheduledMeterReadingDate>,
    pub power_plant_gsrn: Option<GsrnNumber>,
    pub production_obligation: Option<bool>,
    pub exchange_from_grid_area: Option<GridAreaLinkId>,
    pub exchange_to_grid_area: Option<GridAreaLinkId>,
    pub effective_date: EffectiveDate,
}

/// Raw master data values. Enumerations accept either name or market code.
#[derive(Debug, Clone, Default)]
pub struct MasterDataInput {
    pub address: AddressInput,
    pub metering_method: Option<String>,
    pub meter_number: Option<String>,
    pub reading_occurrence: Option<String>,
    pub product_type: Option<String>,
    pub unit_type: Option<String>,
    pub maximum_power_kw: Option<i32>,
    pub maximum_current: Option<i32>,
    pub settlement_method: Option<String>,
    pub net_settlement_group: Option<String>,
    pub disconnection_type: Option<String>,
    pub connection_type: Option<String>,
    pub asset_type: Option<String>,
    pub capacity: Option<String>,
    pub scheduled_meter_reading_date: Option<String>,
    pub power_plant_gsrn: Option<String>,
    pub production_obligation: Option<bool>,
    pub exchange_from_grid_area: Option<Uuid>,
    pub exchange_to_grid_area: Option<Uuid>,
    pub effective_date: Option<String>,
}

/// Parse an enumeration by name, falling back to its market code.
pub(crate) fn parse_enum<T>(value: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError> + MarketCode,
{
    T::from_str(value).or_else(|err| T::from_market_code(value).map_err(|_| err))
}

/// Lookup by market code, implemented for every enumeration used in
/// master data.
pub(crate) trait MarketCode: Sized {
    fn from_market_code(code: &str) -> Result<Self, ValidationError>;
}

macro_rules! market_code {
    ($($t:ty),+) => {
        $(impl MarketCode for $t {
            fn from_market_code(code: &str) -> Result<Self, ValidationError> {
                <$t>::from_code(code)
            }
        })+
    };
}

market_code!(
    AssetType,
    ConnectionType,
    DisconnectionType,
    MeasurementUnitType,
    MeteringMethod,
    MeteringPointType,
    NetSettlementGroup,
    PriceAreaCode,
    ProductType,
    ReadingOccurrence,
    SettlementMethod
);

fn optional<T>(
    result: &mut BusinessRulesValidationResult,
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Option<T> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match parse(value) {
        Ok(v) => Some(v),
        Err(e) => {
            result.push(e);
            None
        }
    }
}

fn required<T>(
    result: &mut BusinessRulesValidationResult,
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Option<T> {
    if value.map(str::trim).filter(|v| !v.is_empty()).is_none() {
        result.push(ValidationError::MissingValue { field });
        return None;
    }
    optional(result, value, parse)
}

impl MasterDataInput {
    pub fn build(self) -> Result<MasterData, BusinessRulesValidationResult> {
        let mut result = BusinessRulesValidationResult::valid();

        let address = match Address::create(self.address) {
            Ok(address) => Some(address),
            Err(errors) => {
                result = result.merge(errors);
                None
            }
        };

        let metering_method = required(
            &mut result,
            "metering_method",
            self.metering_method.as_deref(),
            parse_enum::<MeteringMethod>,
        );
        let meter = optional(&mut result, self.meter_number.as_deref(), MeterId::create);
        let reading_occurrence = required(
            &mut result,
            "reading_occurrence",
            self.reading_occurrence.as_deref(),
            parse_enum::<ReadingOccurrence>,
        );
        let product_type = optional(
            &mut result,
            self.product_type.as_deref(),
            parse_enum::<ProductType>,
        )
        .unwrap_or(ProductType::EnergyActive);
        let unit_type = optional(
            &mut result,
            self.unit_type.as_deref(),
            parse_enum::<MeasurementUnitType>,
        )
        .unwrap_or(MeasurementUnitType::KWh);

        let power_limit = match PowerLimit::create(self.maximum_power_kw, self.maximum_current) {
            Ok(limit) => Some(limit),
            Err(e) => {
                result.push(e);
                None
            }
        };

        let settlement_method = optional(
            &mut result,
            self.settlement_method.as_deref(),
            parse_enum::<SettlementMethod>,
        );
        let net_settlement_group = optional(
            &mut result,
            self.net_settlement_group.as_deref(),
            parse_enum::<NetSettlementGroup>,
        );
        let disconnection_type = optional(
            &mut result,
            self.disconnection_type.as_deref(),
            parse_enum::<DisconnectionType>,
        );
        let connection_type = optional(
            &mut result,
            self.connection_type.as_deref(),
            parse_enum::<ConnectionType>,
        );
        let asset_type = optional(
            &mut result,
            self.asset_type.as_deref(),
            parse_enum::<AssetType>,
        );
        let capacity = optional(&mut result, self.capacity.as_deref(), Capacity::from_str);
        let scheduled_meter_reading_date = optional(
            &mut result,
            self.scheduled_meter_reading_date.as_deref(),
            ScheduledMeterReadingDate::create,
        );
        let power_plant_gsrn = optional(
            &mut result,
            self.power_plant_gsrn.as_deref(),
            GsrnNumber::create,
        );
        let effective_date = required(
            &mut result,
            "effective_date",
            self.effective_date.as_deref(),
            EffectiveDate::create,
        );

        match (
            address,
            metering_method,
            reading_occurrence,
            power_limit,
            effective_date,
        ) {
            (
                Some(address),
                Some(method),
                Some(reading_occurrence),
                Some(power_limit),
                Some(effective_date),
            ) if result.success() => Ok(MasterData {
                address,
                metering_configuration: MeteringConfiguration::new(method, meter),
                reading_occurrence,
                product_type,
                unit_type,
                power_limit,
                settlement_method,
                net_settlement_group,
                disconnection_type,
                connection_type,
                asset_type,
                capacity,
                scheduled_meter_reading_date,
                power_plant_gsrn,
                production_obligation: self.production_obligation,
                exchange_from_grid_area: self.exchange_from_grid_area.map(GridAreaLinkId),
                exchange_to_grid_area: self.exchange_to_grid_area.map(GridAreaLinkId),
                effective_date,
            }),
            _ => Err(result),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let md = consumption_master_data();
        assert_eq!(md.product_type, ProductType::EnergyActive);
        assert_eq!(md.unit_type, MeasurementUnitType::KWh);
        assert_eq!(md.metering_configuration.method, MeteringMethod::Physical);
        assert_eq!(md.net_settlement_group, Some(NetSettlementGroup::Zero));
    }

    #[test]
    fn accepts_market_codes() {
        let md = MasterDataInput {
            metering_method: Some("D02".into()),
            meter_number: None,
            reading_occurrence: Some("PT15M".into()),
            settlement_method: Some("E02".into()),
            ..consumption_input()
        }
        .build()
        .unwrap();
        assert_eq!(md.metering_configuration.method, MeteringMethod::Virtual);
        assert_eq!(md.reading_occurrence, ReadingOccurrence::Quarterly);
        assert_eq!(md.settlement_method, Some(SettlementMethod::NonProfiled));
    }

    #[test]
    fn collects_all_parse_errors() {
        let result = MasterDataInput {
            metering_method: None,
            reading_occurrence: Some("Weekly".into()),
            capacity: Some("1.23".into()),
            effective_date: Some("yesterday".into()),
            ..consumption_input()
        }
        .build()
        .unwrap_err();

        let errors = result.errors();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::MissingValue {
            field: "metering_method"
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidEffectiveDate(_))));
    }

    #[test]
    fn metering_configuration_parse() {
        let config = MeteringConfiguration::parse(Some("Physical"), Some("ABC1")).unwrap();
        assert_eq!(config.meter.unwrap().as_str(), "ABC1");
        assert!(MeteringConfiguration::parse(None, None).is_err());
        assert!(MeteringConfiguration::parse(Some("Physical"), Some("bad id!")).is_err());
    }
}
