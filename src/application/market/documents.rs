//! Market documents received from market actors
//!
//! Every business process starts from one [`MarketDocument`]. Payloads
//! derive `Validate` for the format checks that run before any business
//! rule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::metering_point::MasterDataInput;
use crate::domain::values::{AddressInput, GlnNumber};

/// Envelope of a market request.
///
/// `Validate` only covers the envelope. Payload checks run inside the
/// business process so that they end up in the rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MarketDocument<T> {
    /// Sender's id for this request; a second request with the same id is
    /// rejected.
    #[validate(custom(function = "not_blank"))]
    pub transaction_id: String,
    /// GLN of the sending market actor
    #[validate(custom(function = "valid_gln"))]
    pub sender_gln: String,
    pub payload: T,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(
            validator::ValidationError::new("required").with_message("is required".into()),
        );
    }
    Ok(())
}

fn valid_gln(value: &str) -> Result<(), validator::ValidationError> {
    GlnNumber::create(value).map(|_| ()).map_err(|e| {
        validator::ValidationError::new("gln").with_message(e.to_string().into())
    })
}

impl<T> MarketDocument<T> {
    pub fn new(
        transaction_id: impl Into<String>,
        sender_gln: impl Into<String>,
        payload: T,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_gln: sender_gln.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddressDto {
    #[validate(length(max = 100))]
    pub street_name: Option<String>,
    pub street_code: Option<String>,
    pub building_number: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    pub city_sub_division: Option<String>,
    pub post_code: Option<String>,
    pub country_code: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub municipality_code: Option<i32>,
    #[validate(length(max = 255))]
    pub location_description: Option<String>,
    pub geo_info_reference: Option<Uuid>,
    pub is_actual_address: Option<bool>,
}

impl From<AddressDto> for AddressInput {
    fn from(dto: AddressDto) -> Self {
        AddressInput {
            street_name: dto.street_name,
            street_code: dto.street_code,
            building_number: dto.building_number,
            city: dto.city,
            city_sub_division: dto.city_sub_division,
            post_code: dto.post_code,
            country_code: dto.country_code,
            floor: dto.floor,
            room: dto.room,
            municipality_code: dto.municipality_code,
            location_description: dto.location_description,
            geo_info_reference: dto.geo_info_reference,
            is_actual_address: dto.is_actual_address,
        }
    }
}

/// Request to register a new metering point. Enumeration values accept the
/// name (`Consumption`) or the market code (`E17`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMeteringPoint {
    #[validate(length(min = 1, message = "is required"))]
    pub gsrn: String,
    #[validate(length(min = 1, message = "is required"))]
    pub metering_point_type: String,
    /// Grid area code
    #[validate(length(min = 1, message = "is required"))]
    pub grid_area: String,
    /// GSRN of the parent metering point
    pub parent_related_metering_point: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub address: AddressDto,
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
    /// Capacity in kW, at most one decimal
    pub capacity: Option<String>,
    /// `MMdd`
    pub scheduled_meter_reading_date: Option<String>,
    pub power_plant_gsrn: Option<String>,
    pub production_obligation: Option<bool>,
    /// Grid area code the exchange point measures from
    pub exchange_from_grid_area: Option<String>,
    pub exchange_to_grid_area: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub effective_date: String,
}

impl CreateMeteringPoint {
    /// Master data input with exchange grid areas already resolved to link
    /// ids.
    pub fn master_data_input(
        &self,
        exchange_from_grid_area: Option<Uuid>,
        exchange_to_grid_area: Option<Uuid>,
    ) -> MasterDataInput {
        MasterDataInput {
            address: self.address.clone().into(),
            metering_method: self.metering_method.clone(),
            meter_number: self.meter_number.clone(),
            reading_occurrence: self.reading_occurrence.clone(),
            product_type: self.product_type.clone(),
            unit_type: self.unit_type.clone(),
            maximum_power_kw: self.maximum_power_kw,
            maximum_current: self.maximum_current,
            settlement_method: self.settlement_method.clone(),
            net_settlement_group: self.net_settlement_group.clone(),
            disconnection_type: self.disconnection_type.clone(),
            connection_type: self.connection_type.clone(),
            asset_type: self.asset_type.clone(),
            capacity: self.capacity.clone(),
            scheduled_meter_reading_date: self.scheduled_meter_reading_date.clone(),
            power_plant_gsrn: self.power_plant_gsrn.clone(),
            production_obligation: self.production_obligation,
            exchange_from_grid_area,
            exchange_to_grid_area,
            effective_date: Some(self.effective_date.clone()),
        }
    }
}

/// Connect, disconnect, reconnect and close down only carry a date.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PhysicalStateChange {
    #[validate(length(min = 1, message = "is required"))]
    pub effective_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangeAddress {
    #[validate(nested)]
    pub address: AddressDto,
    #[validate(length(min = 1, message = "is required"))]
    pub effective_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangeMeteringConfiguration {
    #[validate(length(min = 1, message = "is required"))]
    pub metering_method: String,
    pub meter_number: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub effective_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangeEnergySupplier {
    #[validate(length(min = 1, message = "is required"))]
    pub energy_supplier_gln: String,
    #[validate(length(min = 1, message = "is required"))]
    pub start_of_supply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateGridArea {
    #[validate(length(equal = 3, message = "must be 3 digits"))]
    pub code: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// DK1 or DK2
    pub price_area: String,
    pub operator_gln: String,
}
