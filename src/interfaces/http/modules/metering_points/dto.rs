//! Metering point DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::market::AddressDto;
use crate::application::services::{EnergySupplierSnapshot, MeteringPointDetails};
use crate::domain::metering_point::{EnergySupplierDetails, MasterData};
use crate::domain::values::Address;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeteringPointDto {
    pub id: Uuid,
    pub gsrn: String,
    pub metering_point_type: String,
    pub grid_area_link_id: Uuid,
    /// GSRN of the parent metering point
    pub parent_related_metering_point: Option<String>,
    pub parent_related_metering_point_id: Option<Uuid>,
    pub physical_state: String,
    pub master_data: MasterDataDto,
    pub energy_suppliers: Vec<EnergySupplierDto>,
    pub connected_at: Option<DateTime<Utc>>,
    pub closed_down_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl MeteringPointDto {
    pub fn from_domain(details: &MeteringPointDetails) -> Self {
        let mp = &details.metering_point;
        Self {
            id: mp.id().0,
            gsrn: mp.gsrn().to_string(),
            metering_point_type: mp.metering_point_type().name().to_string(),
            grid_area_link_id: mp.grid_area_link_id().0,
            parent_related_metering_point: details.parent_gsrn.as_ref().map(|g| g.to_string()),
            parent_related_metering_point_id: mp.parent_related_metering_point().map(|id| id.0),
            physical_state: mp.physical_state().name().to_string(),
            master_data: MasterDataDto::from_domain(mp.master_data()),
            energy_suppliers: mp
                .energy_suppliers()
                .iter()
                .map(EnergySupplierDto::from_domain)
                .collect(),
            connected_at: mp.connected_at().map(|d| d.as_datetime()),
            closed_down_at: mp.closed_down_at().map(|d| d.as_datetime()),
            created_at: mp.created_at(),
            version: mp.version(),
        }
    }
}

/// Master data with enumerations rendered by name
#[derive(Debug, Serialize, ToSchema)]
pub struct MasterDataDto {
    pub address: AddressDto,
    pub metering_method: String,
    pub meter_number: Option<String>,
    pub reading_occurrence: String,
    pub product_type: String,
    pub unit_type: String,
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
    pub effective_date: DateTime<Utc>,
}

fn name<T: ToString>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

impl MasterDataDto {
    pub fn from_domain(md: &MasterData) -> Self {
        Self {
            address: address_dto(&md.address),
            metering_method: md.metering_configuration.method.name().to_string(),
            meter_number: name(md.metering_configuration.meter.as_ref()),
            reading_occurrence: md.reading_occurrence.name().to_string(),
            product_type: md.product_type.name().to_string(),
            unit_type: md.unit_type.name().to_string(),
            maximum_power_kw: md.power_limit.kw(),
            maximum_current: md.power_limit.ampere(),
            settlement_method: name(md.settlement_method),
            net_settlement_group: name(md.net_settlement_group),
            disconnection_type: name(md.disconnection_type),
            connection_type: name(md.connection_type),
            asset_type: name(md.asset_type),
            capacity: name(md.capacity),
            scheduled_meter_reading_date: name(md.scheduled_meter_reading_date),
            power_plant_gsrn: name(md.power_plant_gsrn.as_ref()),
            production_obligation: md.production_obligation,
            exchange_from_grid_area: md.exchange_from_grid_area.map(|id| id.0),
            exchange_to_grid_area: md.exchange_to_grid_area.map(|id| id.0),
            effective_date: md.effective_date.as_datetime(),
        }
    }
}

pub fn address_dto(address: &Address) -> AddressDto {
    let input = address.to_input();
    AddressDto {
        street_name: input.street_name,
        street_code: input.street_code,
        building_number: input.building_number,
        city: input.city,
        city_sub_division: input.city_sub_division,
        post_code: input.post_code,
        country_code: Some(address.country_code().code().to_string()),
        floor: input.floor,
        room: input.room,
        municipality_code: input.municipality_code,
        location_description: input.location_description,
        geo_info_reference: input.geo_info_reference,
        is_actual_address: input.is_actual_address,
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnergySupplierDto {
    pub gln: String,
    pub start_of_supply: DateTime<Utc>,
}

impl EnergySupplierDto {
    pub fn from_domain(details: &EnergySupplierDetails) -> Self {
        Self {
            gln: details.gln.to_string(),
            start_of_supply: details.start_of_supply.as_datetime(),
        }
    }
}

/// Supplier responsible at `at` and the ones lined up after it
#[derive(Debug, Serialize, ToSchema)]
pub struct EnergySupplierSnapshotDto {
    pub at: DateTime<Utc>,
    pub current: Option<EnergySupplierDto>,
    pub future: Vec<EnergySupplierDto>,
}

impl From<EnergySupplierSnapshot> for EnergySupplierSnapshotDto {
    fn from(snapshot: EnergySupplierSnapshot) -> Self {
        Self {
            at: snapshot.at.as_datetime(),
            current: snapshot.current.as_ref().map(EnergySupplierDto::from_domain),
            future: snapshot
                .future
                .iter()
                .map(EnergySupplierDto::from_domain)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EnergySupplierQuery {
    /// `yyyy-MM-ddTHH:mm:ssZ`, defaults to now
    pub at: Option<String>,
}
