//! MeteringPoint entity
//!
//! Master data is flattened into columns. Enumerations are stored by name.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "metering_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub gsrn: String,

    /// Consumption, Production or Exchange
    pub metering_point_type: String,

    pub grid_area_link_id: String,

    #[sea_orm(nullable)]
    pub parent_related_metering_point: Option<String>,

    /// New, Connected, Disconnected, ClosedDown
    pub physical_state: String,

    // ── Address ──
    #[sea_orm(nullable)]
    pub street_name: Option<String>,
    #[sea_orm(nullable)]
    pub street_code: Option<String>,
    #[sea_orm(nullable)]
    pub building_number: Option<String>,
    #[sea_orm(nullable)]
    pub city: Option<String>,
    #[sea_orm(nullable)]
    pub city_sub_division: Option<String>,
    #[sea_orm(nullable)]
    pub post_code: Option<String>,
    pub country_code: String,
    #[sea_orm(nullable)]
    pub floor: Option<String>,
    #[sea_orm(nullable)]
    pub room: Option<String>,
    #[sea_orm(nullable)]
    pub municipality_code: Option<i32>,
    #[sea_orm(nullable)]
    pub location_description: Option<String>,
    #[sea_orm(nullable)]
    pub geo_info_reference: Option<String>,
    #[sea_orm(nullable)]
    pub is_actual_address: Option<bool>,

    // ── Master data ──
    pub metering_method: String,
    #[sea_orm(nullable)]
    pub meter_number: Option<String>,
    pub reading_occurrence: String,
    pub product_type: String,
    pub unit_type: String,
    #[sea_orm(nullable)]
    pub maximum_power_kw: Option<i32>,
    #[sea_orm(nullable)]
    pub maximum_current: Option<i32>,
    #[sea_orm(nullable)]
    pub settlement_method: Option<String>,
    #[sea_orm(nullable)]
    pub net_settlement_group: Option<String>,
    #[sea_orm(nullable)]
    pub disconnection_type: Option<String>,
    #[sea_orm(nullable)]
    pub connection_type: Option<String>,
    #[sea_orm(nullable)]
    pub asset_type: Option<String>,
    /// Decimal kW, stored as text
    #[sea_orm(nullable)]
    pub capacity: Option<String>,
    #[sea_orm(nullable)]
    pub scheduled_meter_reading_date: Option<String>,
    #[sea_orm(nullable)]
    pub power_plant_gsrn: Option<String>,
    #[sea_orm(nullable)]
    pub production_obligation: Option<bool>,
    #[sea_orm(nullable)]
    pub exchange_from_grid_area: Option<String>,
    #[sea_orm(nullable)]
    pub exchange_to_grid_area: Option<String>,
    pub effective_date: DateTimeUtc,

    #[sea_orm(nullable)]
    pub connected_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub closed_down_at: Option<DateTimeUtc>,

    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::energy_supplier::Entity")]
    EnergySuppliers,
}

impl Related<super::energy_supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnergySuppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
