//! EnergySupplier entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "energy_suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub metering_point_id: String,

    pub gln: String,

    pub start_of_supply: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::metering_point::Entity",
        from = "Column::MeteringPointId",
        to = "super::metering_point::Column::Id"
    )]
    MeteringPoint,
}

impl Related<super::metering_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeteringPoint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
