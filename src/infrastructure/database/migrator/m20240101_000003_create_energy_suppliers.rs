//! Create energy_suppliers table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_metering_points::MeteringPoints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EnergySuppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnergySuppliers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnergySuppliers::MeteringPointId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnergySuppliers::Gln).string_len(13).not_null())
                    .col(
                        ColumnDef::new(EnergySuppliers::StartOfSupply)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_suppliers_metering_point")
                            .from(EnergySuppliers::Table, EnergySuppliers::MeteringPointId)
                            .to(MeteringPoints::Table, MeteringPoints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One supplier per start date
        manager
            .create_index(
                Index::create()
                    .name("idx_energy_suppliers_mp_start")
                    .table(EnergySuppliers::Table)
                    .col(EnergySuppliers::MeteringPointId)
                    .col(EnergySuppliers::StartOfSupply)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EnergySuppliers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum EnergySuppliers {
    Table,
    Id,
    MeteringPointId,
    Gln,
    StartOfSupply,
}
