//! Create metering_points table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeteringPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeteringPoints::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MeteringPoints::Gsrn)
                            .string_len(18)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MeteringPoints::MeteringPointType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeteringPoints::GridAreaLinkId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeteringPoints::ParentRelatedMeteringPoint).string())
                    .col(
                        ColumnDef::new(MeteringPoints::PhysicalState)
                            .string()
                            .not_null()
                            .default("New"),
                    )
                    // Address
                    .col(ColumnDef::new(MeteringPoints::StreetName).string())
                    .col(ColumnDef::new(MeteringPoints::StreetCode).string())
                    .col(ColumnDef::new(MeteringPoints::BuildingNumber).string())
                    .col(ColumnDef::new(MeteringPoints::City).string())
                    .col(ColumnDef::new(MeteringPoints::CitySubDivision).string())
                    .col(ColumnDef::new(MeteringPoints::PostCode).string())
                    .col(
                        ColumnDef::new(MeteringPoints::CountryCode)
                            .string()
                            .not_null()
                            .default("DK"),
                    )
                    .col(ColumnDef::new(MeteringPoints::Floor).string())
                    .col(ColumnDef::new(MeteringPoints::Room).string())
                    .col(ColumnDef::new(MeteringPoints::MunicipalityCode).integer())
                    .col(ColumnDef::new(MeteringPoints::LocationDescription).string())
                    .col(ColumnDef::new(MeteringPoints::GeoInfoReference).string())
                    .col(ColumnDef::new(MeteringPoints::IsActualAddress).boolean())
                    // Master data
                    .col(
                        ColumnDef::new(MeteringPoints::MeteringMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeteringPoints::MeterNumber).string())
                    .col(
                        ColumnDef::new(MeteringPoints::ReadingOccurrence)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeteringPoints::ProductType).string().not_null())
                    .col(ColumnDef::new(MeteringPoints::UnitType).string().not_null())
                    .col(ColumnDef::new(MeteringPoints::MaximumPowerKw).integer())
                    .col(ColumnDef::new(MeteringPoints::MaximumCurrent).integer())
                    .col(ColumnDef::new(MeteringPoints::SettlementMethod).string())
                    .col(ColumnDef::new(MeteringPoints::NetSettlementGroup).string())
                    .col(ColumnDef::new(MeteringPoints::DisconnectionType).string())
                    .col(ColumnDef::new(MeteringPoints::ConnectionType).string())
                    .col(ColumnDef::new(MeteringPoints::AssetType).string())
                    .col(ColumnDef::new(MeteringPoints::Capacity).string())
                    .col(ColumnDef::new(MeteringPoints::ScheduledMeterReadingDate).string())
                    .col(ColumnDef::new(MeteringPoints::PowerPlantGsrn).string())
                    .col(ColumnDef::new(MeteringPoints::ProductionObligation).boolean())
                    .col(ColumnDef::new(MeteringPoints::ExchangeFromGridArea).string())
                    .col(ColumnDef::new(MeteringPoints::ExchangeToGridArea).string())
                    .col(
                        ColumnDef::new(MeteringPoints::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeteringPoints::ConnectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MeteringPoints::ClosedDownAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MeteringPoints::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(MeteringPoints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeteringPoints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metering_points_grid_area")
                    .table(MeteringPoints::Table)
                    .col(MeteringPoints::GridAreaLinkId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeteringPoints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MeteringPoints {
    Table,
    Id,
    Gsrn,
    MeteringPointType,
    GridAreaLinkId,
    ParentRelatedMeteringPoint,
    PhysicalState,
    StreetName,
    StreetCode,
    BuildingNumber,
    City,
    CitySubDivision,
    PostCode,
    CountryCode,
    Floor,
    Room,
    MunicipalityCode,
    LocationDescription,
    GeoInfoReference,
    IsActualAddress,
    MeteringMethod,
    MeterNumber,
    ReadingOccurrence,
    ProductType,
    UnitType,
    MaximumPowerKw,
    MaximumCurrent,
    SettlementMethod,
    NetSettlementGroup,
    DisconnectionType,
    ConnectionType,
    AssetType,
    Capacity,
    ScheduledMeterReadingDate,
    PowerPlantGsrn,
    ProductionObligation,
    ExchangeFromGridArea,
    ExchangeToGridArea,
    EffectiveDate,
    ConnectedAt,
    ClosedDownAt,
    Version,
    CreatedAt,
    UpdatedAt,
}
