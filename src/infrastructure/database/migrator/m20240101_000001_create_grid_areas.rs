//! Create grid_areas table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GridAreas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GridAreas::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(GridAreas::LinkId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GridAreas::Code)
                            .string_len(3)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(GridAreas::Name).string().not_null())
                    .col(ColumnDef::new(GridAreas::PriceArea).string().not_null())
                    .col(ColumnDef::new(GridAreas::OperatorGln).string().not_null())
                    .col(
                        ColumnDef::new(GridAreas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GridAreas::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum GridAreas {
    Table,
    Id,
    LinkId,
    Code,
    Name,
    PriceArea,
    OperatorGln,
    CreatedAt,
}
