//! Create business_processes table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessProcesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessProcesses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessProcesses::TransactionId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessProcesses::ProcessType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BusinessProcesses::Gsrn).string().not_null())
                    .col(
                        ColumnDef::new(BusinessProcesses::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(BusinessProcesses::Errors)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(BusinessProcesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusinessProcesses::CompletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_processes_gsrn")
                    .table(BusinessProcesses::Table)
                    .col(BusinessProcesses::Gsrn)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessProcesses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BusinessProcesses {
    Table,
    Id,
    TransactionId,
    ProcessType,
    Gsrn,
    Status,
    Errors,
    CreatedAt,
    CompletedAt,
}
