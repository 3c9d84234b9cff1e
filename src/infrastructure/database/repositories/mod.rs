//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod business_process_repository;
pub mod grid_area_repository;
pub mod metering_point_repository;
pub mod repository_provider;

pub use repository_provider::SeaOrmRepositoryProvider;

use std::fmt::Display;

use uuid::Uuid;

use crate::domain::DomainError;
use crate::shared::errors::InfraError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::from(e).into()
}

/// A stored row that no longer maps onto the domain model.
fn corrupt(key: &str, detail: impl Display) -> DomainError {
    DomainError::Storage(format!("Unreadable row {}: {}", key, detail))
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| corrupt(value, e))
}

#[cfg(test)]
mod tests;
