//! Metering point repository interface

use async_trait::async_trait;

use super::model::{MeteringPoint, MeteringPointId};
use crate::domain::values::GsrnNumber;
use crate::domain::DomainResult;
use crate::shared::pagination::Page;

#[async_trait]
pub trait MeteringPointRepository: Send + Sync {
    async fn add(&self, metering_point: &MeteringPoint) -> DomainResult<()>;
    /// Persist the current state, energy suppliers included.
    async fn update(&self, metering_point: &MeteringPoint) -> DomainResult<()>;
    async fn find_by_id(&self, id: MeteringPointId) -> DomainResult<Option<MeteringPoint>>;
    async fn find_by_gsrn(&self, gsrn: &GsrnNumber) -> DomainResult<Option<MeteringPoint>>;
    async fn exists(&self, gsrn: &GsrnNumber) -> DomainResult<bool>;
    /// Metering points ordered by GSRN.
    async fn list(&self, page: Page) -> DomainResult<Vec<MeteringPoint>>;
    async fn count(&self) -> DomainResult<u64>;
}
