//! Grid area repository interface

use async_trait::async_trait;

use super::model::{GridArea, GridAreaLinkId};
use crate::domain::values::GridAreaCode;
use crate::domain::DomainResult;

#[async_trait]
pub trait GridAreaRepository: Send + Sync {
    async fn add(&self, grid_area: &GridArea) -> DomainResult<()>;
    async fn find_by_link_id(&self, link_id: GridAreaLinkId) -> DomainResult<Option<GridArea>>;
    async fn find_by_code(&self, code: &GridAreaCode) -> DomainResult<Option<GridArea>>;
    /// Grid areas ordered by code.
    async fn list(&self) -> DomainResult<Vec<GridArea>>;
}
