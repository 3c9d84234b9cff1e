//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives handlers one handle to every per-aggregate
//! repository:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let mp = repos.metering_points().find_by_gsrn(&gsrn).await?;
//!     let area = repos.grid_areas().find_by_link_id(link_id).await?;
//! }
//! ```

use super::business_process::BusinessProcessRepository;
use super::grid_area::GridAreaRepository;
use super::metering_point::MeteringPointRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

pub trait RepositoryProvider: Send + Sync {
    fn metering_points(&self) -> &dyn MeteringPointRepository;
    fn grid_areas(&self) -> &dyn GridAreaRepository;
    fn business_processes(&self) -> &dyn BusinessProcessRepository;
}
