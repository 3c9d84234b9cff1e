//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::business_process::BusinessProcessRepository;
use crate::domain::grid_area::GridAreaRepository;
use crate::domain::metering_point::MeteringPointRepository;
use crate::domain::repositories::RepositoryProvider;

use super::business_process_repository::SeaOrmBusinessProcessRepository;
use super::grid_area_repository::SeaOrmGridAreaRepository;
use super::metering_point_repository::SeaOrmMeteringPointRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let mp = repos.metering_points().find_by_gsrn(&gsrn).await?;
/// let processes = repos.business_processes().list_for_gsrn(gsrn.as_str()).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    metering_points: SeaOrmMeteringPointRepository,
    grid_areas: SeaOrmGridAreaRepository,
    business_processes: SeaOrmBusinessProcessRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            metering_points: SeaOrmMeteringPointRepository::new(db.clone()),
            grid_areas: SeaOrmGridAreaRepository::new(db.clone()),
            business_processes: SeaOrmBusinessProcessRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn metering_points(&self) -> &dyn MeteringPointRepository {
        &self.metering_points
    }

    fn grid_areas(&self) -> &dyn GridAreaRepository {
        &self.grid_areas
    }

    fn business_processes(&self) -> &dyn BusinessProcessRepository {
        &self.business_processes
    }
}
