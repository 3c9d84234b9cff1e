//! In-memory repositories for development and testing

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::business_process::BusinessProcessRepository;
use crate::domain::grid_area::GridAreaRepository;
use crate::domain::metering_point::MeteringPointRepository;
use crate::domain::values::{GridAreaCode, GsrnNumber};
use crate::domain::{
    BusinessProcess, DomainError, DomainResult, GridArea, GridAreaLinkId, MeteringPoint,
    MeteringPointId, RepositoryProvider,
};
use crate::shared::pagination::Page;

/// Every aggregate keyed in a `DashMap`; aggregates are stored as
/// snapshots without pending events.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    metering_points: InMemoryMeteringPointRepository,
    grid_areas: InMemoryGridAreaRepository,
    business_processes: InMemoryBusinessProcessRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

#[derive(Default)]
pub struct InMemoryMeteringPointRepository {
    by_gsrn: DashMap<GsrnNumber, MeteringPoint>,
}

fn snapshot(metering_point: &MeteringPoint) -> MeteringPoint {
    MeteringPoint::restore(metering_point.state().clone())
}

#[async_trait]
impl MeteringPointRepository for InMemoryMeteringPointRepository {
    async fn add(&self, metering_point: &MeteringPoint) -> DomainResult<()> {
        let gsrn = metering_point.gsrn().clone();
        if self.by_gsrn.contains_key(&gsrn) {
            return Err(DomainError::Conflict(format!(
                "Metering point {} already exists",
                gsrn
            )));
        }
        self.by_gsrn.insert(gsrn, snapshot(metering_point));
        Ok(())
    }

    async fn update(&self, metering_point: &MeteringPoint) -> DomainResult<()> {
        match self.by_gsrn.get_mut(metering_point.gsrn()) {
            Some(stored) if stored.version() != metering_point.base_version() => {
                Err(DomainError::Conflict(format!(
                    "Metering point {} was modified concurrently (expected version {}, found {})",
                    metering_point.gsrn(),
                    metering_point.base_version(),
                    stored.version()
                )))
            }
            Some(mut stored) => {
                *stored = snapshot(metering_point);
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "MeteringPoint",
                field: "gsrn",
                value: metering_point.gsrn().to_string(),
            }),
        }
    }

    async fn find_by_id(&self, id: MeteringPointId) -> DomainResult<Option<MeteringPoint>> {
        Ok(self
            .by_gsrn
            .iter()
            .find(|entry| entry.id() == id)
            .map(|entry| snapshot(entry.value())))
    }

    async fn find_by_gsrn(&self, gsrn: &GsrnNumber) -> DomainResult<Option<MeteringPoint>> {
        Ok(self.by_gsrn.get(gsrn).map(|entry| snapshot(entry.value())))
    }

    async fn exists(&self, gsrn: &GsrnNumber) -> DomainResult<bool> {
        Ok(self.by_gsrn.contains_key(gsrn))
    }

    async fn list(&self, page: Page) -> DomainResult<Vec<MeteringPoint>> {
        let mut all: Vec<MeteringPoint> = self
            .by_gsrn
            .iter()
            .map(|entry| snapshot(entry.value()))
            .collect();
        all.sort_by(|a, b| a.gsrn().cmp(b.gsrn()));
        Ok(all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.by_gsrn.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryGridAreaRepository {
    by_link_id: DashMap<GridAreaLinkId, GridArea>,
}

#[async_trait]
impl GridAreaRepository for InMemoryGridAreaRepository {
    async fn add(&self, grid_area: &GridArea) -> DomainResult<()> {
        if self.by_link_id.iter().any(|e| e.code == grid_area.code) {
            return Err(DomainError::Conflict(format!(
                "Grid area {} already exists",
                grid_area.code
            )));
        }
        self.by_link_id.insert(grid_area.link_id, grid_area.clone());
        Ok(())
    }

    async fn find_by_link_id(&self, link_id: GridAreaLinkId) -> DomainResult<Option<GridArea>> {
        Ok(self.by_link_id.get(&link_id).map(|e| e.value().clone()))
    }

    async fn find_by_code(&self, code: &GridAreaCode) -> DomainResult<Option<GridArea>> {
        Ok(self
            .by_link_id
            .iter()
            .find(|e| &e.code == code)
            .map(|e| e.value().clone()))
    }

    async fn list(&self) -> DomainResult<Vec<GridArea>> {
        let mut all: Vec<GridArea> = self.by_link_id.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        Ok(all)
    }
}

#[derive(Default)]
pub struct InMemoryBusinessProcessRepository {
    by_id: DashMap<Uuid, BusinessProcess>,
}

#[async_trait]
impl BusinessProcessRepository for InMemoryBusinessProcessRepository {
    async fn add(&self, process: &BusinessProcess) -> DomainResult<()> {
        if self
            .by_id
            .iter()
            .any(|e| e.transaction_id == process.transaction_id)
        {
            return Err(DomainError::Conflict(format!(
                "Transaction {} already exists",
                process.transaction_id
            )));
        }
        self.by_id.insert(process.id, process.clone());
        Ok(())
    }

    async fn update(&self, process: &BusinessProcess) -> DomainResult<()> {
        match self.by_id.get_mut(&process.id) {
            Some(mut stored) => {
                *stored = process.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "BusinessProcess",
                field: "id",
                value: process.id.to_string(),
            }),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<BusinessProcess>> {
        Ok(self.by_id.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> DomainResult<Option<BusinessProcess>> {
        Ok(self
            .by_id
            .iter()
            .find(|e| e.transaction_id == transaction_id)
            .map(|e| e.value().clone()))
    }

    async fn list_for_gsrn(&self, gsrn: &str) -> DomainResult<Vec<BusinessProcess>> {
        let mut processes: Vec<BusinessProcess> = self
            .by_id
            .iter()
            .filter(|e| e.gsrn == gsrn)
            .map(|e| e.value().clone())
            .collect();
        processes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(processes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enumerations::{MeteringPointType, PriceAreaCode};
    use crate::domain::metering_point::master_data::fixtures::consumption_master_data;
    use crate::domain::metering_point::EnergySupplierDetails;
    use crate::domain::values::{EffectiveDate, GlnNumber};
    use crate::domain::BusinessProcessType;

    fn metering_point(gsrn: &str) -> MeteringPoint {
        MeteringPoint::create(
            MeteringPointId::new(),
            GsrnNumber::create(gsrn).unwrap(),
            MeteringPointType::Consumption,
            GridAreaLinkId::new(),
            None,
            consumption_master_data(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn metering_points_are_listed_by_gsrn() {
        let repo = InMemoryMeteringPointRepository::default();
        for gsrn in ["571313100000000034", "571313100000000010", "571313100000000027"] {
            repo.add(&metering_point(gsrn)).await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 3);
        let page = repo.list(Page::new(1, 2)).await.unwrap();
        let gsrns: Vec<_> = page.iter().map(|mp| mp.gsrn().to_string()).collect();
        assert_eq!(gsrns, vec!["571313100000000010", "571313100000000027"]);

        let second = repo.list(Page::new(2, 2)).await.unwrap();
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_gsrn_conflicts() {
        let repo = InMemoryMeteringPointRepository::default();
        repo.add(&metering_point("571313100000000010")).await.unwrap();
        let err = repo
            .add(&metering_point("571313100000000010"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_requires_existing_point() {
        let repo = InMemoryMeteringPointRepository::default();
        let err = repo
            .update(&metering_point("571313100000000010"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn concurrent_supplier_changes_conflict() {
        let repo = InMemoryMeteringPointRepository::default();
        let mp = metering_point("571313100000000010");
        repo.add(&mp).await.unwrap();

        let mut first = repo.find_by_gsrn(mp.gsrn()).await.unwrap().unwrap();
        let mut second = repo.find_by_gsrn(mp.gsrn()).await.unwrap().unwrap();
        for (copy, start) in [
            (&mut first, "2021-06-30T22:00:00Z"),
            (&mut second, "2021-07-31T22:00:00Z"),
        ] {
            copy.set_energy_supplier(EnergySupplierDetails::new(
                EffectiveDate::create(start).unwrap(),
                GlnNumber::create("5790000000012").unwrap(),
            ))
            .unwrap();
        }

        repo.update(&first).await.unwrap();
        let err = repo.update(&second).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = repo.find_by_gsrn(mp.gsrn()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 2);
        let starts: Vec<_> = stored
            .energy_suppliers()
            .iter()
            .map(|s| s.start_of_supply)
            .collect();
        assert_eq!(starts, vec![EffectiveDate::create("2021-06-30T22:00:00Z").unwrap()]);
    }

    #[tokio::test]
    async fn grid_area_lookup_by_code() {
        let repo = InMemoryGridAreaRepository::default();
        let area = GridArea::new(
            GridAreaCode::create("870").unwrap(),
            "Vest",
            PriceAreaCode::DK1,
            GlnNumber::create("5790000000005").unwrap(),
        );
        repo.add(&area).await.unwrap();
        let found = repo
            .find_by_code(&GridAreaCode::create("870").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.link_id, area.link_id);
        assert!(repo.add(&area).await.is_err());
    }

    #[tokio::test]
    async fn processes_by_transaction_id() {
        let repo = InMemoryBusinessProcessRepository::default();
        let process = BusinessProcess::new(
            "tx-1",
            BusinessProcessType::CreateMeteringPoint,
            "571313100000000010",
        );
        repo.add(&process).await.unwrap();
        assert_eq!(
            repo.find_by_transaction_id("tx-1").await.unwrap(),
            Some(process.clone())
        );
        assert_eq!(repo.list_for_gsrn("571313100000000010").await.unwrap().len(), 1);
        assert!(repo.find_by_transaction_id("tx-2").await.unwrap().is_none());
    }
}
