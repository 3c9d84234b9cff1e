use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use super::SeaOrmRepositoryProvider;
use crate::domain::enumerations::{
    MeteringMethod, MeteringPointType, PhysicalState, PriceAreaCode,
};
use crate::domain::metering_point::master_data::fixtures::consumption_master_data;
use crate::domain::metering_point::{EnergySupplierDetails, MeteringConfiguration};
use crate::domain::rules::ValidationError;
use crate::domain::values::{EffectiveDate, GlnNumber, GridAreaCode, GsrnNumber, MeterId};
use crate::domain::{
    BusinessProcess, BusinessProcessStatus, BusinessProcessType, DomainError, GridArea,
    MeteringPoint, MeteringPointId, RepositoryProvider,
};
use crate::infrastructure::database::migrator::Migrator;
use crate::shared::pagination::Page;

async fn setup() -> (DatabaseConnection, SeaOrmRepositoryProvider) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (db.clone(), SeaOrmRepositoryProvider::new(db))
}

fn date(s: &str) -> EffectiveDate {
    EffectiveDate::create(s).unwrap()
}

fn grid_area() -> GridArea {
    GridArea::new(
        GridAreaCode::create("804").unwrap(),
        "Syd",
        PriceAreaCode::DK1,
        GlnNumber::create("5790000000005").unwrap(),
    )
}

fn metering_point(gsrn: &str, area: &GridArea) -> MeteringPoint {
    let mut mp = MeteringPoint::create(
        MeteringPointId::new(),
        GsrnNumber::create(gsrn).unwrap(),
        MeteringPointType::Consumption,
        area.link_id,
        None,
        consumption_master_data(),
    )
    .unwrap();
    mp.take_events();
    mp
}

#[tokio::test]
async fn grid_area_round_trip() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    repos.grid_areas().add(&area).await.unwrap();

    let by_code = repos
        .grid_areas()
        .find_by_code(&area.code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.link_id, area.link_id);
    assert_eq!(by_code.price_area, PriceAreaCode::DK1);

    let by_link = repos
        .grid_areas()
        .find_by_link_id(area.link_id)
        .await
        .unwrap();
    assert!(by_link.is_some());

    let err = repos.grid_areas().add(&grid_area()).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(repos.grid_areas().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn metering_point_round_trip() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    let mp = metering_point("571313100000000010", &area);
    repos.metering_points().add(&mp).await.unwrap();

    let loaded = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id(), mp.id());
    assert_eq!(loaded.master_data(), mp.master_data());
    assert_eq!(loaded.physical_state(), PhysicalState::New);
    assert_eq!(loaded.version(), 1);
    assert!(repos.metering_points().exists(mp.gsrn()).await.unwrap());

    let by_id = repos.metering_points().find_by_id(mp.id()).await.unwrap();
    assert!(by_id.is_some());
}

#[tokio::test]
async fn update_persists_state_and_suppliers() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    let mut mp = metering_point("571313100000000027", &area);
    repos.metering_points().add(&mp).await.unwrap();

    mp.set_energy_supplier(EnergySupplierDetails::new(
        date("2021-06-01T22:00:00Z"),
        GlnNumber::create("5790000000012").unwrap(),
    ))
    .unwrap();
    mp.connect(date("2021-07-01T22:00:00Z")).unwrap();
    mp.change_metering_configuration(
        MeteringConfiguration::new(
            MeteringMethod::Physical,
            Some(MeterId::create("NEW1").unwrap()),
        ),
        date("2021-08-01T22:00:00Z"),
    )
    .unwrap();
    repos.metering_points().update(&mp).await.unwrap();

    let loaded = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.physical_state(), PhysicalState::Connected);
    assert_eq!(loaded.connected_at(), Some(date("2021-07-01T22:00:00Z")));
    assert_eq!(loaded.energy_suppliers().len(), 1);
    assert_eq!(
        loaded
            .master_data()
            .metering_configuration
            .meter
            .as_ref()
            .map(|m| m.as_str()),
        Some("NEW1")
    );
    assert_eq!(loaded.version(), mp.version());
}

#[tokio::test]
async fn stale_update_is_rejected() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    let mut mp = metering_point("571313100000000034", &area);
    repos.metering_points().add(&mp).await.unwrap();
    let stale = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();

    mp.close_down(date("2021-07-01T22:00:00Z")).unwrap();
    repos.metering_points().update(&mp).await.unwrap();

    let err = repos.metering_points().update(&stale).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_supplier_changes_conflict() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    let mp = metering_point("571313100000000041", &area);
    repos.metering_points().add(&mp).await.unwrap();

    let mut first = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();
    let mut second = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();
    first
        .set_energy_supplier(EnergySupplierDetails::new(
            date("2021-06-30T22:00:00Z"),
            GlnNumber::create("5790000000012").unwrap(),
        ))
        .unwrap();
    second
        .set_energy_supplier(EnergySupplierDetails::new(
            date("2021-07-31T22:00:00Z"),
            GlnNumber::create("5790000000029").unwrap(),
        ))
        .unwrap();

    repos.metering_points().update(&first).await.unwrap();
    let err = repos.metering_points().update(&second).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let stored = repos
        .metering_points()
        .find_by_gsrn(mp.gsrn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.version(), 2);
    let suppliers: Vec<_> = stored
        .energy_suppliers()
        .iter()
        .map(|s| (s.start_of_supply, s.gln.to_string()))
        .collect();
    assert_eq!(
        suppliers,
        vec![(date("2021-06-30T22:00:00Z"), "5790000000012".to_string())]
    );
}

#[tokio::test]
async fn update_of_missing_point_is_not_found() {
    let (_db, repos) = setup().await;
    let mp = metering_point("571313100000000058", &grid_area());
    let err = repos.metering_points().update(&mp).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn list_is_paged_by_gsrn() {
    let (_db, repos) = setup().await;
    let area = grid_area();
    for gsrn in ["571313100000000041", "571313100000000010", "571313100000000027"] {
        repos
            .metering_points()
            .add(&metering_point(gsrn, &area))
            .await
            .unwrap();
    }

    assert_eq!(repos.metering_points().count().await.unwrap(), 3);
    let first = repos.metering_points().list(Page::new(1, 2)).await.unwrap();
    let gsrns: Vec<_> = first.iter().map(|mp| mp.gsrn().to_string()).collect();
    assert_eq!(gsrns, vec!["571313100000000010", "571313100000000027"]);
}

#[tokio::test]
async fn business_process_keeps_rejection_reasons() {
    let (_db, repos) = setup().await;
    let mut process = BusinessProcess::new(
        "tx-100",
        BusinessProcessType::ConnectMeteringPoint,
        "571313100000000010",
    );
    repos.business_processes().add(&process).await.unwrap();

    process
        .reject(vec![ValidationError::UnknownMeteringPoint(
            "571313100000000010".into(),
        )])
        .unwrap();
    repos.business_processes().update(&process).await.unwrap();

    let loaded = repos
        .business_processes()
        .find_by_transaction_id("tx-100")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.status, BusinessProcessStatus::Rejected);
    assert_eq!(loaded.errors, process.errors);
    assert!(loaded.completed_at.is_some());

    let history = repos
        .business_processes()
        .list_for_gsrn("571313100000000010")
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let duplicate = BusinessProcess::new(
        "tx-100",
        BusinessProcessType::ConnectMeteringPoint,
        "571313100000000010",
    );
    assert!(repos.business_processes().add(&duplicate).await.is_err());
}
