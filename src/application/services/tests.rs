use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::{GridAreaService, MeteringPointService};
use crate::application::events::{create_event_bus, IntegrationEvent, SharedEventBus};
use crate::application::market::documents::{
    AddressDto, ChangeAddress, ChangeEnergySupplier, ChangeMeteringConfiguration,
    CreateGridArea, CreateMeteringPoint, PhysicalStateChange,
};
use crate::application::market::{BusinessProcessResult, MarketDocument};
use crate::domain::business_process::BusinessProcessRepository;
use crate::domain::enumerations::{MeteringPointType, PhysicalState};
use crate::domain::grid_area::GridAreaRepository;
use crate::domain::metering_point::MeteringPointRepository;
use crate::domain::{
    BusinessProcess, BusinessProcessStatus, BusinessProcessType, DomainError, DomainResult,
    RepositoryProvider,
};
use crate::infrastructure::storage::memory::InMemoryBusinessProcessRepository;
use crate::infrastructure::storage::InMemoryRepositoryProvider;
use crate::shared::pagination::Page;

const OPERATOR: &str = "5790000000005";
const OTHER_OPERATOR: &str = "5790000000012";
const SUPPLIER: &str = "5790000000029";
const GSRN: &str = "571313100000000010";

struct Harness {
    service: MeteringPointService,
    grid_areas: GridAreaService,
    bus: SharedEventBus,
}

async fn harness() -> Harness {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
    let bus = create_event_bus(64);
    let grid_areas = GridAreaService::new(repos.clone());
    grid_areas
        .create_grid_area(grid_area("804", OPERATOR))
        .await
        .unwrap();
    grid_areas
        .create_grid_area(grid_area("805", OTHER_OPERATOR))
        .await
        .unwrap();
    Harness {
        service: MeteringPointService::new(repos, bus.clone()),
        grid_areas,
        bus,
    }
}

fn grid_area(code: &str, operator: &str) -> CreateGridArea {
    CreateGridArea {
        code: code.into(),
        name: format!("Area {}", code),
        price_area: "DK1".into(),
        operator_gln: operator.into(),
    }
}

fn consumption(gsrn: &str) -> CreateMeteringPoint {
    CreateMeteringPoint {
        gsrn: gsrn.into(),
        metering_point_type: "Consumption".into(),
        grid_area: "804".into(),
        address: AddressDto {
            street_name: Some("Vestergade".into()),
            building_number: Some("12".into()),
            city: Some("Aarhus C".into()),
            post_code: Some("8000".into()),
            ..Default::default()
        },
        metering_method: Some("Physical".into()),
        meter_number: Some("M12345".into()),
        reading_occurrence: Some("Hourly".into()),
        maximum_power_kw: Some(230),
        maximum_current: Some(16),
        settlement_method: Some("Flex".into()),
        net_settlement_group: Some("Zero".into()),
        disconnection_type: Some("Remote".into()),
        effective_date: "2021-06-01T22:00:00Z".into(),
        ..Default::default()
    }
}

fn production(gsrn: &str) -> CreateMeteringPoint {
    CreateMeteringPoint {
        metering_point_type: "Production".into(),
        settlement_method: None,
        asset_type: Some("WindTurbines".into()),
        ..consumption(gsrn)
    }
}

fn exchange(gsrn: &str) -> CreateMeteringPoint {
    CreateMeteringPoint {
        metering_point_type: "Exchange".into(),
        address: AddressDto::default(),
        settlement_method: None,
        net_settlement_group: None,
        disconnection_type: None,
        exchange_from_grid_area: Some("804".into()),
        exchange_to_grid_area: Some("805".into()),
        ..consumption(gsrn)
    }
}

fn doc<T>(tx: &str, payload: T) -> MarketDocument<T> {
    MarketDocument::new(tx, OPERATOR, payload)
}

fn on(date: &str) -> PhysicalStateChange {
    PhysicalStateChange {
        effective_date: date.into(),
    }
}

async fn created(h: &Harness, gsrn: &str) -> BusinessProcessResult {
    let result = h
        .service
        .create_metering_point(doc(&format!("create-{}", gsrn), consumption(gsrn)))
        .await
        .unwrap();
    assert!(result.is_accepted(), "{:?}", result.errors);
    result
}

async fn supplied(h: &Harness, gsrn: &str, start: &str) -> BusinessProcessResult {
    h.service
        .change_energy_supplier(
            gsrn,
            doc(
                &format!("supplier-{}-{}", gsrn, start),
                ChangeEnergySupplier {
                    energy_supplier_gln: SUPPLIER.into(),
                    start_of_supply: start.into(),
                },
            ),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn create_accepted_and_stored() {
    let h = harness().await;
    let result = created(&h, GSRN).await;
    assert_eq!(result.status, BusinessProcessStatus::Accepted);
    assert!(result.process_id.is_some());

    let mp = h.service.get(GSRN).await.unwrap();
    assert_eq!(mp.physical_state(), PhysicalState::New);
    let process = h
        .service
        .business_process(result.process_id.unwrap())
        .await
        .unwrap();
    assert_eq!(process.status, BusinessProcessStatus::Accepted);
}

#[tokio::test]
async fn duplicate_transaction_rejected_without_new_process() {
    let h = harness().await;
    created(&h, GSRN).await;

    let again = h
        .service
        .create_metering_point(doc(
            &format!("create-{}", GSRN),
            consumption("571313100000000027"),
        ))
        .await
        .unwrap();
    assert_eq!(again.codes(), vec!["E01"]);
    assert!(again.process_id.is_none());
    assert!(h.service.get("571313100000000027").await.is_err());
}

#[tokio::test]
async fn unknown_grid_area_rejected() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc(
            "tx-1",
            CreateMeteringPoint {
                grid_area: "999".into(),
                ..consumption(GSRN)
            },
        ))
        .await
        .unwrap();
    assert_eq!(result.status, BusinessProcessStatus::Rejected);
    assert_eq!(result.codes(), vec!["D02"]);
}

#[tokio::test]
async fn sender_must_operate_the_grid_area() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(MarketDocument::new("tx-1", OTHER_OPERATOR, consumption(GSRN)))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["D50"]);

    created(&h, GSRN).await;
    let result = h
        .service
        .connect(
            GSRN,
            MarketDocument::new("tx-2", OTHER_OPERATOR, on("2021-07-01T22:00:00Z")),
        )
        .await
        .unwrap();
    assert!(result.codes().contains(&"D50"));
}

#[tokio::test]
async fn existing_gsrn_rejected() {
    let h = harness().await;
    created(&h, GSRN).await;
    let result = h
        .service
        .create_metering_point(doc("tx-2", consumption(GSRN)))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["E11"]);
}

#[tokio::test]
async fn invalid_input_reported_per_field() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc(
            "tx-1",
            CreateMeteringPoint {
                metering_point_type: String::new(),
                effective_date: String::new(),
                ..consumption(GSRN)
            },
        ))
        .await
        .unwrap();
    assert_eq!(result.status, BusinessProcessStatus::Rejected);
    assert_eq!(result.codes(), vec!["E86", "E86"]);
}

#[tokio::test]
async fn connect_requires_energy_supplier() {
    let h = harness().await;
    created(&h, GSRN).await;
    let result = h
        .service
        .connect(GSRN, doc("tx-connect", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["D36"]);
    assert_eq!(
        h.service.get(GSRN).await.unwrap().physical_state(),
        PhysicalState::New
    );
}

#[tokio::test]
async fn unknown_metering_point_rejected() {
    let h = harness().await;
    let result = h
        .service
        .disconnect(GSRN, doc("tx-1", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["E10"]);
}

#[tokio::test]
async fn full_lifecycle() {
    let h = harness().await;
    created(&h, GSRN).await;
    assert!(supplied(&h, GSRN, "2021-06-01T22:00:00Z").await.is_accepted());

    let steps = [
        ("connect", "2021-07-01T22:00:00Z"),
        ("disconnect", "2021-08-01T22:00:00Z"),
        ("reconnect", "2021-09-01T22:00:00Z"),
        ("disconnect", "2021-10-01T22:00:00Z"),
        ("close_down", "2021-11-01T22:00:00Z"),
    ];
    for (i, (step, date)) in steps.into_iter().enumerate() {
        let document = doc(&format!("tx-{}", i), on(date));
        let result = match step {
            "connect" => h.service.connect(GSRN, document).await,
            "disconnect" => h.service.disconnect(GSRN, document).await,
            "reconnect" => h.service.reconnect(GSRN, document).await,
            _ => h.service.close_down(GSRN, document).await,
        }
        .unwrap();
        assert!(result.is_accepted(), "{} {:?}", step, result.errors);
    }

    let mp = h.service.get(GSRN).await.unwrap();
    assert_eq!(mp.physical_state(), PhysicalState::ClosedDown);

    let result = h
        .service
        .reconnect(GSRN, doc("tx-late", on("2021-12-01T22:00:00Z")))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["E19"]);

    let history = h.service.business_processes_for(GSRN).await.unwrap();
    assert_eq!(history.len(), 8);
}

#[tokio::test]
async fn change_address_and_configuration() {
    let h = harness().await;
    created(&h, GSRN).await;

    let result = h
        .service
        .change_address(
            GSRN,
            doc(
                "tx-address",
                ChangeAddress {
                    address: AddressDto {
                        street_name: Some("Nørregade".into()),
                        building_number: Some("3".into()),
                        city: Some("Odense C".into()),
                        post_code: Some("5000".into()),
                        ..Default::default()
                    },
                    effective_date: "2021-07-01T22:00:00Z".into(),
                },
            ),
        )
        .await
        .unwrap();
    assert!(result.is_accepted(), "{:?}", result.errors);

    let result = h
        .service
        .change_metering_configuration(
            GSRN,
            doc(
                "tx-config",
                ChangeMeteringConfiguration {
                    metering_method: "Physical".into(),
                    meter_number: None,
                    effective_date: "2021-07-01T22:00:00Z".into(),
                },
            ),
        )
        .await
        .unwrap();
    assert_eq!(result.status, BusinessProcessStatus::Rejected);

    let mp = h.service.get(GSRN).await.unwrap();
    assert_eq!(mp.master_data().address.city(), Some("Odense C"));
    assert!(mp.master_data().metering_configuration.meter.is_some());
}

#[tokio::test]
async fn energy_supplier_snapshot() {
    let h = harness().await;
    created(&h, GSRN).await;
    supplied(&h, GSRN, "2021-06-01T22:00:00Z").await;
    supplied(&h, GSRN, "2022-01-01T00:00:00Z").await;

    let duplicate = supplied(&h, GSRN, "2021-06-01T22:00:00Z").await;
    assert_eq!(duplicate.codes(), vec!["E01"]);

    let same_start = h
        .service
        .change_energy_supplier(
            GSRN,
            doc(
                "tx-same-start",
                ChangeEnergySupplier {
                    energy_supplier_gln: OTHER_OPERATOR.into(),
                    start_of_supply: "2021-06-01T22:00:00Z".into(),
                },
            ),
        )
        .await
        .unwrap();
    assert_eq!(same_start.codes(), vec!["E16"]);

    let snapshot = h
        .service
        .energy_suppliers(GSRN, Some("2021-09-01T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(
        snapshot.current.map(|s| s.start_of_supply.to_string()),
        Some("2021-06-01T22:00:00Z".to_string())
    );
    assert_eq!(snapshot.future.len(), 1);

    assert!(matches!(
        h.service.energy_suppliers(GSRN, Some("soon")).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn events_published_for_accepted_process() {
    let h = harness().await;
    let mut subscriber = h.bus.subscribe();
    created(&h, GSRN).await;

    let first = tokio::time::timeout(Duration::from_secs(1), subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first.event, IntegrationEvent::MeteringPointCreated(_)));

    let second = tokio::time::timeout(Duration::from_secs(1), subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    match second.event {
        IntegrationEvent::MessageConfirmed(confirmed) => {
            assert_eq!(confirmed.receiver_gln, OPERATOR);
            assert_eq!(confirmed.gsrn, GSRN);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn rejection_published_with_reasons() {
    let h = harness().await;
    let mut subscriber = h.bus.subscribe();
    h.service
        .connect(GSRN, doc("tx-1", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();

    let message = tokio::time::timeout(Duration::from_secs(1), subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    match message.event {
        IntegrationEvent::MessageRejected(rejected) => {
            assert_eq!(rejected.reasons[0].code, "E10");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn listing_is_paginated() {
    let h = harness().await;
    for gsrn in ["571313100000000027", GSRN, "571313100000000034"] {
        created(&h, gsrn).await;
    }
    let page = h.service.list(Page::new(1, 2)).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].gsrn().as_str(), GSRN);
}

#[tokio::test]
async fn grid_area_validation_and_conflict() {
    let h = harness().await;
    assert!(matches!(
        h.grid_areas.create_grid_area(grid_area("804", OPERATOR)).await,
        Err(DomainError::Conflict(_))
    ));

    let err = h
        .grid_areas
        .create_grid_area(CreateGridArea {
            price_area: "DK9".into(),
            ..grid_area("806", "5790000000006")
        })
        .await
        .unwrap_err();
    assert_eq!(err.rule_errors().map(|e| e.len()), Some(2));
    assert_eq!(h.grid_areas.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn production_point_created_and_connected() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc("tx-create", production(GSRN)))
        .await
        .unwrap();
    assert!(result.is_accepted(), "{:?}", result.errors);
    assert_eq!(
        h.service.get(GSRN).await.unwrap().metering_point_type(),
        MeteringPointType::Production
    );

    let connect = h
        .service
        .connect(GSRN, doc("tx-early", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert_eq!(connect.codes(), vec!["D36"]);

    assert!(supplied(&h, GSRN, "2021-06-01T22:00:00Z").await.is_accepted());
    let connect = h
        .service
        .connect(GSRN, doc("tx-connect", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert!(connect.is_accepted(), "{:?}", connect.errors);
    assert_eq!(
        h.service.get(GSRN).await.unwrap().physical_state(),
        PhysicalState::Connected
    );
}

#[tokio::test]
async fn production_point_rejects_settlement_method() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc(
            "tx-1",
            CreateMeteringPoint {
                settlement_method: Some("Flex".into()),
                ..production(GSRN)
            },
        ))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["E86"]);
    assert!(h.service.get(GSRN).await.is_err());
}

#[tokio::test]
async fn exchange_point_connects_without_supplier() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc("tx-create", exchange(GSRN)))
        .await
        .unwrap();
    assert!(result.is_accepted(), "{:?}", result.errors);

    let mp = h.service.get(GSRN).await.unwrap();
    assert_eq!(mp.metering_point_type(), MeteringPointType::Exchange);
    assert!(mp.master_data().exchange_from_grid_area.is_some());
    assert_ne!(
        mp.master_data().exchange_from_grid_area,
        mp.master_data().exchange_to_grid_area
    );

    let connect = h
        .service
        .connect(GSRN, doc("tx-connect", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert!(connect.is_accepted(), "{:?}", connect.errors);
    assert_eq!(
        h.service.get(GSRN).await.unwrap().physical_state(),
        PhysicalState::Connected
    );
}

#[tokio::test]
async fn exchange_point_has_no_energy_supplier() {
    let h = harness().await;
    h.service
        .create_metering_point(doc("tx-create", exchange(GSRN)))
        .await
        .unwrap();

    let result = supplied(&h, GSRN, "2021-06-01T22:00:00Z").await;
    assert_eq!(result.status, BusinessProcessStatus::Rejected);
    assert_eq!(result.codes(), vec!["E86"]);
    assert!(h.service.get(GSRN).await.unwrap().energy_suppliers().is_empty());
}

#[tokio::test]
async fn exchange_grid_areas_must_be_registered() {
    let h = harness().await;
    let result = h
        .service
        .create_metering_point(doc(
            "tx-1",
            CreateMeteringPoint {
                exchange_to_grid_area: Some("999".into()),
                ..exchange(GSRN)
            },
        ))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["D02"]);

    let result = h
        .service
        .create_metering_point(doc(
            "tx-2",
            CreateMeteringPoint {
                exchange_from_grid_area: Some("998".into()),
                exchange_to_grid_area: Some("999".into()),
                ..exchange(GSRN)
            },
        ))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["D02", "D02"]);
    assert!(h.service.get(GSRN).await.is_err());
}

#[tokio::test]
async fn parent_must_be_registered() {
    let h = harness().await;
    let parent = "571313100000000027";
    let child = "571313100000000034";
    let with_parent = |gsrn: &str| CreateMeteringPoint {
        parent_related_metering_point: Some(parent.into()),
        ..consumption(gsrn)
    };

    let result = h
        .service
        .create_metering_point(doc("tx-orphan", with_parent(child)))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["D14"]);

    created(&h, parent).await;
    let result = h
        .service
        .create_metering_point(doc("tx-child", with_parent(child)))
        .await
        .unwrap();
    assert!(result.is_accepted(), "{:?}", result.errors);

    let details = h.service.details(child).await.unwrap();
    assert_eq!(
        details.parent_gsrn.map(|g| g.to_string()),
        Some(parent.to_string())
    );
    assert_eq!(
        details.metering_point.parent_related_metering_point(),
        Some(h.service.get(parent).await.unwrap().id())
    );

    let page = h.service.list_details(Page::new(1, 10)).await.unwrap();
    let parents: Vec<_> = page
        .items
        .iter()
        .map(|d| d.parent_gsrn.as_ref().map(|g| g.to_string()))
        .collect();
    assert_eq!(parents, vec![None, Some(parent.to_string())]);
}

#[tokio::test]
async fn envelope_without_transaction_id_or_valid_sender_is_refused() {
    let h = harness().await;
    for (tx, sender) in [("", OPERATOR), ("  ", OPERATOR), ("tx-1", "5790000000006")] {
        let err = h
            .service
            .create_metering_point(MarketDocument::new(tx, sender, consumption(GSRN)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "{:?}", err);
    }
    assert!(h.service.get(GSRN).await.is_err());

    // Nothing was stored under the blank id, so a real request still goes through.
    created(&h, GSRN).await;
    assert_eq!(h.service.business_processes_for(GSRN).await.unwrap().len(), 1);
}

/// Business process store whose lookup never sees an existing id, as when
/// two requests with the same transaction id arrive together.
#[derive(Default)]
struct LateDuplicateProvider {
    inner: InMemoryRepositoryProvider,
    processes: InMemoryBusinessProcessRepository,
}

#[async_trait]
impl BusinessProcessRepository for LateDuplicateProvider {
    async fn add(&self, process: &BusinessProcess) -> DomainResult<()> {
        self.processes.add(process).await
    }

    async fn update(&self, process: &BusinessProcess) -> DomainResult<()> {
        self.processes.update(process).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<BusinessProcess>> {
        self.processes.find_by_id(id).await
    }

    async fn find_by_transaction_id(&self, _: &str) -> DomainResult<Option<BusinessProcess>> {
        Ok(None)
    }

    async fn list_for_gsrn(&self, gsrn: &str) -> DomainResult<Vec<BusinessProcess>> {
        self.processes.list_for_gsrn(gsrn).await
    }
}

impl RepositoryProvider for LateDuplicateProvider {
    fn metering_points(&self) -> &dyn MeteringPointRepository {
        self.inner.metering_points()
    }

    fn grid_areas(&self) -> &dyn GridAreaRepository {
        self.inner.grid_areas()
    }

    fn business_processes(&self) -> &dyn BusinessProcessRepository {
        self
    }
}

#[tokio::test]
async fn concurrent_duplicate_transaction_is_rejected() {
    let repos = Arc::new(LateDuplicateProvider::default());
    repos
        .processes
        .add(&BusinessProcess::new(
            "tx-same",
            BusinessProcessType::ConnectMeteringPoint,
            GSRN,
        ))
        .await
        .unwrap();

    let bus = create_event_bus(16);
    let mut subscriber = bus.subscribe();
    let service = MeteringPointService::new(repos.clone(), bus);
    let result = service
        .connect(GSRN, doc("tx-same", on("2021-07-01T22:00:00Z")))
        .await
        .unwrap();
    assert_eq!(result.codes(), vec!["E01"]);
    assert!(result.process_id.is_none());
    assert_eq!(repos.processes.list_for_gsrn(GSRN).await.unwrap().len(), 1);

    let message = tokio::time::timeout(Duration::from_secs(1), subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(message.event, IntegrationEvent::MessageRejected(_)));
}
