//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::events::types::{
    AddressChangedEvent, EnergySupplierChangedEvent, MeteringConfigurationChangedEvent,
    MeteringPointCreatedEvent, MessageConfirmedEvent, MessageRejectedEvent,
    PhysicalStateChangedEvent,
};
use crate::application::market::{
    AddressDto, ChangeAddress, ChangeEnergySupplier, ChangeMeteringConfiguration,
    CreateGridArea, CreateMeteringPoint, PhysicalStateChange,
};
use crate::application::{
    BusinessProcessResult, GridAreaService, IntegrationEvent, MeteringPointService,
    SharedEventBus,
};
use crate::domain::{BusinessProcessStatus, BusinessProcessType, RejectionReason, RepositoryProvider};

use super::modules::business_processes::{self, BusinessProcessDto};
use super::modules::grid_areas::{self, GridAreaDto, GridAreaHandlerState};
use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::metering_points::{
    self, EnergySupplierDto, EnergySupplierSnapshotDto, MasterDataDto, MeteringPointDto,
    MeteringPointHandlerState,
};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;

/// Unified state for the `/api/v1` routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub metering_points: Arc<MeteringPointService>,
    pub grid_areas: Arc<GridAreaService>,
}

impl ApiState {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self {
            metering_points: Arc::new(MeteringPointService::new(repos.clone(), event_bus)),
            grid_areas: Arc::new(GridAreaService::new(repos.clone())),
            repos,
        }
    }
}

impl FromRef<ApiState> for MeteringPointHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        MeteringPointHandlerState {
            service: Arc::clone(&s.metering_points),
        }
    }
}

impl FromRef<ApiState> for GridAreaHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        GridAreaHandlerState {
            service: Arc::clone(&s.grid_areas),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Metering points: processes
        metering_points::create_metering_point,
        metering_points::connect_metering_point,
        metering_points::disconnect_metering_point,
        metering_points::reconnect_metering_point,
        metering_points::close_down_metering_point,
        metering_points::change_address,
        metering_points::change_metering_configuration,
        metering_points::change_energy_supplier,
        // Metering points: queries
        metering_points::list_metering_points,
        metering_points::get_metering_point,
        metering_points::get_energy_suppliers,
        metering_points::list_business_processes,
        // Grid areas
        grid_areas::list_grid_areas,
        grid_areas::create_grid_area,
        // Business processes
        business_processes::get_business_process,
    ),
    components(
        schemas(
            // Market documents
            AddressDto,
            CreateMeteringPoint,
            PhysicalStateChange,
            ChangeAddress,
            ChangeMeteringConfiguration,
            ChangeEnergySupplier,
            CreateGridArea,
            // Results
            BusinessProcessResult,
            BusinessProcessType,
            BusinessProcessStatus,
            RejectionReason,
            BusinessProcessDto,
            // Views
            MeteringPointDto,
            MasterDataDto,
            EnergySupplierDto,
            EnergySupplierSnapshotDto,
            GridAreaDto,
            HealthResponse,
            ComponentHealth,
            // Integration events
            IntegrationEvent,
            MeteringPointCreatedEvent,
            PhysicalStateChangedEvent,
            AddressChangedEvent,
            MeteringConfigurationChangedEvent,
            EnergySupplierChangedEvent,
            MessageConfirmedEvent,
            MessageRejectedEvent,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Metering Points", description = "Metering point business processes and queries"),
        (name = "Grid Areas", description = "Grid areas and their grid operators"),
        (name = "Business Processes", description = "Outcome of submitted market documents"),
    ),
    info(
        title = "Metering Point Service API",
        version = "1.0.0",
        description = "Registry of electricity metering points: creation, connection state, master data and energy supplier changes",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `db` feeds the health check; `metrics` enables `GET /metrics`.
pub fn create_api_router(
    state: ApiState,
    event_bus: SharedEventBus,
    db: Option<DatabaseConnection>,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let metering_point_routes = Router::new()
        .route(
            "/",
            get(metering_points::list_metering_points).post(metering_points::create_metering_point),
        )
        .route("/{gsrn}", get(metering_points::get_metering_point))
        .route("/{gsrn}/connect", post(metering_points::connect_metering_point))
        .route(
            "/{gsrn}/disconnect",
            post(metering_points::disconnect_metering_point),
        )
        .route(
            "/{gsrn}/reconnect",
            post(metering_points::reconnect_metering_point),
        )
        .route(
            "/{gsrn}/close-down",
            post(metering_points::close_down_metering_point),
        )
        .route("/{gsrn}/address", put(metering_points::change_address))
        .route(
            "/{gsrn}/metering-configuration",
            put(metering_points::change_metering_configuration),
        )
        .route(
            "/{gsrn}/energy-suppliers",
            get(metering_points::get_energy_suppliers).post(metering_points::change_energy_supplier),
        )
        .route(
            "/{gsrn}/business-processes",
            get(metering_points::list_business_processes),
        )
        .with_state(state.clone());

    let grid_area_routes = Router::new()
        .route(
            "/",
            get(grid_areas::list_grid_areas).post(grid_areas::create_grid_area),
        )
        .with_state(state.clone());

    let business_process_routes = Router::new()
        .route("/{id}", get(business_processes::get_business_process))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            repos: state.repos,
            event_bus,
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/v1/metering-points", metering_point_routes)
        .nest("/api/v1/grid-areas", grid_area_routes)
        .nest("/api/v1/business-processes", business_process_routes);

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
