//! Metering point API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{EnergySupplierQuery, EnergySupplierSnapshotDto, MeteringPointDto};
use crate::application::market::{
    ChangeAddress, ChangeEnergySupplier, ChangeMeteringConfiguration, CreateMeteringPoint,
    PhysicalStateChange,
};
use crate::application::{BusinessProcessResult, MarketDocument, MeteringPointService};
use crate::interfaces::http::common::{
    domain_error, process_response, ApiResponse, ApiResult, DocumentJson,
};
use crate::interfaces::http::modules::business_processes::BusinessProcessDto;
use crate::shared::pagination::{PaginatedResult, PaginationParams};

/// Metering point handler state
#[derive(Clone)]
pub struct MeteringPointHandlerState {
    pub service: Arc<MeteringPointService>,
}

// ── Business processes ─────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/metering-points",
    tag = "Metering Points",
    request_body = MarketDocument<CreateMeteringPoint>,
    responses(
        (status = 200, description = "Metering point created", body = ApiResponse<BusinessProcessResult>),
        (status = 400, description = "Malformed document"),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn create_metering_point(
    State(state): State<MeteringPointHandlerState>,
    DocumentJson(document): DocumentJson<MarketDocument<CreateMeteringPoint>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.create_metering_point(document).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/metering-points/{gsrn}/connect",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<PhysicalStateChange>,
    responses(
        (status = 200, description = "Metering point connected", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn connect_metering_point(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<PhysicalStateChange>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.connect(&gsrn, document).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/metering-points/{gsrn}/disconnect",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<PhysicalStateChange>,
    responses(
        (status = 200, description = "Metering point disconnected", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn disconnect_metering_point(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<PhysicalStateChange>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.disconnect(&gsrn, document).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/metering-points/{gsrn}/reconnect",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<PhysicalStateChange>,
    responses(
        (status = 200, description = "Metering point reconnected", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn reconnect_metering_point(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<PhysicalStateChange>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.reconnect(&gsrn, document).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/metering-points/{gsrn}/close-down",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<PhysicalStateChange>,
    responses(
        (status = 200, description = "Metering point closed down", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn close_down_metering_point(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<PhysicalStateChange>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.close_down(&gsrn, document).await)
}

#[utoipa::path(
    put,
    path = "/api/v1/metering-points/{gsrn}/address",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<ChangeAddress>,
    responses(
        (status = 200, description = "Address changed", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn change_address(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<ChangeAddress>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.change_address(&gsrn, document).await)
}

#[utoipa::path(
    put,
    path = "/api/v1/metering-points/{gsrn}/metering-configuration",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<ChangeMeteringConfiguration>,
    responses(
        (status = 200, description = "Metering configuration changed", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn change_metering_configuration(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<ChangeMeteringConfiguration>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(
        state
            .service
            .change_metering_configuration(&gsrn, document)
            .await,
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/metering-points/{gsrn}/energy-suppliers",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    request_body = MarketDocument<ChangeEnergySupplier>,
    responses(
        (status = 200, description = "Energy supplier registered", body = ApiResponse<BusinessProcessResult>),
        (status = 422, description = "Process rejected", body = ApiResponse<BusinessProcessResult>)
    )
)]
pub async fn change_energy_supplier(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    DocumentJson(document): DocumentJson<MarketDocument<ChangeEnergySupplier>>,
) -> ApiResult<BusinessProcessResult> {
    process_response(state.service.change_energy_supplier(&gsrn, document).await)
}

// ── Queries ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/metering-points",
    tag = "Metering Points",
    params(PaginationParams),
    responses(
        (status = 200, description = "Metering points ordered by GSRN", body = ApiResponse<PaginatedResult<MeteringPointDto>>)
    )
)]
pub async fn list_metering_points(
    State(state): State<MeteringPointHandlerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResult<MeteringPointDto>> {
    match state.service.list_details(params.into()).await {
        Ok(page) => Ok(Json(ApiResponse::success(
            page.map(|details| MeteringPointDto::from_domain(&details)),
        ))),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/metering-points/{gsrn}",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    responses(
        (status = 200, description = "Metering point details", body = ApiResponse<MeteringPointDto>),
        (status = 400, description = "Invalid GSRN"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_metering_point(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
) -> ApiResult<MeteringPointDto> {
    state
        .service
        .details(&gsrn)
        .await
        .map(|details| Json(ApiResponse::success(MeteringPointDto::from_domain(&details))))
        .map_err(domain_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/metering-points/{gsrn}/energy-suppliers",
    tag = "Metering Points",
    params(
        ("gsrn" = String, Path, description = "GSRN of the metering point"),
        EnergySupplierQuery
    ),
    responses(
        (status = 200, description = "Current and future energy suppliers", body = ApiResponse<EnergySupplierSnapshotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_energy_suppliers(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
    Query(query): Query<EnergySupplierQuery>,
) -> ApiResult<EnergySupplierSnapshotDto> {
    state
        .service
        .energy_suppliers(&gsrn, query.at.as_deref())
        .await
        .map(|snapshot| Json(ApiResponse::success(snapshot.into())))
        .map_err(domain_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/metering-points/{gsrn}/business-processes",
    tag = "Metering Points",
    params(("gsrn" = String, Path, description = "GSRN of the metering point")),
    responses(
        (status = 200, description = "Business processes, newest first", body = ApiResponse<Vec<BusinessProcessDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_business_processes(
    State(state): State<MeteringPointHandlerState>,
    Path(gsrn): Path<String>,
) -> ApiResult<Vec<BusinessProcessDto>> {
    state
        .service
        .business_processes_for(&gsrn)
        .await
        .map(|processes| {
            Json(ApiResponse::success(
                processes.into_iter().map(BusinessProcessDto::from).collect(),
            ))
        })
        .map_err(domain_error)
}
