//! Grid area API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::GridAreaDto;
use crate::application::market::CreateGridArea;
use crate::application::GridAreaService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct GridAreaHandlerState {
    pub service: Arc<GridAreaService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/grid-areas",
    tag = "Grid Areas",
    responses(
        (status = 200, description = "Grid areas ordered by code", body = ApiResponse<Vec<GridAreaDto>>)
    )
)]
pub async fn list_grid_areas(
    State(state): State<GridAreaHandlerState>,
) -> ApiResult<Vec<GridAreaDto>> {
    state
        .service
        .list()
        .await
        .map(|areas| Json(ApiResponse::success(areas.into_iter().map(Into::into).collect())))
        .map_err(domain_error)
}

#[utoipa::path(
    post,
    path = "/api/v1/grid-areas",
    tag = "Grid Areas",
    request_body = CreateGridArea,
    responses(
        (status = 201, description = "Grid area created", body = ApiResponse<GridAreaDto>),
        (status = 409, description = "Code already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_grid_area(
    State(state): State<GridAreaHandlerState>,
    ValidatedJson(body): ValidatedJson<CreateGridArea>,
) -> Result<(StatusCode, Json<ApiResponse<GridAreaDto>>), ApiError<GridAreaDto>> {
    match state.service.create_grid_area(body).await {
        Ok(area) => Ok((StatusCode::CREATED, Json(ApiResponse::success(area.into())))),
        Err(e) => Err(domain_error(e)),
    }
}
