//! Business process API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::dto::BusinessProcessDto;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult};
use crate::interfaces::http::modules::metering_points::MeteringPointHandlerState;

#[utoipa::path(
    get,
    path = "/api/v1/business-processes/{id}",
    tag = "Business Processes",
    params(("id" = Uuid, Path, description = "Business process id")),
    responses(
        (status = 200, description = "Business process", body = ApiResponse<BusinessProcessDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_business_process(
    State(state): State<MeteringPointHandlerState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BusinessProcessDto> {
    state
        .service
        .business_process(id)
        .await
        .map(|process| Json(ApiResponse::success(process.into())))
        .map_err(domain_error)
}
