//! Response envelope, error mapping and JSON extractors shared by all
//! handlers

mod validated_json;

pub use validated_json::{DocumentJson, ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::BusinessProcessResult;
use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint answers with this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
/// A rejected business process carries both the rejection in `data` and a
/// summary in `error`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn rejected(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError<T>>;

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::BusinessRules(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn domain_error<T>(error: DomainError) -> ApiError<T> {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }
    (status, Json(ApiResponse::error(error.to_string())))
}

/// 200 for an accepted process, 422 with the rejection otherwise.
pub fn process_response(
    result: Result<BusinessProcessResult, DomainError>,
) -> ApiResult<BusinessProcessResult> {
    match result {
        Ok(result) if result.is_accepted() => Ok(Json(ApiResponse::success(result))),
        Ok(result) => {
            let message = format!("Business process rejected: {}", result.codes().join(", "));
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::rejected(result, message)),
            ))
        }
        Err(e) => Err(domain_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::ValidationError;

    #[test]
    fn domain_errors_map_to_status() {
        let cases = [
            (
                DomainError::NotFound {
                    entity: "MeteringPoint",
                    field: "gsrn",
                    value: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                DomainError::from(ValidationError::UnknownGridArea("999".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::Storage("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(status_for(&error), status);
        }
    }

    #[test]
    fn rejected_envelope_keeps_data() {
        let response = ApiResponse::rejected(1, "no");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], 1);
        assert_eq!(json["error"], "no");

        let ok = serde_json::to_value(ApiResponse::success("x")).unwrap();
        assert!(ok.get("error").is_none());
    }
}
