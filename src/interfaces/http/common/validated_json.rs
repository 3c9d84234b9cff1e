//! JSON extractors for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value and answers
//! 422 with field-level details on failure.
//!
//! `DocumentJson<T>` does the same for market documents, whose `Validate`
//! impl only covers the envelope (transaction id, sender GLN). Payload
//! format errors are checked inside the business process so that they end
//! up in the rejection message.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;
use crate::application::market::validate_input;
use crate::domain::rules::ValidationError;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateGridArea>) {
///     // `body` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// An extractor for market documents: 400 on bad JSON, 422 on a bad
/// envelope.
pub struct DocumentJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(Vec<ValidationError>),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let message = if errors.is_empty() {
                    "Validation failed".to_string()
                } else {
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        let errors = validate_input(&value);
        if !errors.is_empty() {
            return Err(ValidatedJsonRejection::ValidationError(errors));
        }

        Ok(ValidatedJson(value))
    }
}

impl<S, T> FromRequest<S> for DocumentJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        ValidatedJson::<T>::from_request(req, state)
            .await
            .map(|ValidatedJson(value)| DocumentJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
