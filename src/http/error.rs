use crate::domain::model::ErrorBody;
use crate::utils::error::{ErrorCategory, StatsError};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

impl StatsError {
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Configuration | ErrorCategory::System => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.category().as_str().to_string(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Query string extractor whose failures render as validation errors.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StatsError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extracted = Query::<T>::from_request_parts(parts, state).await;
        match extracted {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(StatsError::validation(
                "query",
                parts.uri.query().unwrap_or_default(),
                rejection.body_text(),
            )),
        }
    }
}
