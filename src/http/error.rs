//! Maps dispatch failures to HTTP responses.
//!
//! Only validation failures are client errors (400). Everything else,
//! including "product does not exist", is reported as 500 with the error text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::DispatchError;
use crate::validation::ValidationFailure;

pub const VALIDATION_ERROR_MESSAGE: &str = "Validation errors occurred";

/// JSON error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationFailure>>,
}

/// Wrapper so axum handlers can return `Result<_, HttpError>` and use `?` on
/// `Mediator::send`.
#[derive(Debug)]
pub struct HttpError(pub DispatchError);

impl From<DispatchError> for HttpError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            DispatchError::Validation(err) => {
                debug!(
                    property = err.property_name(),
                    message = err.message(),
                    "Returning validation failure"
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        message: VALIDATION_ERROR_MESSAGE.to_string(),
                        errors: Some(vec![err.failure]),
                    },
                )
            }
            DispatchError::Product(err) => {
                warn!(error = %err, "Request rejected by product rules");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(err.to_string()))
            }
            other => {
                error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(other.to_string()))
            }
        };
        (status, Json(body)).into_response()
    }
}

fn plain(message: String) -> ErrorResponse {
    ErrorResponse {
        message,
        errors: None,
    }
}
