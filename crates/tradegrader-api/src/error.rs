//! Trade Grader — API error types.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use tradegrader_core::error::DomainError;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A collaborator could not be constructed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable message.
    pub detail: String,
}

/// HTTP-layer error that renders as an [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// A failure raised by the grading or catalog layers.
    Domain(DomainError),
    /// The request body or query string could not be extracted.
    InvalidRequest { status: StatusCode, detail: String },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, detail) = match self {
            ApiError::InvalidRequest { status, detail } => {
                debug!(%status, %detail, "request rejected");
                (status, "invalid_request", detail)
            }
            ApiError::Domain(DomainError::Validation(detail)) => {
                (StatusCode::BAD_REQUEST, "validation_error", detail)
            }
            ApiError::Domain(DomainError::Upstream(detail)) => {
                error!(%detail, "upstream failure");
                let detail = format!("Error analyzing trade: {detail}");
                (StatusCode::BAD_GATEWAY, "upstream_error", detail)
            }
            ApiError::Domain(DomainError::Infrastructure(detail)) => {
                error!(%detail, "infrastructure failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "infrastructure_error",
                    "Internal server error".to_owned(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: error_code,
                detail,
            }),
        )
            .into_response()
    }
}
