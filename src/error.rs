//! Error taxonomy for the relay and its translation into HTTP responses.

use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Every failure an endpoint can report.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client input missing, malformed or out of range
    #[error("{0}")]
    InvalidArgument(String),

    /// No such record
    #[error("{0}")]
    NotFound(String),

    /// A provider credential is missing from the configuration
    #[error("{0}")]
    Configuration(String),

    /// A provider answered with a non-success status
    #[error("Provider error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// A provider could not be reached
    #[error("Provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The record store failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidArgument(msg)
            | ApiError::NotFound(msg)
            | ApiError::Configuration(msg) => ErrorBody { error: msg.clone(), details: None },
            ApiError::Upstream { message, .. } => ErrorBody {
                error: "Provider returned an error".into(),
                details: Some(message.clone()),
            },
            ApiError::UpstreamUnavailable(msg) => ErrorBody {
                error: "Provider did not respond".into(),
                details: Some(msg.clone()),
            },
            ApiError::Storage(msg) => ErrorBody {
                error: "Storage error".into(),
                details: Some(msg.clone()),
            },
            ApiError::Internal(msg) => ErrorBody {
                error: "Internal server error".into(),
                details: Some(msg.clone()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        }
        (status, Json(self.body())).into_response()
    }
}

/// Classifies a transport-level failure of an outbound call.
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::Internal(format!("Failed to build provider request: {}", e))
        } else if let Some(status) = e.status() {
            ApiError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            }
        } else if e.is_decode() {
            ApiError::Internal(format!("Malformed provider response: {}", e))
        } else {
            ApiError::UpstreamUnavailable(e.to_string())
        }
    }
}
