//! Error types for the status proxy

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Duration;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while answering a status request.
///
/// Every variant reaches the HTTP boundary untouched; `ResponseError` is the
/// only place that decides the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Status feed older than the freshness threshold
    #[error("status feed is stale (last update {}s ago)", .age.num_seconds())]
    StaleFeed { age: Duration },

    /// Monitoring schema is missing a table or the program status row
    #[error("monitoring schema misconfigured: {0}")]
    Configuration(String),

    /// Database failure while acquiring a connection or running the status query
    #[error("status retrieval failed: {0}")]
    Retrieval(#[from] sqlx::Error),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::StaleFeed { .. } => "STALE_FEED",
            ApiError::Configuration(_) => "CONFIGURATION_ERROR",
            ApiError::Retrieval(_) => "RETRIEVAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::StaleFeed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Configuration(_) | ApiError::Retrieval(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Driver messages can carry host names and SQL; keep them in the logs.
        let message = match self {
            ApiError::Retrieval(_) => "status retrieval failed".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": message,
        }))
    }
}

/// Errors that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener bind or server failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
