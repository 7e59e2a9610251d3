//! Error types for the REST API client

use mofa_api_contract::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Server returned error status {status}: {}", .details.reason())]
    ServerError {
        status: StatusCode,
        details: ErrorBody,
    },

    #[error("Unexpected response (status {status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },
}

impl RestClientError {
    /// HTTP status attached to the error, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestClientError::ServerError { status, .. }
            | RestClientError::UnexpectedResponse { status, .. } => Some(*status),
            RestClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;
