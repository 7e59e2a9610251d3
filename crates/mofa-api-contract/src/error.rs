//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid agent type: {0} (expected 'agent-hub' or 'examples')")]
    InvalidAgentType(String),

    #[error("Invalid run target: {0} (expected 'auto', 'example' or 'atomic')")]
    InvalidRunTarget(String),
}

/// Body the backend sends alongside a non-2xx status
///
/// The backend is not consistent about which key carries the reason, so both
/// `message` and `error` are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Human-readable reason, preferring `message` over `error`
    pub fn reason(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("no message")
    }
}
