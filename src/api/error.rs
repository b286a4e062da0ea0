use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Field that transport and decode failures are reported against.
pub const NETWORK_FIELD: &str = "network";

/// A failure tied to one form field.
///
/// Used for local validation failures and for requests the backend rejects.
/// On the wire: `{"field": "name", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    #[serde(alias = "message")]
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        FieldError { field: field.into(), error: error.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

impl std::error::Error for FieldError {}

/// Everything that can go wrong talking to a network repository.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected with a structured field error (locally or by the backend).
    #[error("{0}")]
    Field(#[from] FieldError),

    #[error("network not found")]
    NotFound,

    /// Non-success status whose body was not a field error.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            ApiError::Field(e) => Some(e),
            _ => None,
        }
    }

    /// Converts into a field error for display next to a form.
    ///
    /// Field errors pass through untouched; every other failure becomes a
    /// generic error on the `network` field carrying `fallback`.
    pub fn into_field_error(self, fallback: &str) -> FieldError {
        match self {
            ApiError::Field(e) => e,
            ApiError::NotFound => FieldError::new(NETWORK_FIELD, "Network not found"),
            _ => FieldError::new(NETWORK_FIELD, fallback),
        }
    }
}
