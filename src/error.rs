//! Client Error Types
//!
//! One error type for everything a caller can hit: transport failures,
//! non-2xx responses, undecodable bodies, local validation and storage.
//! `Display` is the human-readable message shown at the point of use.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the MacroFacts client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        request_id: Option<String>,
        details: Option<serde_json::Value>,
    },

    /// The response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The server answered but the resource was absent
    #[error("{0}")]
    NotFound(String),

    /// Persistent storage failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Build a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status for server-side failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server error code, when the envelope carried one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Server request id, when the envelope carried one
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// True for a 401 response; the only token-expiry signal there is
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
