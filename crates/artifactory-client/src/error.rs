//! Error types for client operations
//!
//! Only hard failures live here. A non-2xx, non-5xx answer from the server is
//! a business status and is returned as [`crate::Outcome::Status`] instead.

use thiserror::Error;

/// Client operation errors
#[derive(Debug, Error)]
pub enum ClientError {
    // ============ Precondition Errors ============
    #[error("Repository key must not be empty")]
    EmptyKey,

    #[error("Item path must not be empty (repository {key})")]
    EmptyItem { key: String },

    #[error("Invalid repository key: {key:?}")]
    InvalidKey { key: String },

    #[error("Invalid item path {item:?} in repository {key}: `.` and `..` segments are not allowed")]
    InvalidItem { key: String, item: String },

    // ============ Configuration Errors ============
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid client configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Network Errors ============
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timeout after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Operation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Build a server error from a raw 5xx response body
    pub fn server(status: u16, body: &[u8]) -> Self {
        ClientError::Server {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Check whether this error came from a 5xx response
    pub fn is_server_error(&self) -> bool {
        match self {
            ClientError::Server { .. } => true,
            ClientError::RetriesExhausted { source, .. } => source.is_server_error(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout {
                millis: crate::config::DEFAULT_TIMEOUT_MS,
            }
        } else if e.is_connect() {
            ClientError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else if e.is_builder() {
            ClientError::InvalidUrl {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        } else {
            ClientError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for ClientError {
    fn from(e: serde_yaml::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}
