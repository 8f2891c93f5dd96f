//! Results that are not errors
//!
//! A request that reached the server and got a non-2xx, non-5xx answer is a
//! valid API response, not a failure of the call. Operations return it as
//! [`Outcome::Status`] inside `Ok` so callers can decide, for example, that
//! a 404 is expected.

use serde::Deserialize;
use std::fmt;

/// Status code and raw body of a business-level non-success response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatus {
    pub status_code: u16,
    pub entity: Vec<u8>,
}

/// One entry of the server's `{"errors": [...]}` body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorMessage {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorMessage>,
}

impl HttpStatus {
    pub fn new(status_code: u16, entity: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            entity: entity.into(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.entity).into_owned()
    }

    /// Parse the error list from the body, if it has one
    pub fn api_errors(&self) -> Vec<ApiErrorMessage> {
        serde_json::from_slice::<ApiErrorBody>(&self.entity)
            .map(|body| body.errors)
            .unwrap_or_default()
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.api_errors().first() {
            Some(err) => write!(f, "{} {}", self.status_code, err.message),
            None => write!(f, "{} {}", self.status_code, self.text().trim()),
        }
    }
}

/// Result of a call that reached the server without a hard failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// 2xx response, body decoded
    Success(T),
    /// Any other non-5xx response
    Status(HttpStatus),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The business status, if this is not a success
    pub fn status(&self) -> Option<&HttpStatus> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Status(status) => Some(status),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Status(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Status(status) => Outcome::Status(status),
        }
    }

    /// Convert into a plain `Result`, treating the business status as the
    /// error value
    pub fn into_result(self) -> std::result::Result<T, HttpStatus> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Status(status) => Err(status),
        }
    }
}
