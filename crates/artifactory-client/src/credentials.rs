//! Credential handling
//!
//! A client authenticates in exactly one of two ways:
//! - an API key, sent in the `X-JFrog-Art-Api` header
//! - username/password, sent as a standard `Authorization: Basic` header
//!
//! The mode is chosen once, when the client is built, and never changes.

use std::fmt;

use crate::transport::HttpRequest;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Header carrying basic-auth credentials
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Credential types supported
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key authentication
    ApiKey { key: String },

    /// Basic authentication (username/password)
    Basic { username: String, password: String },
}

impl Credentials {
    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey { key: key.into() }
    }

    /// Create basic auth credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Pick the authentication mode from optional configuration values.
    ///
    /// A non-empty API key wins; otherwise username/password are used, with
    /// missing parts treated as empty strings.
    pub fn select(
        username: Option<&str>,
        password: Option<&str>,
        api_key: Option<&str>,
    ) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => Credentials::api_key(key),
            _ => Credentials::basic(username.unwrap_or_default(), password.unwrap_or_default()),
        }
    }

    /// Get the header name and value for these credentials
    pub fn auth_header(&self) -> (&'static str, String) {
        match self {
            Credentials::ApiKey { key } => (API_KEY_HEADER, key.clone()),
            Credentials::Basic { username, password } => {
                let encoded = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{}:{}", username, password),
                );
                (AUTHORIZATION_HEADER, format!("Basic {}", encoded))
            }
        }
    }

    /// Attach the auth header to a request, clearing the header of the
    /// other mode if a caller set it by hand.
    pub fn apply(&self, request: &mut HttpRequest) {
        let (name, value) = self.auth_header();
        request
            .headers
            .retain(|(n, _)| !is_auth_header(n));
        request.set_header(name, value);
    }

    /// Check if API key mode is active
    pub fn is_api_key(&self) -> bool {
        matches!(self, Credentials::ApiKey { .. })
    }
}

/// Check whether a header name carries credentials
pub fn is_auth_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(API_KEY_HEADER) || name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey { .. } => f
                .debug_struct("ApiKey")
                .field("key", &"<redacted>")
                .finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn request() -> HttpRequest {
        HttpRequest::new(Method::GET, Url::parse("http://example.com").unwrap())
    }

    #[test]
    fn test_select_prefers_api_key() {
        let creds = Credentials::select(Some("bob"), Some("sekrit"), Some("abc"));
        assert_eq!(creds, Credentials::api_key("abc"));
    }

    #[test]
    fn test_select_empty_api_key_falls_back_to_basic() {
        let creds = Credentials::select(Some("bob"), Some("sekrit"), Some(""));
        assert_eq!(creds, Credentials::basic("bob", "sekrit"));

        let creds = Credentials::select(None, None, None);
        assert_eq!(creds, Credentials::basic("", ""));
    }

    #[test]
    fn test_api_key_headers() {
        let mut req = request();
        Credentials::api_key("abc").apply(&mut req);

        assert_eq!(req.header_value("X-JFrog-Art-Api"), Some("abc"));
        assert_eq!(req.header_value("Authorization"), None);
    }

    #[test]
    fn test_basic_auth_headers() {
        let mut req = request();
        Credentials::basic("u", "p").apply(&mut req);

        assert_eq!(req.header_value("Authorization"), Some("Basic dTpw"));
        assert_eq!(req.header_value("X-JFrog-Art-Api"), None);
    }

    #[test]
    fn test_apply_clears_other_mode() {
        let mut req = request().header("Authorization", "Bearer stale");
        Credentials::api_key("abc").apply(&mut req);

        assert_eq!(req.header_value("Authorization"), None);
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let basic = format!("{:?}", Credentials::basic("bob", "sekrit"));
        assert!(basic.contains("bob"));
        assert!(!basic.contains("sekrit"));

        let key = format!("{:?}", Credentials::api_key("abc123"));
        assert!(!key.contains("abc123"));
    }
}
