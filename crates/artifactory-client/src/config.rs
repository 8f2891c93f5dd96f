//! Client configuration
//!
//! Stored in `~/.config/artifactory-client/config.yaml` or built in code:
//!
//! ```yaml
//! baseUrl: https://artifactory.example.com/artifactory
//! apiKey: AKCp...
//! timeoutMs: 10000
//! retryAttempts: 3
//! retryDelayMs: 2000
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;

/// Per-request timeout in milliseconds used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Environment variables read by [`ClientConfig::from_env`]
pub mod env_vars {
    pub const URL: &str = "ARTIFACTORY_URL";
    pub const USERNAME: &str = "ARTIFACTORY_USERNAME";
    pub const PASSWORD: &str = "ARTIFACTORY_PASSWORD";
    pub const API_KEY: &str = "ARTIFACTORY_API_KEY";
}

/// Connection settings for an [`crate::ArtifactoryClient`]
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Server base URL, including any context path such as `/artifactory`
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Takes precedence over username/password when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Skip TLS verification (insecure, not recommended)
    #[serde(default)]
    pub insecure_skip_tls: bool,

    /// CA bundle for TLS verification (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<PathBuf>,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("artifactory-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_retry_attempts() -> u32 {
    RetryPolicy::DEFAULT_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    RetryPolicy::DEFAULT_DELAY.as_millis() as u64
}

impl ClientConfig {
    /// Create a configuration for the given server with no credentials
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            insecure_skip_tls: false,
            ca_bundle: None,
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout, kept at millisecond precision (minimum 1ms)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = (timeout.as_millis() as u64).max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_insecure_skip_tls(mut self, insecure: bool) -> Self {
        self.insecure_skip_tls = insecure;
        self
    }

    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_attempts = policy.attempts();
        self.retry_delay_ms = policy.delay().as_millis() as u64;
        self
    }

    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Build a configuration from `ARTIFACTORY_*` environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(env_vars::URL).map_err(|_| ClientError::InvalidConfig {
            message: format!("Environment variable {} not set", env_vars::URL),
        })?;

        let mut config = Self::new(base_url);
        config.username = std::env::var(env_vars::USERNAME).ok();
        config.password = std::env::var(env_vars::PASSWORD).ok();
        config.api_key = std::env::var(env_vars::API_KEY).ok();
        Ok(config)
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;

        // The file may hold a password or API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            std::io::Write::write_all(&mut options.open(path)?, content.as_bytes())?;
            Ok(())
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, content)?;
            Ok(())
        }
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ClientError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("artifactory-client").join("config.yaml"))
    }

    /// Resolve the authentication mode
    pub fn credentials(&self) -> Credentials {
        Credentials::select(
            self.username.as_deref(),
            self.password.as_deref(),
            self.api_key.as_deref(),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    /// Check the configuration and return the parsed base URL.
    ///
    /// Credentials are not required: without an API key or username the
    /// client falls back to basic auth with empty values.
    pub fn validate(&self) -> Result<Url> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig {
                message: "baseUrl is required".to_string(),
            });
        }

        let url = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials())
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("insecure_skip_tls", &self.insecure_skip_tls)
            .field("ca_bundle", &self.ca_bundle)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}
