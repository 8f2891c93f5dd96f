//! Repository API client
//!
//! Each operation sends one request to `/api/repositories/...` and sorts the
//! answer into one of three buckets:
//! - 2xx: `Ok(Outcome::Success(..))`
//! - 5xx: `Err(ClientError::Server { .. })`
//! - anything else: `Ok(Outcome::Status(..))`

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{ClientError, Result};
use crate::models::{LocalRepositoryConfiguration, VirtualRepositoryConfiguration, media_types};
use crate::outcome::{HttpStatus, Outcome};
use crate::retry::RetryPolicy;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Client for the repositories REST API
///
/// Immutable after construction and cheap to clone; clones share the
/// transport and its connection pool.
#[derive(Clone)]
pub struct ArtifactoryClient {
    base_url: Url,
    credentials: Credentials,
    user_agent: String,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl ArtifactoryClient {
    /// Create a client with a reqwest transport derived from the config
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = config.validate()?;

        Ok(Self {
            base_url,
            credentials: config.credentials(),
            user_agent: config.user_agent.clone(),
            retry: config.retry_policy(),
            transport,
        })
    }

    /// Create a client from `ARTIFACTORY_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    // ============ Operations ============

    /// Create a local repository
    pub async fn create_local_repository(
        &self,
        config: &LocalRepositoryConfiguration,
    ) -> Result<Outcome<()>> {
        let url = self.repository_url(&config.key, None)?;
        let request = self
            .request(Method::PUT, url)
            .header("Accept", media_types::JSON)
            .header("Content-Type", media_types::LOCAL_REPOSITORY)
            .body(serde_json::to_vec(config)?);

        let response = self.execute(request).await?;
        classify_empty(response)
    }

    /// Create a Maven snapshot repository with default settings
    pub async fn create_snapshot_repository(&self, key: &str) -> Result<Outcome<()>> {
        self.create_local_repository(&LocalRepositoryConfiguration::snapshot(key))
            .await
    }

    /// Fetch the configuration of a local repository
    pub async fn local_repository_configuration(
        &self,
        key: &str,
    ) -> Result<Outcome<LocalRepositoryConfiguration>> {
        let url = self.repository_url(key, None)?;
        let request = self
            .request(Method::GET, url)
            .header("Accept", media_types::LOCAL_REPOSITORY);

        let response = self.execute(request).await?;
        classify_json(response)
    }

    /// Fetch the configuration of a virtual repository
    pub async fn virtual_repository_configuration(
        &self,
        key: &str,
    ) -> Result<Outcome<VirtualRepositoryConfiguration>> {
        let url = self.repository_url(key, None)?;
        let request = self
            .request(Method::GET, url)
            .header("Accept", media_types::VIRTUAL_REPOSITORY);

        let response = self.execute(request).await?;
        classify_json(response)
    }

    /// [`Self::virtual_repository_configuration`] under the client's retry
    /// policy. Only errors are retried; a business status returns at once.
    pub async fn virtual_repository_configuration_with_retry(
        &self,
        key: &str,
    ) -> Result<Outcome<VirtualRepositoryConfiguration>> {
        self.retry
            .run(move || self.virtual_repository_configuration(key))
            .await
    }

    /// Check whether a repository exists.
    ///
    /// 2xx maps to `Success(true)` and 404 to `Success(false)`; other
    /// statuses follow the usual classification.
    pub async fn repository_exists(&self, key: &str) -> Result<Outcome<bool>> {
        let url = self.repository_url(key, None)?;
        let response = self.execute(self.request(Method::HEAD, url)).await?;

        if response.status == 404 {
            return Ok(Outcome::Success(false));
        }
        Ok(classify_empty(response)?.map(|()| true))
    }

    /// Delete a repository and everything in it
    pub async fn delete_repository(&self, key: &str) -> Result<Outcome<()>> {
        let url = self.repository_url(key, None)?;
        let response = self.execute(self.request(Method::DELETE, url)).await?;
        classify_empty(response)
    }

    /// Delete one item (file or folder path) from a repository.
    ///
    /// The item must name something below the repository root: an empty
    /// path or one with a `.`/`..` segment is refused before any request.
    pub async fn delete_item(&self, key: &str, item: &str) -> Result<Outcome<()>> {
        let url = self.repository_url(key, Some(item))?;
        let response = self.execute(self.request(Method::DELETE, url)).await?;
        classify_empty(response)
    }

    /// Replace the configuration of a virtual repository
    pub async fn update_virtual_repository(
        &self,
        config: &VirtualRepositoryConfiguration,
    ) -> Result<Outcome<()>> {
        self.write_virtual(&config.key, config).await
    }

    pub(crate) async fn write_virtual(
        &self,
        key: &str,
        config: &VirtualRepositoryConfiguration,
    ) -> Result<Outcome<()>> {
        let url = self.repository_url(key, None)?;
        let request = self
            .request(Method::POST, url)
            .header("Accept", media_types::JSON)
            .header("Content-Type", media_types::VIRTUAL_REPOSITORY)
            .body(serde_json::to_vec(config)?);

        let response = self.execute(request).await?;
        classify_empty(response)
    }

    // ============ Plumbing ============

    /// Build `<base>/api/repositories/<key>[/<item>]`
    fn repository_url(&self, key: &str, item: Option<&str>) -> Result<Url> {
        require_key(key)?;
        let item_path = item.map(|item| item_segments(key, item)).transpose()?;

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "base URL cannot have a path".to_string(),
            })?;
            segments.pop_if_empty().extend(["api", "repositories", key]);
            if let Some(item_path) = item_path {
                segments.extend(item_path);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> HttpRequest {
        let mut request = HttpRequest::new(method, url).header("User-Agent", &self.user_agent);
        self.credentials.apply(&mut request);
        request
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request failed");
            e
        })?;

        tracing::debug!(%method, %url, status = response.status, "received response");
        if response.is_server_error() {
            tracing::warn!(%method, %url, status = response.status, "server error");
        }
        Ok(response)
    }
}

impl std::fmt::Debug for ArtifactoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactoryClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .finish()
    }
}

pub(crate) fn require_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(ClientError::EmptyKey);
    }
    if is_dot_segment(key) {
        return Err(ClientError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Split an item path into its non-empty segments.
///
/// `Url` path building drops `.` and `..` segments, so an item such as `"."`
/// would collapse onto the repository URL itself. Those are rejected here.
fn item_segments<'a>(key: &str, item: &'a str) -> Result<Vec<&'a str>> {
    let segments: Vec<&str> = item.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(ClientError::EmptyItem {
            key: key.to_string(),
        });
    }
    if segments.iter().any(|s| is_dot_segment(s)) {
        return Err(ClientError::InvalidItem {
            key: key.to_string(),
            item: item.to_string(),
        });
    }
    Ok(segments)
}

/// `.` or `..`, including their percent-encoded spellings
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Classify a response whose body is not needed on success
fn classify_empty(response: HttpResponse) -> Result<Outcome<()>> {
    classify(response, |_| Ok(()))
}

/// Classify a response and decode a JSON body on success.
///
/// An empty success body decodes to `T::default()`.
fn classify_json<T>(response: HttpResponse) -> Result<Outcome<T>>
where
    T: DeserializeOwned + Default,
{
    classify(response, |body| {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(body)?)
    })
}

fn classify<T>(
    response: HttpResponse,
    decode: impl FnOnce(&[u8]) -> Result<T>,
) -> Result<Outcome<T>> {
    if response.is_success() {
        return decode(&response.body).map(Outcome::Success);
    }
    if response.is_server_error() {
        return Err(ClientError::server(response.status, &response.body));
    }
    Ok(Outcome::Status(HttpStatus::new(response.status, response.body)))
}
