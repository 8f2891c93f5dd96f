//! Artifactory Repository Client
//!
//! This crate is a thin async client for the Artifactory repositories API:
//!
//! - **Local repositories**: create, fetch configuration, delete, delete items
//! - **Virtual repositories**: fetch configuration, add/remove members
//! - **Existence checks**: `HEAD` on a repository key
//!
//! ## Results
//!
//! Every operation returns `Result<Outcome<T>, ClientError>`:
//!
//! - `Ok(Outcome::Success(value))` for 2xx responses
//! - `Ok(Outcome::Status(status))` for other non-5xx responses (e.g. 404)
//! - `Err(ClientError::Server { .. })` for 5xx responses
//! - `Err(..)` for transport, serialization and precondition failures
//!
//! The existence check is the one exception: `repository_exists` answers a
//! 404 with `Ok(Outcome::Success(false))` rather than a status.
//!
//! ## Example
//!
//! ```rust,no_run
//! use artifactory_client::{ArtifactoryClient, ClientConfig, Outcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://artifactory.example.com/artifactory")
//!     .with_api_key("AKCp...");
//! let client = ArtifactoryClient::new(config)?;
//!
//! client.create_snapshot_repository("libs-snapshot-local").await?;
//!
//! match client.add_repository_to_group("libs-snapshot", "libs-snapshot-local").await? {
//!     Outcome::Success(()) => println!("member added"),
//!     Outcome::Status(status) => println!("server said {}", status),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - Membership changes are read-modify-write without a version token; a
//!   concurrent writer to the same virtual repository can be overwritten
//! - Only the virtual repository fetch is retried, with a fixed delay

pub mod error;
pub mod config;
pub mod credentials;
pub mod transport;
pub mod models;
pub mod outcome;
pub mod retry;
pub mod client;
mod membership;

// Re-exports for convenience
pub use error::{ClientError, Result};
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use models::{LocalRepositoryConfiguration, VirtualRepositoryConfiguration};
pub use outcome::{ApiErrorMessage, HttpStatus, Outcome};
pub use retry::RetryPolicy;
pub use client::ArtifactoryClient;
