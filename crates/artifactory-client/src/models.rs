//! Repository configuration payloads
//!
//! Field names follow the server's JSON (camelCase, `rclass`).

use serde::{Deserialize, Serialize};

/// Media types understood by the repositories API
pub mod media_types {
    /// Generic JSON
    pub const JSON: &str = "application/json";
    /// Local repository configuration
    pub const LOCAL_REPOSITORY: &str =
        "application/vnd.org.jfrog.artifactory.repositories.LocalRepositoryConfiguration+json";
    /// Virtual repository configuration
    pub const VIRTUAL_REPOSITORY: &str =
        "application/vnd.org.jfrog.artifactory.repositories.VirtualRepositoryConfiguration+json";
}

/// Repository class marker
pub mod rclass {
    pub const LOCAL: &str = "local";
    pub const VIRTUAL: &str = "virtual";
}

/// Configuration of a physically-backed repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalRepositoryConfiguration {
    pub key: String,
    pub rclass: String,
    pub notes: String,
    pub package_type: String,
    pub description: String,
    pub repo_layout_ref: String,
    pub handle_snapshots: bool,
    pub handle_releases: bool,
    pub max_unique_snapshots: u32,
    pub snapshot_version_behavior: String,
}

impl LocalRepositoryConfiguration {
    /// Create a local repository configuration with only the key set
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rclass: rclass::LOCAL.to_string(),
            ..Default::default()
        }
    }

    /// Maven repository that accepts snapshots only, with unique
    /// (timestamped) snapshot versions
    pub fn snapshot(key: impl Into<String>) -> Self {
        Self {
            notes: "Snapshot repository".to_string(),
            package_type: "maven".to_string(),
            repo_layout_ref: "maven-2-default".to_string(),
            handle_snapshots: true,
            handle_releases: false,
            max_unique_snapshots: 0,
            snapshot_version_behavior: "unique".to_string(),
            ..Self::new(key)
        }
    }
}

/// Configuration of a repository that aggregates other repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualRepositoryConfiguration {
    pub key: String,
    pub rclass: String,
    /// Member repository keys, in resolution order
    pub repositories: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub package_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repo_layout_ref: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl VirtualRepositoryConfiguration {
    pub fn new(key: impl Into<String>, repositories: Vec<String>) -> Self {
        Self {
            key: key.into(),
            rclass: rclass::VIRTUAL.to_string(),
            repositories,
            ..Default::default()
        }
    }

    /// Check whether `member` is in the repository list
    pub fn contains(&self, member: &str) -> bool {
        self.repositories.iter().any(|r| r == member)
    }
}
