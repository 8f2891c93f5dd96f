//! Virtual repository membership
//!
//! Adding or removing a member is a read-modify-write against the server:
//! fetch the virtual repository, change its `repositories` list in memory,
//! and POST the whole configuration back.
//!
//! There is no version token. If someone else changes the same virtual
//! repository between our fetch and our write, their change is overwritten.

use crate::client::{ArtifactoryClient, require_key};
use crate::error::Result;
use crate::outcome::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MembershipChange {
    Add,
    Remove,
}

impl MembershipChange {
    /// Apply the change to `members`, returning whether anything changed
    fn apply(self, members: &mut Vec<String>, member: &str) -> bool {
        match self {
            MembershipChange::Add => {
                if members.iter().any(|m| m == member) {
                    return false;
                }
                members.push(member.to_string());
                true
            }
            MembershipChange::Remove => {
                let before = members.len();
                members.retain(|m| m != member);
                members.len() != before
            }
        }
    }
}

impl ArtifactoryClient {
    /// Add `member` to the virtual repository `virtual_key`.
    ///
    /// A no-op success when `member` is already listed. A business status
    /// from the fetch is returned as-is and nothing is written.
    pub async fn add_repository_to_group(
        &self,
        virtual_key: &str,
        member: &str,
    ) -> Result<Outcome<()>> {
        self.change_membership(virtual_key, member, MembershipChange::Add)
            .await
    }

    /// Remove every occurrence of `member` from the virtual repository
    /// `virtual_key`.
    ///
    /// A no-op success when `member` is not listed.
    pub async fn remove_repository_from_group(
        &self,
        virtual_key: &str,
        member: &str,
    ) -> Result<Outcome<()>> {
        self.change_membership(virtual_key, member, MembershipChange::Remove)
            .await
    }

    async fn change_membership(
        &self,
        virtual_key: &str,
        member: &str,
        change: MembershipChange,
    ) -> Result<Outcome<()>> {
        require_key(virtual_key)?;
        require_key(member)?;

        let mut config = match self
            .virtual_repository_configuration_with_retry(virtual_key)
            .await?
        {
            Outcome::Success(config) => config,
            Outcome::Status(status) => {
                tracing::debug!(
                    virtual_key,
                    status = status.status_code,
                    "virtual repository fetch returned a status, not writing"
                );
                return Ok(Outcome::Status(status));
            }
        };

        if !change.apply(&mut config.repositories, member) {
            tracing::debug!(virtual_key, member, ?change, "membership already up to date");
            return Ok(Outcome::Success(()));
        }

        tracing::info!(
            virtual_key,
            member,
            ?change,
            members = config.repositories.len(),
            "updating virtual repository membership"
        );
        self.write_virtual(virtual_key, &config).await
    }
}
