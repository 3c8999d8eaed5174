//! Source archives for review app builds.
//!
//! Heroku builds review apps from a tarball URL. GitHub serves tarballs
//! through a redirect to a short-lived download link; this module resolves
//! that link for a commit.

mod archive;
mod error_mapping;

pub use archive::{DEFAULT_GITHUB_API_URL, GitHubArchiveGateway};

use async_trait::async_trait;

use crate::error::ReviewAppError;
use crate::event::{CommitSha, RepositorySlug};

/// Downloadable snapshot of a repository at one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReference {
    /// Download URL.
    pub url: String,
    /// Commit the archive was taken at.
    pub version: CommitSha,
}

/// Resolves archive download URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveGateway: Send + Sync {
    /// Resolve a tarball URL for `reference` in `repository`.
    ///
    /// Called once per provisioning; implementations must not have side
    /// effects beyond producing the URL.
    async fn tarball(
        &self,
        repository: &RepositorySlug,
        reference: &CommitSha,
    ) -> Result<ArchiveReference, ReviewAppError>;
}
