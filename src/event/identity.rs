//! Identity wrappers for pull request events.

use std::fmt;

use crate::error::ReviewAppError;

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the value is zero.
    pub fn new(value: u64) -> Result<Self, ReviewAppError> {
        if value == 0 {
            return Err(ReviewAppError::InvalidEvent {
                message: "pull request number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Commit sha a review app is deployed from.
///
/// Heroku calls this the source blob "version"; comparisons are exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    /// Wraps a commit sha, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the sha is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ReviewAppError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewAppError::InvalidEvent {
                message: "head commit sha is missing".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the sha.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Repository identified by owner and name, as in `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Builds a slug from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when either part is empty.
    pub fn new(owner: &str, name: &str) -> Result<Self, ReviewAppError> {
        if owner.is_empty() || name.is_empty() {
            return Err(ReviewAppError::Configuration {
                message: format!("repository must be given as owner/name, got '{owner}/{name}'"),
            });
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Parses `owner/name` as found in `GITHUB_REPOSITORY`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when the value does not have
    /// exactly two non-empty segments.
    pub fn parse(value: &str) -> Result<Self, ReviewAppError> {
        let mut segments = value.trim().split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None) => Self::new(owner, name),
            _ => Err(ReviewAppError::Configuration {
                message: format!("repository must be given as owner/name, got '{value}'"),
            }),
        }
    }

    /// Repository owner login.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner, self.name)
    }
}
