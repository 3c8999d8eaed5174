//! Pull request events that trigger review app reconciliation.
//!
//! The runner delivers the event as a JSON payload plus an event name. Both
//! are validated once at the boundary and turned into an immutable
//! [`PullRequestEvent`] that the reconciler consumes.

mod identity;

pub use identity::{CommitSha, PullRequestNumber, RepositorySlug};

use std::fmt;

use serde::Deserialize;

use crate::error::ReviewAppError;

/// Event name the runner reports for pull request triggers.
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// Activity types GitHub reports for `pull_request` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    /// A pull request was opened.
    Opened,
    /// Title or body changed.
    Edited,
    /// Closed, merged or not.
    Closed,
    /// A previously closed pull request was reopened.
    Reopened,
    /// The head branch received new commits.
    Synchronize,
    /// An assignee was added.
    Assigned,
    /// An assignee was removed.
    Unassigned,
    /// A label was added.
    Labeled,
    /// A label was removed.
    Unlabeled,
    /// A review was requested.
    ReviewRequested,
    /// A review request was withdrawn.
    ReviewRequestRemoved,
    /// A draft was marked ready for review.
    ReadyForReview,
    /// The pull request was turned into a draft.
    ConvertedToDraft,
    /// Conversation was locked.
    Locked,
    /// Conversation was unlocked.
    Unlocked,
    /// Auto-merge was enabled.
    AutoMergeEnabled,
    /// Auto-merge was disabled.
    AutoMergeDisabled,
    /// Added to a milestone.
    Milestoned,
    /// Removed from a milestone.
    Demilestoned,
    /// Added to a merge queue.
    Enqueued,
    /// Removed from a merge queue.
    Dequeued,
}

impl PullRequestAction {
    /// Returns the action as it appears in the payload.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Edited => "edited",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Synchronize => "synchronize",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
            Self::ReviewRequested => "review_requested",
            Self::ReviewRequestRemoved => "review_request_removed",
            Self::ReadyForReview => "ready_for_review",
            Self::ConvertedToDraft => "converted_to_draft",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::AutoMergeEnabled => "auto_merge_enabled",
            Self::AutoMergeDisabled => "auto_merge_disabled",
            Self::Milestoned => "milestoned",
            Self::Demilestoned => "demilestoned",
            Self::Enqueued => "enqueued",
            Self::Dequeued => "dequeued",
        }
    }

    /// Whether the action tears the review app down.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A validated pull request event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// What happened to the pull request.
    pub action: PullRequestAction,
    /// Head branch name.
    pub branch: String,
    /// Head commit the review app must be deployed from.
    pub commit_sha: CommitSha,
    /// Numeric identifier of the head repository.
    pub source_repo_id: u64,
    /// Whether the head repository is a fork of the base repository.
    pub is_fork: bool,
    /// HTML URL of the head repository.
    pub source_repo_url: String,
    /// Pull request number.
    pub pr_number: PullRequestNumber,
    /// Base repository the workflow runs in.
    pub repository: RepositorySlug,
}

impl PullRequestEvent {
    /// Validates the event name and parses the payload.
    ///
    /// The event name is checked first so that a mismatched trigger is
    /// rejected without looking at the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::EventMismatch`] when `event_name` is not
    /// `pull_request`, or [`ReviewAppError::InvalidEvent`] when the payload is
    /// malformed, carries an unknown action, or lacks the head repository.
    pub fn from_payload(event_name: &str, payload: &str) -> Result<Self, ReviewAppError> {
        Self::ensure_supported(event_name)?;

        let api: ApiEventPayload =
            serde_json::from_str(payload).map_err(|error| ReviewAppError::InvalidEvent {
                message: error.to_string(),
            })?;

        Self::try_from(api)
    }

    /// Rejects workflow triggers other than `pull_request`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::EventMismatch`] naming the actual trigger.
    pub fn ensure_supported(event_name: &str) -> Result<(), ReviewAppError> {
        if event_name == PULL_REQUEST_EVENT {
            Ok(())
        } else {
            Err(ReviewAppError::EventMismatch {
                event_name: event_name.to_owned(),
            })
        }
    }

    /// Repository id Heroku should treat as a fork, if any.
    #[must_use]
    pub const fn fork_repo_id(&self) -> Option<u64> {
        if self.is_fork {
            Some(self.source_repo_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEventPayload {
    action: PullRequestAction,
    pull_request: ApiPullRequest,
    repository: ApiRepository,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    head: ApiHead,
}

#[derive(Debug, Deserialize)]
struct ApiHead {
    #[serde(rename = "ref")]
    branch: String,
    sha: String,
    repo: Option<ApiHeadRepository>,
}

#[derive(Debug, Deserialize)]
struct ApiHeadRepository {
    id: u64,
    #[serde(default)]
    fork: bool,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    owner: ApiOwner,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl TryFrom<ApiEventPayload> for PullRequestEvent {
    type Error = ReviewAppError;

    fn try_from(value: ApiEventPayload) -> Result<Self, Self::Error> {
        let ApiEventPayload {
            action,
            pull_request,
            repository,
        } = value;

        // GitHub nulls the head repository once a fork is deleted.
        let head_repo = pull_request
            .head
            .repo
            .ok_or_else(|| ReviewAppError::InvalidEvent {
                message: "head repository is no longer available".to_owned(),
            })?;

        Ok(Self {
            action,
            branch: pull_request.head.branch,
            commit_sha: CommitSha::new(&pull_request.head.sha)?,
            source_repo_id: head_repo.id,
            is_fork: head_repo.fork,
            source_repo_url: head_repo.html_url,
            pr_number: PullRequestNumber::new(pull_request.number)?,
            repository: RepositorySlug::new(&repository.owner.login, &repository.name)?,
        })
    }
}
