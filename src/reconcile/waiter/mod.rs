//! Polling a review app until the build of the target commit finishes.
//!
//! Each poll re-locates the review app and classifies what it sees:
//!
//! | Observation | Outcome |
//! |---|---|
//! | review app `pending` / `creating` | keep polling |
//! | review app missing or `errored` | [`ReviewAppError::ReviewAppMissing`] |
//! | review app `deleting` | [`ReviewAppError::UnexpectedAppStatus`] |
//! | no app attached | [`ReviewAppError::UnexpectedAppStatus`] |
//! | no build for the commit | [`ReviewAppError::NoMatchingBuild`] |
//! | build `pending` | keep polling |
//! | build `succeeded` | finished |
//! | any other build status | [`ReviewAppError::UnexpectedBuildStatus`] |
//!
//! Polls are separated by a fixed delay obtained from a [`Sleeper`], so tests
//! can count iterations without waiting.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ReviewAppError;
use crate::event::{CommitSha, PullRequestNumber};
use crate::heroku::{AppDetails, AppId, BuildStatus, PipelineId, ReviewAppGateway, ReviewAppStatus};

use super::locator::find_review_app;

/// Delay between polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Suspends the current task between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Not ready yet; poll again after the delay.
    Pending,
    /// The target build succeeded on this app.
    Finished(AppId),
}

/// What the waiter is waiting for.
#[derive(Debug, Clone, Copy)]
pub struct BuildTarget<'a> {
    /// Pipeline the review app lives in.
    pub pipeline: &'a PipelineId,
    /// Pull request the review app belongs to.
    pub pr_number: PullRequestNumber,
    /// Commit the build must have been created from.
    pub version: &'a CommitSha,
}

/// Polls until the build for a commit reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildWaiter {
    interval: Duration,
    max_attempts: Option<u32>,
}

impl Default for BuildWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl BuildWaiter {
    /// Creates a waiter that polls forever with the given delay.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Bounds the number of polls; `None` or zero polls without limit.
    #[must_use]
    pub fn with_max_attempts(self, max_attempts: Option<u32>) -> Self {
        Self {
            max_attempts: max_attempts.filter(|attempts| *attempts > 0),
            ..self
        }
    }

    /// Delay between polls.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls until the target build succeeds and returns the app details.
    ///
    /// # Errors
    ///
    /// Returns the fatal classifications described in the module docs,
    /// [`ReviewAppError::PollTimeout`] when a bound is configured and
    /// exhausted, and propagates gateway failures.
    pub async fn wait<G, S>(
        &self,
        gateway: &G,
        sleeper: &S,
        target: BuildTarget<'_>,
    ) -> Result<AppDetails, ReviewAppError>
    where
        G: ReviewAppGateway + ?Sized,
        S: Sleeper + ?Sized,
    {
        let mut attempts: u32 = 0;
        let app_id = loop {
            attempts = attempts.saturating_add(1);
            match poll_once(gateway, target).await? {
                PollState::Finished(app_id) => break app_id,
                PollState::Pending => {
                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(ReviewAppError::PollTimeout {
                            pr_number: target.pr_number.get(),
                            attempts,
                        });
                    }
                    tracing::debug!(attempts, "review app not ready yet");
                    sleeper.sleep(self.interval).await;
                }
            }
        };

        tracing::info!(attempts, "build for version {} finished", target.version);
        let details = gateway.app(&app_id).await?;
        tracing::info!(app = %details.id, name = %details.name, "got app details OK");
        Ok(details)
    }
}

/// Performs one poll of the review app and its builds.
///
/// # Errors
///
/// Returns the fatal classifications described in the module docs and
/// propagates gateway failures.
pub async fn poll_once<G>(gateway: &G, target: BuildTarget<'_>) -> Result<PollState, ReviewAppError>
where
    G: ReviewAppGateway + ?Sized,
{
    let review_app = find_review_app(gateway, target.pipeline, target.pr_number)
        .await?
        .ok_or(ReviewAppError::ReviewAppMissing {
            pr_number: target.pr_number.get(),
        })?;
    tracing::debug!(
        review_app = %review_app.id,
        status = %review_app.status,
        "checking build status"
    );

    match review_app.status {
        ReviewAppStatus::Pending | ReviewAppStatus::Creating => return Ok(PollState::Pending),
        ReviewAppStatus::Deleting => {
            return Err(ReviewAppError::UnexpectedAppStatus {
                status: review_app.status.to_string(),
                message: review_app.message,
                error_status: review_app.error_status,
            });
        }
        _ => {}
    }

    let Some(app) = review_app.app else {
        return Err(ReviewAppError::UnexpectedAppStatus {
            status: review_app.status.to_string(),
            message: review_app.message,
            error_status: review_app.error_status,
        });
    };

    let builds = gateway.app_builds(&app.id).await?;
    tracing::debug!("fetched latest builds for app {} OK: {} builds found", app.id, builds.len());

    let Some(build) = builds
        .into_iter()
        .find(|build| build.source_version.as_deref() == Some(target.version.as_str()))
    else {
        tracing::error!("could not find build matching version {}", target.version);
        return Err(ReviewAppError::NoMatchingBuild {
            app_id: app.id.to_string(),
            version: target.version.to_string(),
        });
    };
    tracing::info!(build = %build.id, status = %build.status, "found build matching version {}", target.version);

    match build.status {
        BuildStatus::Succeeded => Ok(PollState::Finished(app.id)),
        BuildStatus::Pending => Ok(PollState::Pending),
        BuildStatus::Failed | BuildStatus::Unknown => Err(ReviewAppError::UnexpectedBuildStatus {
            status: build.status.to_string(),
            error_status: build.error_status.or(review_app.error_status),
        }),
    }
}
