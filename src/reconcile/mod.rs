//! Review app reconciliation.
//!
//! The reconciler is a two-state machine selected by the pull request
//! action: closing a pull request deletes its review app, every other action
//! provisions the review app for the head commit and waits for the build.
//! Pull requests from forks are skipped on the provisioning branch because
//! their workflows run without secrets.

pub mod locator;
pub mod provisioner;
pub mod waiter;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use locator::find_review_app;
pub use provisioner::{create_review_app, update_review_app};
pub use waiter::{
    BuildTarget, BuildWaiter, DEFAULT_POLL_INTERVAL, PollState, Sleeper, TokioSleeper, poll_once,
};

use crate::error::ReviewAppError;
use crate::event::{PullRequestEvent, PullRequestNumber};
use crate::github::ArchiveGateway;
use crate::heroku::{AppDetails, PipelineId, ReviewAppGateway, ReviewAppId};

/// How a reconciliation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The review app runs the head commit.
    Deployed(AppDetails),
    /// The review app of a closed pull request was deleted.
    Deleted {
        /// Review app that was deleted.
        review_app: ReviewAppId,
    },
    /// Fork pull request; nothing was changed.
    SkippedFork,
    /// A pull request was closed but had no review app.
    MissingOnClose {
        /// Pull request that was closed.
        pr_number: PullRequestNumber,
    },
}

impl ReconcileOutcome {
    /// Whether the run should be reported as successful.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::MissingOnClose { .. })
    }

    /// Message to report when the run failed without an error.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::MissingOnClose { pr_number } => Some(format!(
                "Action \"closed\", yet no existing review app for PR #{pr_number}"
            )),
            _ => None,
        }
    }
}

/// Drives one pull request event to its review app outcome.
pub struct ReviewAppReconciler<'client, Platform, Archive, Pause>
where
    Platform: ReviewAppGateway + ?Sized,
    Archive: ArchiveGateway + ?Sized,
    Pause: Sleeper + ?Sized,
{
    platform: &'client Platform,
    archives: &'client Archive,
    sleeper: &'client Pause,
    pipeline: PipelineId,
    waiter: BuildWaiter,
}

impl<'client, Platform, Archive, Pause> ReviewAppReconciler<'client, Platform, Archive, Pause>
where
    Platform: ReviewAppGateway + ?Sized,
    Archive: ArchiveGateway + ?Sized,
    Pause: Sleeper + ?Sized,
{
    /// Creates a reconciler for review apps in `pipeline`.
    #[must_use]
    pub const fn new(
        platform: &'client Platform,
        archives: &'client Archive,
        sleeper: &'client Pause,
        pipeline: PipelineId,
        waiter: BuildWaiter,
    ) -> Self {
        Self {
            platform,
            archives,
            sleeper,
            pipeline,
            waiter,
        }
    }

    /// Reconciles the review app with `event`.
    ///
    /// # Errors
    ///
    /// Propagates every fatal error from locating, provisioning, polling, or
    /// deleting the review app. A closed pull request without a review app
    /// is reported as [`ReconcileOutcome::MissingOnClose`], not an error.
    pub async fn reconcile(
        &self,
        event: &PullRequestEvent,
    ) -> Result<ReconcileOutcome, ReviewAppError> {
        tracing::debug!(
            action = %event.action,
            branch = %event.branch,
            version = %event.commit_sha,
            repo_id = event.source_repo_id,
            fork = event.is_fork,
            repo_url = %event.source_repo_url,
            pr_number = %event.pr_number,
            repository = %event.repository,
            "deploy info"
        );

        if event.action.is_closed() {
            return self.delete(event).await;
        }

        if event.is_fork {
            tracing::info!("no secrets are available for PRs in forked repos");
            return Ok(ReconcileOutcome::SkippedFork);
        }

        self.provision_and_wait(event).await.map(ReconcileOutcome::Deployed)
    }

    async fn delete(&self, event: &PullRequestEvent) -> Result<ReconcileOutcome, ReviewAppError> {
        tracing::debug!("PR closed, deleting review app...");
        let Some(review_app) =
            find_review_app(self.platform, &self.pipeline, event.pr_number).await?
        else {
            tracing::error!("could not find review app for PR #{}", event.pr_number);
            return Ok(ReconcileOutcome::MissingOnClose {
                pr_number: event.pr_number,
            });
        };

        self.platform.delete_review_app(&review_app.id).await?;
        tracing::info!(review_app = %review_app.id, "PR closed, deleted review app OK");
        Ok(ReconcileOutcome::Deleted {
            review_app: review_app.id,
        })
    }

    async fn provision_and_wait(
        &self,
        event: &PullRequestEvent,
    ) -> Result<AppDetails, ReviewAppError> {
        match find_review_app(self.platform, &self.pipeline, event.pr_number).await? {
            None => {
                create_review_app(self.platform, self.archives, &self.pipeline, event).await?;
            }
            Some(review_app) => {
                update_review_app(self.platform, self.archives, review_app, event).await?;
            }
        }

        let target = BuildTarget {
            pipeline: &self.pipeline,
            pr_number: event.pr_number,
            version: &event.commit_sha,
        };
        self.waiter.wait(self.platform, self.sleeper, target).await
    }
}
