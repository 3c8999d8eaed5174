//! Creating review apps and triggering builds on existing ones.

use crate::error::ReviewAppError;
use crate::event::PullRequestEvent;
use crate::github::{ArchiveGateway, ArchiveReference};
use crate::heroku::{
    NewReviewApp, PipelineId, ReviewApp, ReviewAppEnvironment, ReviewAppGateway, SourceBlob,
};

use super::locator::find_review_app;

/// Creates a review app for the event's head commit.
///
/// A conflict from Heroku means a concurrent trigger created the review app
/// after this run looked for it; the existing app is located and returned
/// instead.
///
/// # Errors
///
/// Returns [`ReviewAppError::ConflictUnresolved`] when Heroku reports a
/// conflict but no review app can be located, and propagates archive and
/// gateway failures.
pub async fn create_review_app<G, A>(
    gateway: &G,
    archives: &A,
    pipeline: &PipelineId,
    event: &PullRequestEvent,
) -> Result<ReviewApp, ReviewAppError>
where
    G: ReviewAppGateway + ?Sized,
    A: ArchiveGateway + ?Sized,
{
    let archive = archives
        .tarball(&event.repository, &event.commit_sha)
        .await?;

    let request = NewReviewApp {
        branch: event.branch.clone(),
        pipeline: pipeline.clone(),
        source_blob: source_blob(archive),
        fork_repo_id: event.fork_repo_id(),
        pr_number: event.pr_number.get(),
        environment: ReviewAppEnvironment {
            git_repo_url: event.source_repo_url.clone(),
        },
    };

    match gateway.create_review_app(&request).await {
        Ok(app) => {
            tracing::info!(review_app = %app.id, status = %app.status, "created review app OK");
            Ok(app)
        }
        Err(ReviewAppError::Conflict { message }) => {
            tracing::warn!("review app now seems to exist after previously not: {message}");
            find_review_app(gateway, pipeline, event.pr_number)
                .await?
                .ok_or(ReviewAppError::ConflictUnresolved {
                    pr_number: event.pr_number.get(),
                })
        }
        Err(error) => Err(error),
    }
}

/// Starts a build of the event's head commit on an existing review app.
///
/// Returns the review app unchanged; the new build is what the waiter
/// observes.
///
/// # Errors
///
/// Returns [`ReviewAppError::UnexpectedAppStatus`] when the review app has
/// no app to build yet, and propagates archive and gateway failures.
pub async fn update_review_app<G, A>(
    gateway: &G,
    archives: &A,
    review_app: ReviewApp,
    event: &PullRequestEvent,
) -> Result<ReviewApp, ReviewAppError>
where
    G: ReviewAppGateway + ?Sized,
    A: ArchiveGateway + ?Sized,
{
    let Some(app) = review_app.app.as_ref() else {
        return Err(ReviewAppError::UnexpectedAppStatus {
            status: review_app.status.to_string(),
            message: review_app.message.clone(),
            error_status: review_app.error_status.clone(),
        });
    };

    let archive = archives
        .tarball(&event.repository, &event.commit_sha)
        .await?;
    let build = gateway.create_build(&app.id, &source_blob(archive)).await?;
    tracing::info!(
        review_app = %review_app.id,
        build = %build.id,
        "updated review app OK"
    );

    Ok(review_app)
}

fn source_blob(archive: ArchiveReference) -> SourceBlob {
    SourceBlob {
        url: archive.url,
        version: archive.version.to_string(),
    }
}
