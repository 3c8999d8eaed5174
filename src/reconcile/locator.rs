//! Locating the review app that belongs to a pull request.

use crate::error::ReviewAppError;
use crate::event::PullRequestNumber;
use crate::heroku::{PipelineId, ReviewApp, ReviewAppGateway, ReviewAppStatus};

/// Finds the review app for `pr_number` in `pipeline`.
///
/// An `errored` review app is reported as absent so that reconciliation
/// recreates it. When Heroku still lists an errored app next to a live one,
/// the live one wins.
///
/// # Errors
///
/// Propagates any failure from listing the pipeline's review apps.
pub async fn find_review_app<G>(
    gateway: &G,
    pipeline: &PipelineId,
    pr_number: PullRequestNumber,
) -> Result<Option<ReviewApp>, ReviewAppError>
where
    G: ReviewAppGateway + ?Sized,
{
    let review_apps = gateway.list_review_apps(pipeline).await?;
    tracing::info!(
        "listed {count} review apps OK: {count} apps found",
        count = review_apps.len()
    );

    let (errored, live): (Vec<ReviewApp>, Vec<ReviewApp>) = review_apps
        .into_iter()
        .filter(|app| app.pr_number == Some(pr_number.get()))
        .partition(|app| app.status == ReviewAppStatus::Errored);

    if let Some(app) = live.into_iter().next() {
        tracing::info!(
            review_app = %app.id,
            status = %app.status,
            "found review app for PR #{pr_number} OK"
        );
        return Ok(Some(app));
    }

    if let Some(app) = errored.first() {
        tracing::warn!(
            review_app = %app.id,
            error_status = app.error_status.as_deref().unwrap_or("none"),
            "found review app for PR #{pr_number} OK, but status is \"errored\""
        );
    } else {
        tracing::info!("no review app found for PR #{pr_number}");
    }
    Ok(None)
}
