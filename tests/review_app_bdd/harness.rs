//! Mock payloads and the reconciliation driver for the review app BDD tests.

use std::time::Duration;

use review_app_sync::action::write_app_outputs;
use review_app_sync::heroku::PipelineId;
use review_app_sync::reconcile::BuildWaiter;
use review_app_sync::test_support::{ImmediateSleeper, RecordingOutputs};
use review_app_sync::{
    ApiToken, GitHubArchiveGateway, HerokuGateway, ReconcileOutcome, ReviewAppError,
    ReviewAppReconciler,
};
use serde_json::{Value, json};
use wiremock::{Mock, MockServer};

use super::state::{ReviewAppState, ensure_runtime_and_server};

pub(crate) const PIPELINE_ID: &str = "pipe-1";

/// Event payload for a pull request in `octo/shop`.
pub(crate) fn event_payload(action: &str, pr_number: u64, sha: &str, fork: bool) -> Value {
    json!({
        "action": action,
        "pull_request": {
            "number": pr_number,
            "head": {
                "ref": "feature",
                "sha": sha,
                "repo": {
                    "id": 4242,
                    "fork": fork,
                    "html_url": "https://github.com/octo/shop"
                }
            }
        },
        "repository": { "name": "shop", "owner": { "login": "octo" } }
    })
}

/// Review app record as listed by the Platform API.
pub(crate) fn review_app_json(pr_number: u64, status: &str, app_id: Option<&str>) -> Value {
    json!({
        "id": format!("ra-{pr_number}"),
        "pr_number": pr_number,
        "status": status,
        "app": app_id.map(|id| json!({ "id": id })),
        "error_status": null,
        "message": null
    })
}

/// Build record for `app-7`.
pub(crate) fn build_json(sha: &str, status: &str, error_status: Option<&str>) -> Value {
    json!({
        "id": format!("build-{sha}"),
        "app": { "id": "app-7" },
        "source_blob": { "url": "https://example.invalid/source.tgz", "version": sha },
        "status": status,
        "error_status": error_status
    })
}

/// App details for `app-7`.
pub(crate) fn app_json() -> Value {
    json!({
        "id": "app-7",
        "name": "shop-pr-7",
        "web_url": "https://shop-pr-7.herokuapp.com/"
    })
}

/// Mounts `mock` on the scenario's server.
pub(crate) fn mount(state: &ReviewAppState, mock: Mock) -> Result<(), ReviewAppError> {
    let runtime = ensure_runtime_and_server(state)?;
    state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)))
        .ok_or_else(|| ReviewAppError::Api {
            message: "mock server not initialised".to_owned(),
        })
}

/// Runs the reconciler against the scenario's server and records the result.
///
/// Heroku is served under `/heroku` and GitHub under `/github`.
pub(crate) fn run_reconciliation(state: &ReviewAppState) -> Result<(), ReviewAppError> {
    let runtime = ensure_runtime_and_server(state)?;
    let server_url = state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| ReviewAppError::Api {
            message: "mock server URL missing".to_owned(),
        })?;
    let event = state.event.get().ok_or_else(|| ReviewAppError::Api {
        message: "pull request event not configured".to_owned(),
    })?;

    let timeout = Duration::from_secs(5);
    let heroku = HerokuGateway::for_token(
        &ApiToken::new("heroku-token", "heroku_api_token")?,
        &format!("{server_url}/heroku"),
        timeout,
    )?;
    let github = GitHubArchiveGateway::for_token(
        &ApiToken::new("github-token", "github_token")?,
        &format!("{server_url}/github"),
        timeout,
    )?;
    let reconciler = ReviewAppReconciler::new(
        &heroku,
        &github,
        &ImmediateSleeper,
        PipelineId::new(PIPELINE_ID),
        BuildWaiter::default().with_max_attempts(Some(10)),
    );

    let mut outputs = RecordingOutputs::default();
    let result = runtime.block_on(reconciler.reconcile(&event));
    match result {
        Ok(outcome) => {
            if let ReconcileOutcome::Deployed(details) = &outcome {
                write_app_outputs(&mut outputs, details)?;
            }
            drop(state.error.take());
            state.outcome.set(outcome);
        }
        Err(error) => {
            drop(state.outcome.take());
            state.error.set(error);
        }
    }
    state.outputs.set(outputs.outputs().to_vec());

    Ok(())
}
