//! Review app sync entrypoint for a GitHub Actions step.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use review_app_sync::action::{
    GithubOutputFile, WriterOutputs, error_command, load_event, notice_command,
    write_app_outputs,
};
use review_app_sync::heroku::AppDetails;
use review_app_sync::reconcile::TokioSleeper;
use review_app_sync::telemetry::init_tracing;
use review_app_sync::{
    GitHubArchiveGateway, HerokuGateway, PullRequestEvent, ReconcileOutcome, ReviewAppConfig,
    ReviewAppError, ReviewAppReconciler,
};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return fail(&error.to_string()),
    };
    init_tracing(config.json_logs, Level::INFO);

    match run(&config).await {
        Ok(ReconcileOutcome::SkippedFork) => {
            announce(&notice_command(
                "Skipping review app for a pull request from a fork; secrets are unavailable",
            ));
            ExitCode::SUCCESS
        }
        Ok(outcome) => match outcome.failure_message() {
            Some(message) => fail(&message),
            None => ExitCode::SUCCESS,
        },
        Err(error) => fail(&error.to_string()),
    }
}

async fn run(config: &ReviewAppConfig) -> Result<ReconcileOutcome, ReviewAppError> {
    let event_name = config.resolve_event_name()?;
    PullRequestEvent::ensure_supported(&event_name)?;
    let mut event = load_event(&event_name, &config.resolve_event_path()?)?;
    if let Some(repository) = config.resolve_repository()? {
        event.repository = repository;
    }

    let pipeline = config.require_pipeline_id()?;
    let heroku = HerokuGateway::for_token(
        &config.require_heroku_api_token()?,
        config.heroku_api_url(),
        config.request_timeout(),
    )?;
    let github = GitHubArchiveGateway::for_token(
        &config.resolve_github_token()?,
        &config.resolve_github_api_url(),
        config.request_timeout(),
    )?;

    let reconciler = ReviewAppReconciler::new(
        &heroku,
        &github,
        &TokioSleeper,
        pipeline,
        config.build_waiter(),
    );
    let outcome = reconciler.reconcile(&event).await?;

    if let ReconcileOutcome::Deployed(details) = &outcome {
        publish_outputs(config, details)?;
        tracing::info!(app = %details.name, "review app deployed");
    }
    Ok(outcome)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ReviewAppError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ReviewAppConfig, ReviewAppError> {
    ReviewAppConfig::load().map_err(|error| ReviewAppError::Configuration {
        message: error.to_string(),
    })
}

fn publish_outputs(config: &ReviewAppConfig, details: &AppDetails) -> Result<(), ReviewAppError> {
    match config.resolve_output_path() {
        Some(path) => write_app_outputs(&mut GithubOutputFile::new(path), details),
        None => write_app_outputs(&mut WriterOutputs::stdout(), details),
    }
}

fn fail(message: &str) -> ExitCode {
    tracing::error!("{message}");
    announce(&error_command(message));
    ExitCode::FAILURE
}

fn announce(command: &str) {
    if writeln!(io::stdout().lock(), "{command}").is_err() {
        tracing::warn!("failed to write workflow command");
    }
}
