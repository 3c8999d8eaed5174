//! Action configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.review-app.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `INPUT_<FIELD>`, which is how the Actions
//!    runner passes `with:` inputs to a step
//! 4. **Command-line arguments** – `--heroku-pipeline-id` and friends
//!
//! Runner-provided values (`GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH`,
//! `GITHUB_OUTPUT`, `GITHUB_REPOSITORY`, `GITHUB_API_URL`, `GITHUB_TOKEN`)
//! are used when the corresponding field is unset or blank.
//!
//! # Configuration File
//!
//! ```toml
//! heroku_pipeline_id = "9a8b7c6d-0000-4000-8000-1234567890ab"
//! poll_interval_seconds = 10
//! max_poll_attempts = 180
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::event::RepositorySlug;
use crate::github::DEFAULT_GITHUB_API_URL;
use crate::heroku::{DEFAULT_HEROKU_API_URL, PipelineId};
use crate::reconcile::{BuildWaiter, DEFAULT_POLL_INTERVAL};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for one reconciliation run.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use review_app_sync::ReviewAppConfig;
///
/// let config = ReviewAppConfig::load().expect("failed to load configuration");
/// let pipeline = config.require_pipeline_id().expect("pipeline required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "INPUT",
    discovery(
        dotfile_name = ".review-app.toml",
        config_file_name = "review-app.toml",
        app_name = "review-app-sync"
    )
)]
pub struct ReviewAppConfig {
    /// Token for the GitHub REST API.
    ///
    /// Falls back to `GITHUB_TOKEN`.
    #[ortho_config()]
    pub github_token: Option<String>,

    /// Token for the Heroku Platform API.
    #[ortho_config()]
    pub heroku_api_token: Option<String>,

    /// Pipeline whose review apps are managed.
    #[ortho_config(cli_short = 'p')]
    pub heroku_pipeline_id: Option<String>,

    /// Heroku Platform API base URL.
    #[ortho_config()]
    pub heroku_api_url: String,

    /// GitHub REST API base URL.
    ///
    /// Falls back to `GITHUB_API_URL`, then to the public API.
    #[ortho_config()]
    pub github_api_url: Option<String>,

    /// Name of the triggering event. Falls back to `GITHUB_EVENT_NAME`.
    #[ortho_config()]
    pub event_name: Option<String>,

    /// Path of the event payload file. Falls back to `GITHUB_EVENT_PATH`.
    #[ortho_config()]
    pub event_path: Option<String>,

    /// `owner/name` of the base repository, overriding the payload.
    ///
    /// Falls back to `GITHUB_REPOSITORY`.
    #[ortho_config()]
    pub repository: Option<String>,

    /// File receiving step outputs. Falls back to `GITHUB_OUTPUT`; outputs
    /// go to stdout when neither is set.
    #[ortho_config()]
    pub output_path: Option<String>,

    /// Delay between build status polls, in seconds.
    #[ortho_config()]
    pub poll_interval_seconds: u64,

    /// Upper bound on build status polls. Unset or zero waits indefinitely.
    #[ortho_config()]
    pub max_poll_attempts: Option<u32>,

    /// Timeout applied to every HTTP request, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Emits logs as JSON lines.
    ///
    /// `ortho_config` does not load booleans from the environment, so this
    /// is set through the CLI (`--json-logs`) or the configuration file.
    #[ortho_config()]
    pub json_logs: bool,
}

impl Default for ReviewAppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            heroku_api_token: None,
            heroku_pipeline_id: None,
            heroku_api_url: DEFAULT_HEROKU_API_URL.to_owned(),
            github_api_url: None,
            event_name: None,
            event_path: None,
            repository: None,
            output_path: None,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL.as_secs(),
            max_poll_attempts: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            json_logs: false,
        }
    }
}

impl ReviewAppConfig {
    /// Resolves the GitHub token, falling back to `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] when no source provides a
    /// non-blank token.
    pub fn resolve_github_token(&self) -> Result<ApiToken, ReviewAppError> {
        let token = configured_or_env(self.github_token.as_deref(), "GITHUB_TOKEN")
            .ok_or(ReviewAppError::MissingInput {
                name: "github_token",
            })?;
        ApiToken::new(token, "github_token")
    }

    /// Returns the Heroku token.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] when the token is unset or
    /// blank.
    pub fn require_heroku_api_token(&self) -> Result<ApiToken, ReviewAppError> {
        ApiToken::new(
            self.heroku_api_token.clone().unwrap_or_default(),
            "heroku_api_token",
        )
    }

    /// Returns the pipeline id.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] when the id is unset or blank.
    pub fn require_pipeline_id(&self) -> Result<PipelineId, ReviewAppError> {
        non_blank(self.heroku_pipeline_id.as_deref())
            .map(PipelineId::new)
            .ok_or(ReviewAppError::MissingInput {
                name: "heroku_pipeline_id",
            })
    }

    /// Heroku Platform API base URL.
    #[must_use]
    pub fn heroku_api_url(&self) -> &str {
        non_blank(Some(self.heroku_api_url.as_str())).unwrap_or(DEFAULT_HEROKU_API_URL)
    }

    /// GitHub REST API base URL, falling back to `GITHUB_API_URL`.
    #[must_use]
    pub fn resolve_github_api_url(&self) -> String {
        configured_or_env(self.github_api_url.as_deref(), "GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_owned())
    }

    /// Triggering event name, falling back to `GITHUB_EVENT_NAME`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] when neither source is set.
    pub fn resolve_event_name(&self) -> Result<String, ReviewAppError> {
        configured_or_env(self.event_name.as_deref(), "GITHUB_EVENT_NAME")
            .ok_or(ReviewAppError::MissingInput { name: "event_name" })
    }

    /// Event payload path, falling back to `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] when neither source is set.
    pub fn resolve_event_path(&self) -> Result<Utf8PathBuf, ReviewAppError> {
        configured_or_env(self.event_path.as_deref(), "GITHUB_EVENT_PATH")
            .map(Utf8PathBuf::from)
            .ok_or(ReviewAppError::MissingInput { name: "event_path" })
    }

    /// Output file path, falling back to `GITHUB_OUTPUT`.
    #[must_use]
    pub fn resolve_output_path(&self) -> Option<Utf8PathBuf> {
        configured_or_env(self.output_path.as_deref(), "GITHUB_OUTPUT").map(Utf8PathBuf::from)
    }

    /// Repository override, falling back to `GITHUB_REPOSITORY`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when the value is not an
    /// `owner/name` pair.
    pub fn resolve_repository(&self) -> Result<Option<RepositorySlug>, ReviewAppError> {
        configured_or_env(self.repository.as_deref(), "GITHUB_REPOSITORY")
            .map(|value| RepositorySlug::parse(&value))
            .transpose()
    }

    /// Poll delay and bound for the build waiter.
    #[must_use]
    pub fn build_waiter(&self) -> BuildWaiter {
        BuildWaiter::new(Duration::from_secs(self.poll_interval_seconds))
            .with_max_attempts(self.max_poll_attempts)
    }

    /// Timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Treats blank strings as unset; the runner exports omitted inputs as `""`.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn configured_or_env(configured: Option<&str>, variable: &str) -> Option<String> {
    non_blank(configured).map(str::to_owned).or_else(|| {
        env::var(variable)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.trim().to_owned())
    })
}

#[cfg(test)]
mod tests;
