//! Error types surfaced while reconciling review apps.

use thiserror::Error;

/// Errors surfaced while reading the triggering event or talking to Heroku
/// and GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewAppError {
    /// The workflow was triggered by something other than a pull request.
    #[error("unexpected GitHub event trigger: {event_name}")]
    EventMismatch {
        /// Event name reported by the runner.
        event_name: String,
    },

    /// The event payload could not be read or did not describe a pull
    /// request.
    #[error("invalid pull request event: {message}")]
    InvalidEvent {
        /// Description of the problem with the payload.
        message: String,
    },

    /// Heroku reported that the review app already exists.
    #[error("review app already exists: {message}")]
    Conflict {
        /// Message returned with the 409 response.
        message: String,
    },

    /// Heroku reported a conflict yet no review app could be located.
    #[error("previously got a conflict but no review app found for PR #{pr_number}")]
    ConflictUnresolved {
        /// Pull request the review app was requested for.
        pr_number: u64,
    },

    /// The review app is in a state reconciliation cannot continue from.
    #[error(
        "unexpected app status: \"{status}\" - {detail} (error status: {reason})",
        detail = .message.as_deref().unwrap_or("no message provided"),
        reason = .error_status.as_deref().unwrap_or("none")
    )]
    UnexpectedAppStatus {
        /// Review app status as reported by Heroku.
        status: String,
        /// Human readable message attached to the review app.
        message: Option<String>,
        /// Machine readable error status attached to the review app.
        error_status: Option<String>,
    },

    /// The review app disappeared while waiting for its build.
    #[error("review app for PR #{pr_number} is no longer available")]
    ReviewAppMissing {
        /// Pull request the review app belongs to.
        pr_number: u64,
    },

    /// None of the app's builds was created from the target commit.
    #[error("no existing build for app ID {app_id} matches version {version}")]
    NoMatchingBuild {
        /// Heroku app identifier.
        app_id: String,
        /// Commit sha the build was expected for.
        version: String,
    },

    /// The matching build ended in a failure or unrecognised state.
    #[error(
        "unexpected build status: \"{status}\": {reason}",
        reason = .error_status.as_deref().unwrap_or("no error provided")
    )]
    UnexpectedBuildStatus {
        /// Build status as reported by Heroku.
        status: String,
        /// Error detail attached to the build, if any.
        error_status: Option<String>,
    },

    /// The build did not finish within the configured number of polls.
    #[error("gave up waiting for the review app of PR #{pr_number} after {attempts} polls")]
    PollTimeout {
        /// Pull request the review app belongs to.
        pr_number: u64,
        /// Number of polls performed.
        attempts: u32,
    },

    /// The token was rejected by the remote platform.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error detail returned with the 401/403 response.
        message: String,
    },

    /// The remote platform returned a non-authentication API error.
    #[error("API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling a remote platform.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A required action input was not supplied.
    #[error("input required and not supplied: {name}")]
    MissingInput {
        /// Input name as declared by the action.
        name: &'static str,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
