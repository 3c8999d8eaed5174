//! Keeps Heroku review apps in step with GitHub pull requests.
//!
//! Each run consumes one `pull_request` event. Closing a pull request
//! deletes its review app; any other action creates or rebuilds the review
//! app from the head commit's source archive and waits for the build to
//! finish before publishing the app's id, name, and URL as step outputs.

pub mod action;
pub mod config;
pub mod credentials;
pub mod error;
pub mod event;
pub mod github;
pub mod heroku;
pub mod reconcile;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ReviewAppConfig;
pub use credentials::ApiToken;
pub use error::ReviewAppError;
pub use event::{PullRequestAction, PullRequestEvent};
pub use github::{ArchiveGateway, GitHubArchiveGateway};
pub use heroku::{HerokuGateway, ReviewAppGateway};
pub use reconcile::{ReconcileOutcome, ReviewAppReconciler};
