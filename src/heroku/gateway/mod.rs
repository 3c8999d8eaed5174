//! Gateways for managing review apps through the Heroku Platform API.
//!
//! The trait-based design enables mocking in tests while the `reqwest`
//! implementation handles real HTTP requests.

mod client;
mod error_mapping;

pub use client::{DEFAULT_HEROKU_API_URL, HerokuGateway};

use async_trait::async_trait;

use crate::error::ReviewAppError;
use crate::heroku::models::{
    AppDetails, AppId, Build, NewReviewApp, PipelineId, ReviewApp, ReviewAppId, SourceBlob,
};

/// Review app and build operations on the remote platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewAppGateway: Send + Sync {
    /// List every review app in the pipeline.
    async fn list_review_apps(&self, pipeline: &PipelineId)
    -> Result<Vec<ReviewApp>, ReviewAppError>;

    /// Fetch details for a concrete app.
    async fn app(&self, app: &AppId) -> Result<AppDetails, ReviewAppError>;

    /// List the builds of an app.
    async fn app_builds(&self, app: &AppId) -> Result<Vec<Build>, ReviewAppError>;

    /// Create a review app.
    ///
    /// Implementations report an already existing review app as
    /// [`ReviewAppError::Conflict`].
    async fn create_review_app(&self, request: &NewReviewApp)
    -> Result<ReviewApp, ReviewAppError>;

    /// Start a new build of an existing app.
    async fn create_build(&self, app: &AppId, source: &SourceBlob)
    -> Result<Build, ReviewAppError>;

    /// Delete a review app together with its app.
    async fn delete_review_app(&self, review_app: &ReviewAppId) -> Result<(), ReviewAppError>;
}
