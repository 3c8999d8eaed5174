//! Heroku review app platform access.
//!
//! Review apps and builds are owned by Heroku; this module only reads them
//! and requests transitions through the Platform API.

pub mod gateway;
pub mod models;

pub use gateway::{DEFAULT_HEROKU_API_URL, HerokuGateway, ReviewAppGateway};
pub use models::{
    AppDetails, AppId, AppRef, Build, BuildStatus, NewReviewApp, PipelineId, ReviewApp,
    ReviewAppEnvironment, ReviewAppId, ReviewAppStatus, SourceBlob,
};

#[cfg(test)]
pub use gateway::MockReviewAppGateway;
