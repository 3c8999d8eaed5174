//! Data models for Heroku review apps and builds.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier returned by or sent to Heroku.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier.
            #[must_use]
            pub const fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Pipeline under which review apps are created.
    PipelineId
);
string_id!(
    /// Review app identifier, distinct from the app it deploys to.
    ReviewAppId
);
string_id!(
    /// Identifier of the concrete Heroku app behind a review app.
    AppId
);

/// Lifecycle status of a review app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAppStatus {
    /// Queued for creation.
    Pending,
    /// App is being created.
    Creating,
    /// App exists.
    Created,
    /// Creation finished successfully.
    Succeeded,
    /// Teardown in progress.
    Deleting,
    /// Torn down.
    Deleted,
    /// Creation failed.
    Errored,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ReviewAppStatus {
    /// Returns the status as Heroku reports it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Creating => "creating",
            Self::Created => "created",
            Self::Succeeded => "succeeded",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Errored => "errored",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReviewAppStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// Build still running.
    Pending,
    /// Build finished and was released.
    Succeeded,
    /// Build failed.
    Failed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    /// Returns the status as Heroku reports it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// App attached to a review app once Heroku has provisioned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    /// App identifier.
    pub id: AppId,
    /// App name when Heroku includes it.
    pub name: Option<String>,
}

/// A review app belonging to a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewApp {
    /// Review app identifier.
    pub id: ReviewAppId,
    /// Pull request the review app was created for.
    pub pr_number: Option<u64>,
    /// Lifecycle status.
    pub status: ReviewAppStatus,
    /// Concrete app, absent until Heroku has created it.
    pub app: Option<AppRef>,
    /// Machine readable failure reason.
    pub error_status: Option<String>,
    /// Human readable status message.
    pub message: Option<String>,
}

/// Details of a deployed app.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppDetails {
    /// App identifier.
    pub id: AppId,
    /// App name.
    pub name: String,
    /// Public web URL.
    pub web_url: Option<String>,
}

/// A build of an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    /// Build identifier.
    pub id: String,
    /// App the build belongs to.
    pub app_id: Option<AppId>,
    /// Commit sha the build was created from.
    pub source_version: Option<String>,
    /// Build status.
    pub status: BuildStatus,
    /// Failure detail, if any.
    pub error_status: Option<String>,
}

/// Downloadable snapshot of the repository used as build input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlob {
    /// Archive URL Heroku downloads the source from.
    pub url: String,
    /// Commit sha the archive was taken at.
    pub version: String,
}

/// Environment variables set on a new review app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewAppEnvironment {
    /// URL of the repository the pull request comes from.
    #[serde(rename = "GIT_REPO_URL")]
    pub git_repo_url: String,
}

/// Request body for creating a review app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReviewApp {
    /// Head branch of the pull request.
    pub branch: String,
    /// Pipeline the review app belongs to.
    pub pipeline: PipelineId,
    /// Source to build.
    pub source_blob: SourceBlob,
    /// Head repository id, only sent for pull requests from forks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_repo_id: Option<u64>,
    /// Pull request number.
    pub pr_number: u64,
    /// Config vars for the new app.
    pub environment: ReviewAppEnvironment,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct NewBuild<'a> {
    pub(super) source_blob: &'a SourceBlob,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReviewApp {
    pub(super) id: ReviewAppId,
    pub(super) pr_number: Option<u64>,
    pub(super) status: ReviewAppStatus,
    pub(super) app: Option<ApiAppRef>,
    pub(super) error_status: Option<String>,
    pub(super) message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiAppRef {
    pub(super) id: AppId,
    pub(super) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBuild {
    pub(super) id: String,
    pub(super) app: Option<ApiAppRef>,
    pub(super) source_blob: Option<ApiSourceBlob>,
    pub(super) status: BuildStatus,
    pub(super) error_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSourceBlob {
    pub(super) version: Option<String>,
}

impl From<ApiAppRef> for AppRef {
    fn from(value: ApiAppRef) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<ApiReviewApp> for ReviewApp {
    fn from(value: ApiReviewApp) -> Self {
        Self {
            id: value.id,
            pr_number: value.pr_number,
            status: value.status,
            app: value.app.map(AppRef::from),
            error_status: value.error_status,
            message: value.message,
        }
    }
}

impl From<ApiBuild> for Build {
    fn from(value: ApiBuild) -> Self {
        Self {
            id: value.id,
            app_id: value.app.map(|app| app.id),
            source_version: value.source_blob.and_then(|blob| blob.version),
            status: value.status,
            error_status: value.error_status,
        }
    }
}
