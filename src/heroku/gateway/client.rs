//! `reqwest` implementation of the review app gateway.

use std::time::Duration;

use async_trait::async_trait;
use http::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::heroku::models::{
    ApiBuild, ApiReviewApp, AppDetails, AppId, Build, NewBuild, NewReviewApp, PipelineId,
    ReviewApp, ReviewAppId, SourceBlob,
};

use super::ReviewAppGateway;
use super::error_mapping::{extract_heroku_message, map_http_error, map_reqwest_error};

/// Production Heroku Platform API endpoint.
pub const DEFAULT_HEROKU_API_URL: &str = "https://api.heroku.com";

const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Heroku Platform API gateway.
#[derive(Debug, Clone)]
pub struct HerokuGateway {
    client: Client,
    api_base: Url,
    token: ApiToken,
}

impl HerokuGateway {
    /// Builds a gateway for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when the base URL cannot be
    /// parsed or the HTTP client cannot be constructed.
    pub fn for_token(
        token: &ApiToken,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, ReviewAppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ReviewAppError::Configuration {
                message: format!("failed to configure Heroku HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            api_base: parse_api_base(api_base)?,
            token: token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ReviewAppError> {
        self.api_base
            .join(path)
            .map_err(|error| ReviewAppError::Configuration {
                message: format!("invalid Heroku endpoint '{path}': {error}"),
            })
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.token.value())
            .header(ACCEPT, HEROKU_ACCEPT)
    }

    async fn execute(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ReviewAppError> {
        let response = self
            .authorised(builder)
            .send()
            .await
            .map_err(|error| map_reqwest_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(
            operation,
            status,
            extract_heroku_message(&body),
        ))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<T, ReviewAppError> {
        self.execute(operation, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|error| map_reqwest_error(operation, &error))
    }
}

/// Parses the API base, ensuring relative endpoint paths append to it.
fn parse_api_base(api_base: &str) -> Result<Url, ReviewAppError> {
    let mut url = Url::parse(api_base).map_err(|error| ReviewAppError::Configuration {
        message: format!("Heroku API URL is invalid: {error}"),
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl ReviewAppGateway for HerokuGateway {
    async fn list_review_apps(
        &self,
        pipeline: &PipelineId,
    ) -> Result<Vec<ReviewApp>, ReviewAppError> {
        let url = self.endpoint(&format!("pipelines/{pipeline}/review-apps"))?;
        tracing::debug!("listing review apps: {url}");
        let apps: Vec<ApiReviewApp> = self
            .fetch("list review apps", self.client.get(url))
            .await?;
        Ok(apps.into_iter().map(ReviewApp::from).collect())
    }

    async fn app(&self, app: &AppId) -> Result<AppDetails, ReviewAppError> {
        let url = self.endpoint(&format!("apps/{app}"))?;
        tracing::debug!("getting app details for app ID {app} ({url})");
        self.fetch("get app", self.client.get(url)).await
    }

    async fn app_builds(&self, app: &AppId) -> Result<Vec<Build>, ReviewAppError> {
        let url = self.endpoint(&format!("apps/{app}/builds"))?;
        tracing::debug!("fetching builds for app {app}");
        let builds: Vec<ApiBuild> = self.fetch("list builds", self.client.get(url)).await?;
        Ok(builds.into_iter().map(Build::from).collect())
    }

    async fn create_review_app(
        &self,
        request: &NewReviewApp,
    ) -> Result<ReviewApp, ReviewAppError> {
        let url = self.endpoint("review-apps")?;
        tracing::debug!(
            branch = %request.branch,
            pr_number = request.pr_number,
            version = %request.source_blob.version,
            "creating review app"
        );
        let app: ApiReviewApp = self
            .fetch("create review app", self.client.post(url).json(request))
            .await?;
        Ok(app.into())
    }

    async fn create_build(
        &self,
        app: &AppId,
        source: &SourceBlob,
    ) -> Result<Build, ReviewAppError> {
        let url = self.endpoint(&format!("apps/{app}/builds"))?;
        tracing::debug!(version = %source.version, "creating build for app {app}");
        let body = NewBuild {
            source_blob: source,
        };
        let build: ApiBuild = self
            .fetch("create build", self.client.post(url).json(&body))
            .await?;
        Ok(build.into())
    }

    async fn delete_review_app(&self, review_app: &ReviewAppId) -> Result<(), ReviewAppError> {
        let url = self.endpoint(&format!("review-apps/{review_app}"))?;
        tracing::debug!("deleting review app {review_app}");
        self.execute("delete review app", self.client.delete(url))
            .await
            .map(drop)
    }
}
