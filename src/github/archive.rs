//! `reqwest` implementation of the archive gateway.

use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, LOCATION, USER_AGENT};
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::event::{CommitSha, RepositorySlug};

use super::error_mapping::{extract_github_message, map_http_error};
use super::{ArchiveGateway, ArchiveReference};

/// Public GitHub REST API endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitHub gateway resolving tarball download links.
///
/// Redirects are not followed: the download link is the `Location` of the
/// API's redirect response.
#[derive(Debug, Clone)]
pub struct GitHubArchiveGateway {
    client: Client,
    api_base: Url,
    token: ApiToken,
}

impl GitHubArchiveGateway {
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
            .redirect(Policy::none())
            .build()
            .map_err(|error| ReviewAppError::Configuration {
                message: format!("failed to configure GitHub HTTP client: {error}"),
            })?;

        let mut parsed = Url::parse(api_base).map_err(|error| ReviewAppError::Configuration {
            message: format!("GitHub API URL is invalid: {error}"),
        })?;
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        Ok(Self {
            client,
            api_base: parsed,
            token: token.clone(),
        })
    }

    fn tarball_endpoint(
        &self,
        repository: &RepositorySlug,
        reference: &CommitSha,
    ) -> Result<Url, ReviewAppError> {
        let path = format!(
            "repos/{owner}/{name}/tarball/{reference}",
            owner = repository.owner(),
            name = repository.name()
        );
        self.api_base
            .join(&path)
            .map_err(|error| ReviewAppError::Configuration {
                message: format!("invalid GitHub endpoint '{path}': {error}"),
            })
    }
}

#[async_trait]
impl ArchiveGateway for GitHubArchiveGateway {
    async fn tarball(
        &self,
        repository: &RepositorySlug,
        reference: &CommitSha,
    ) -> Result<ArchiveReference, ReviewAppError> {
        let endpoint = self.tarball_endpoint(repository, reference)?;
        tracing::debug!(repository = %repository, reference = %reference, "fetching archive");

        let response = self
            .client
            .get(endpoint.clone())
            .bearer_auth(self.token.value())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|error| ReviewAppError::Network {
                message: format!("download tarball failed: {error}"),
            })?;

        let status = response.status();
        let url = if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| ReviewAppError::Api {
                    message: format!("download tarball returned {status} without a location"),
                })?;
            endpoint
                .join(location)
                .map_err(|error| ReviewAppError::Api {
                    message: format!("download tarball returned an invalid location: {error}"),
                })?
                .to_string()
        } else if status.is_success() {
            // Served inline: the endpoint itself is the download link.
            endpoint.to_string()
        } else {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(
                "download tarball",
                status,
                extract_github_message(&body),
            ));
        };

        tracing::info!("fetched archive OK: {url}");
        Ok(ArchiveReference {
            url,
            version: reference.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{ArchiveGateway, GitHubArchiveGateway};
    use crate::credentials::ApiToken;
    use crate::error::ReviewAppError;
    use crate::event::{CommitSha, RepositorySlug};

    fn gateway_for(server: &MockServer) -> GitHubArchiveGateway {
        let token = ApiToken::new("gh-token", "github_token").expect("token should be valid");
        GitHubArchiveGateway::for_token(&token, &server.uri(), Duration::from_secs(5))
            .expect("gateway should build")
    }

    fn target() -> (RepositorySlug, CommitSha) {
        (
            RepositorySlug::parse("octo/shop").expect("slug should parse"),
            CommitSha::new("abc123").expect("sha should be valid"),
        )
    }

    #[tokio::test]
    async fn returns_redirect_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/shop/tarball/abc123"))
            .and(header("authorization", "Bearer gh-token"))
            .respond_with(ResponseTemplate::new(302).insert_header(
                "Location",
                "https://codeload.github.com/octo/shop/legacy.tar.gz/abc123?token=t",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let (repository, sha) = target();
        let archive = gateway_for(&server)
            .tarball(&repository, &sha)
            .await
            .expect("archive should resolve");

        assert_eq!(
            archive.url, "https://codeload.github.com/octo/shop/legacy.tar.gz/abc123?token=t",
            "url mismatch"
        );
        assert_eq!(archive.version, sha, "version mismatch");
    }

    #[tokio::test]
    async fn missing_repository_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/shop/tarball/abc123"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
            )
            .mount(&server)
            .await;

        let (repository, sha) = target();
        let result = gateway_for(&server).tarball(&repository, &sha).await;

        assert_eq!(
            result,
            Err(ReviewAppError::Api {
                message: "download tarball failed with status 404 Not Found: Not Found"
                    .to_owned()
            })
        );
    }

    #[tokio::test]
    async fn bad_credentials_are_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/shop/tarball/abc123"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
            )
            .mount(&server)
            .await;

        let (repository, sha) = target();
        let result = gateway_for(&server).tarball(&repository, &sha).await;

        assert!(
            matches!(result, Err(ReviewAppError::Authentication { .. })),
            "expected Authentication, got {result:?}"
        );
    }
}
