//! Builders for reconciliation unit tests.

use serde_json::json;

use crate::event::PullRequestEvent;
use crate::github::{ArchiveReference, MockArchiveGateway};
use crate::heroku::{
    AppDetails, AppId, AppRef, Build, BuildStatus, ReviewApp, ReviewAppId, ReviewAppStatus,
};

pub(crate) const ARCHIVE_URL: &str = "https://codeload.example.invalid/octo/shop/tar.gz/abc123";

pub(crate) fn review_app(
    id: &str,
    pr_number: u64,
    status: ReviewAppStatus,
    app_id: Option<&str>,
) -> ReviewApp {
    ReviewApp {
        id: ReviewAppId::new(id),
        pr_number: Some(pr_number),
        status,
        app: app_id.map(|value| AppRef {
            id: AppId::new(value),
            name: None,
        }),
        error_status: None,
        message: None,
    }
}

pub(crate) fn build(version: &str, status: BuildStatus) -> Build {
    Build {
        id: format!("build-{version}"),
        app_id: Some(AppId::new("app-7")),
        source_version: Some(version.to_owned()),
        status,
        error_status: None,
    }
}

pub(crate) fn app_details() -> AppDetails {
    AppDetails {
        id: AppId::new("app-7"),
        name: "shop-pr-7".to_owned(),
        web_url: Some("https://shop-pr-7.herokuapp.com/".to_owned()),
    }
}

pub(crate) fn event(action: &str, pr_number: u64, fork: bool) -> PullRequestEvent {
    let payload = json!({
        "action": action,
        "pull_request": {
            "number": pr_number,
            "head": {
                "ref": "feature",
                "sha": "abc123",
                "repo": {
                    "id": 4242,
                    "fork": fork,
                    "html_url": "https://github.com/octo/shop"
                }
            }
        },
        "repository": { "name": "shop", "owner": { "login": "octo" } }
    });
    PullRequestEvent::from_payload("pull_request", &payload.to_string())
        .expect("fixture event should parse")
}

/// Archive gateway expecting `times` lookups of the fixture commit.
pub(crate) fn archives(times: usize) -> MockArchiveGateway {
    let mut archives = MockArchiveGateway::new();
    archives
        .expect_tarball()
        .withf(|repository, reference| {
            repository.to_string() == "octo/shop" && reference.as_str() == "abc123"
        })
        .times(times)
        .returning(|_, reference| {
            Ok(ArchiveReference {
                url: ARCHIVE_URL.to_owned(),
                version: reference.clone(),
            })
        });
    archives
}
