//! Tests for configuration layer precedence.

use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::{apply_layer, build_config_from_layers};
use crate::ReviewAppConfig;

#[rstest]
#[case::file_overrides_defaults(
    vec![
        ("defaults", json!({"heroku_pipeline_id": "default-pipe"})),
        ("file", json!({"heroku_pipeline_id": "file-pipe"}))
    ],
    "heroku_pipeline_id",
    "file-pipe",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![
        ("file", json!({"heroku_api_token": "file-token"})),
        ("environment", json!({"heroku_api_token": "env-token"}))
    ],
    "heroku_api_token",
    "env-token",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![
        ("environment", json!({"event_path": "/env/event.json"})),
        ("cli", json!({"event_path": "/cli/event.json"}))
    ],
    "event_path",
    "/cli/event.json",
    "CLI should override environment"
)]
fn test_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value);
    }

    let config =
        ReviewAppConfig::merge_from_layers(composer.layers()).expect("merge should succeed");

    let actual = match field {
        "heroku_pipeline_id" => config.heroku_pipeline_id.as_deref(),
        "heroku_api_token" => config.heroku_api_token.as_deref(),
        "event_path" => config.event_path.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{message}");
}

#[rstest]
fn defaults_apply_when_no_sources_provided() {
    let config = build_config_from_layers(&[]);

    assert!(config.heroku_pipeline_id.is_none(), "pipeline should be None");
    assert!(config.heroku_api_token.is_none(), "token should be None");
    assert_eq!(config.heroku_api_url, "https://api.heroku.com");
    assert_eq!(config.poll_interval_seconds, 5, "poll interval default");
    assert_eq!(config.request_timeout_seconds, 30, "timeout default");
    assert!(config.max_poll_attempts.is_none(), "polling is unbounded");
    assert!(!config.json_logs, "plain logs by default");
}

#[rstest]
fn numeric_settings_merge_from_file_and_cli() {
    let config = build_config_from_layers(&[
        (
            "file",
            json!({"poll_interval_seconds": 10, "max_poll_attempts": 60}),
        ),
        ("cli", json!({"max_poll_attempts": 90, "json_logs": true})),
    ]);

    assert_eq!(config.poll_interval_seconds, 10, "file interval applies");
    assert_eq!(config.max_poll_attempts, Some(90), "CLI bound wins");
    assert!(config.json_logs, "CLI flag enables JSON logs");
}

#[rstest]
fn full_precedence_chain() {
    let config = build_config_from_layers(&[
        (
            "defaults",
            json!({"heroku_pipeline_id": "default", "heroku_api_url": "https://default.invalid"}),
        ),
        (
            "file",
            json!({"heroku_pipeline_id": "file", "heroku_api_url": "https://file.invalid"}),
        ),
        ("environment", json!({"heroku_pipeline_id": "env"})),
        ("cli", json!({"heroku_pipeline_id": "cli"})),
    ]);

    assert_eq!(config.heroku_pipeline_id.as_deref(), Some("cli"));
    assert_eq!(
        config.heroku_api_url, "https://file.invalid",
        "file value survives when no higher layer sets it"
    );
}
