//! GitHub Actions runner boundary.
//!
//! Reads the triggering event from the runner's event file, publishes step
//! outputs, and formats workflow commands. Everything here is synchronous
//! file and stream I/O; the reconciler never touches the runner directly.

mod outputs;

pub use outputs::{GithubOutputFile, OutputSink, WriterOutputs, write_app_outputs};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::ReviewAppError;
use crate::event::PullRequestEvent;

/// Reads and parses the event payload stored at `path`.
///
/// The event name is checked before the file is opened, so a workflow
/// triggered by the wrong event fails without touching the filesystem.
///
/// # Errors
///
/// Returns [`ReviewAppError::EventMismatch`] for events other than
/// `pull_request`, [`ReviewAppError::Io`] when the file cannot be read, and
/// [`ReviewAppError::InvalidEvent`] when the payload does not parse.
pub fn load_event(event_name: &str, path: &Utf8Path) -> Result<PullRequestEvent, ReviewAppError> {
    PullRequestEvent::ensure_supported(event_name)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| ReviewAppError::Io {
        message: format!("invalid event path '{path}': no file name"),
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        ReviewAppError::Io {
            message: format!("failed to open event directory '{parent}': {error}"),
        }
    })?;
    let payload = dir
        .read_to_string(file_name)
        .map_err(|error| ReviewAppError::Io {
            message: format!("failed to read event payload '{path}': {error}"),
        })?;

    PullRequestEvent::from_payload(event_name, &payload)
}

/// Formats an `::error::` workflow command.
#[must_use]
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Formats a `::notice::` workflow command.
#[must_use]
pub fn notice_command(message: &str) -> String {
    format!("::notice::{}", escape_data(message))
}

/// Escapes command data so multi-line messages stay one command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    //! Unit tests for event loading and workflow commands.

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    const PAYLOAD: &str = r#"{
        "action": "reopened",
        "pull_request": {
            "number": 12,
            "head": {
                "ref": "fix-typo",
                "sha": "fedcba",
                "repo": { "id": 99, "fork": false, "html_url": "https://github.com/octo/shop" }
            }
        },
        "repository": { "name": "shop", "owner": { "login": "octo" } }
    }"#;

    fn write_payload(dir: &TempDir, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("event.json"))
            .expect("temp path should be UTF-8");
        std::fs::write(&path, contents).expect("payload should be written");
        path
    }

    #[test]
    fn loads_pull_request_event_from_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = write_payload(&dir, PAYLOAD);

        let event = load_event("pull_request", &path).expect("event should load");

        assert_eq!(event.pr_number.get(), 12, "PR number mismatch");
        assert_eq!(event.branch, "fix-typo", "branch mismatch");
        assert_eq!(event.commit_sha.as_str(), "fedcba", "sha mismatch");
    }

    #[test]
    fn wrong_event_name_fails_before_reading() {
        let path = Utf8PathBuf::from("/definitely/not/here/event.json");

        let result = load_event("push", &path);

        assert_eq!(
            result,
            Err(ReviewAppError::EventMismatch {
                event_name: "push".to_owned()
            })
        );
    }

    #[test]
    fn missing_event_file_is_io_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json"))
            .expect("temp path should be UTF-8");

        let result = load_event("pull_request", &path);

        assert!(
            matches!(&result, Err(ReviewAppError::Io { message }) if message.contains("absent.json")),
            "expected Io error, got {result:?}"
        );
    }

    #[test]
    fn malformed_payload_is_invalid_event() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = write_payload(&dir, "{ not json");

        let result = load_event("pull_request", &path);

        assert!(
            matches!(result, Err(ReviewAppError::InvalidEvent { .. })),
            "expected InvalidEvent, got {result:?}"
        );
    }

    #[rstest]
    #[case::plain("build failed", "::error::build failed")]
    #[case::multiline("line one\nline two", "::error::line one%0Aline two")]
    #[case::percent("100% broken\r\n", "::error::100%25 broken%0D%0A")]
    fn formats_error_commands(#[case] message: &str, #[case] expected: &str) {
        assert_eq!(error_command(message), expected);
    }

    #[test]
    fn formats_notice_command() {
        assert_eq!(
            notice_command("skipping fork"),
            "::notice::skipping fork"
        );
    }
}
