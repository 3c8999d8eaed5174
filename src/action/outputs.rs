//! Step outputs.

use std::io::{self, Stdout, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;

use crate::error::ReviewAppError;
use crate::heroku::AppDetails;

const DELIMITER_PREFIX: &str = "ghadelimiter";

/// Destination for step outputs.
pub trait OutputSink {
    /// Publishes one named output.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Io`] when the output cannot be written.
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReviewAppError>;
}

/// Publishes the deployed app's `app_id`, `app_web_url` and `app_name`.
///
/// # Errors
///
/// Propagates the first sink failure.
pub fn write_app_outputs<S>(sink: &mut S, details: &AppDetails) -> Result<(), ReviewAppError>
where
    S: OutputSink + ?Sized,
{
    sink.set_output("app_id", details.id.as_str())?;
    sink.set_output("app_web_url", details.web_url.as_deref().unwrap_or_default())?;
    sink.set_output("app_name", &details.name)
}

/// Appends outputs to the runner's `GITHUB_OUTPUT` file.
#[derive(Debug, Clone)]
pub struct GithubOutputFile {
    path: Utf8PathBuf,
}

impl GithubOutputFile {
    /// Targets the output file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }

    fn open(&self) -> Result<cap_std::fs_utf8::File, ReviewAppError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = self.path.file_name().ok_or_else(|| ReviewAppError::Io {
            message: format!("invalid output path '{}': no file name", self.path),
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            ReviewAppError::Io {
                message: format!("failed to open output directory '{parent}': {error}"),
            }
        })?;

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        dir.open_with(file_name, &options)
            .map_err(|error| ReviewAppError::Io {
                message: format!("failed to open output file '{}': {error}", self.path),
            })
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReviewAppError> {
        let mut file = self.open()?;
        file.write_all(output_record(name, value).as_bytes())
            .map_err(|error| ReviewAppError::Io {
                message: format!("failed to write output '{name}' to '{}': {error}", self.path),
            })
    }
}

/// Writes outputs as `name=value` lines to any writer, stdout by default.
#[derive(Debug)]
pub struct WriterOutputs<W> {
    writer: W,
}

impl WriterOutputs<Stdout> {
    /// Writes outputs to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterOutputs<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterOutputs<W> {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReviewAppError> {
        self.writer
            .write_all(output_record(name, value).as_bytes())
            .map_err(|error| ReviewAppError::Io {
                message: format!("failed to write output '{name}': {error}"),
            })
    }
}

/// Formats one output record, using a heredoc for multi-line values.
fn output_record(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }

    let delimiter = heredoc_delimiter(value);
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Picks a delimiter that does not occur in `value`.
fn heredoc_delimiter(value: &str) -> String {
    let mut attempt = 0_u32;
    loop {
        let candidate = format!("{DELIMITER_PREFIX}_{attempt}");
        if !value.contains(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}
