//! Test doubles shared by unit and integration tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::action::OutputSink;
use crate::error::ReviewAppError;
use crate::reconcile::Sleeper;

/// Sleeper that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Delays requested so far.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

/// Output sink that keeps outputs in memory.
#[derive(Debug, Default)]
pub struct RecordingOutputs {
    outputs: Vec<(String, String)>,
}

impl RecordingOutputs {
    /// Outputs recorded so far, in order.
    #[must_use]
    pub fn outputs(&self) -> &[(String, String)] {
        &self.outputs
    }

    /// Value of the most recent output named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl OutputSink for RecordingOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReviewAppError> {
        self.outputs.push((name.to_owned(), value.to_owned()));
        Ok(())
    }
}
