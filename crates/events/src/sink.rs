use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;

use crate::event::DecisionEvent;

/// Receiver for authorization decision events.
///
/// Sinks are best-effort: the gate emits to them and moves on, so an
/// implementation must swallow its own failures (logging them is fine).
pub trait EventSink: Send + Sync {
    fn record(&self, event: &DecisionEvent);
}

/// Discards every event. The default when no analytics are wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &DecisionEvent) {}
}

/// Appends one JSON object per line to a flat file.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, event: &DecisionEvent) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating event log dir {}", parent.display()))?;
        }

        let mut line = serde_json::to_string(event).context("serializing decision event")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening event log {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("appending to event log {}", self.path.display()))?;
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn record(&self, event: &DecisionEvent) {
        if let Err(err) = self.append(event) {
            warn!(error = %err, "failed to record decision event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use appgate_core::{AppKey, Subject};

    #[test]
    fn jsonl_sink_appends_one_line_per_event() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("events").join("decisions.jsonl");
        let sink = JsonlSink::new(&path);

        sink.record(&DecisionEvent::new(
            Some(Subject::new("alice")),
            AppKey::new("login_test"),
            true,
            "user_layer",
        ));
        sink.record(&DecisionEvent::new(
            None,
            AppKey::new("login_test"),
            false,
            "invalid_token",
        ));

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: DecisionEvent = serde_json::from_str(lines[0]).expect("parse line");
        assert_eq!(first.subject, Some(Subject::new("alice")));
        assert!(first.allowed);

        let second: DecisionEvent = serde_json::from_str(lines[1]).expect("parse line");
        assert_eq!(second.subject, None);
        assert_eq!(second.reason, "invalid_token");
    }

    #[test]
    fn null_sink_is_silent() {
        NullSink.record(&DecisionEvent::new(
            None,
            AppKey::new("anything"),
            false,
            "unlisted_app",
        ));
    }
}
