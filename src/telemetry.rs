//! Review telemetry events and sinks.
//!
//! Events capture review milestones for local debugging. Nothing is
//! transmitted; the stderr sink writes JSON lines for the user to inspect.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by pendant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A new pending review was begun on a pull request.
    ReviewStarted {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
        /// Pull request number.
        number: u64,
        /// Identifier of the pending review.
        review_id: u64,
    },
    /// A pending review was submitted.
    ReviewSubmitted {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
        /// Pull request number.
        number: u64,
        /// Identifier of the submitted review.
        review_id: u64,
        /// Submission event, e.g. `approve`.
        event: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sinks for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};
    use crate::observable::lock;

    /// Keeps every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Removes and returns the events recorded so far.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            lock(&self.events).drain(..).collect()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            lock(&self.events).push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TelemetryEvent;
    use super::TelemetrySink;
    use super::test_support::RecordingTelemetrySink;

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingTelemetrySink::default();
        sink.record(TelemetryEvent::ReviewStarted {
            owner: "octo".to_owned(),
            repo: "repo".to_owned(),
            number: 3,
            review_id: 9,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::ReviewStarted {
                owner: "octo".to_owned(),
                repo: "repo".to_owned(),
                number: 3,
                review_id: 9,
            }]
        );
        assert!(sink.take().is_empty());
    }

    #[test]
    fn events_serialise_with_snake_case_tags() {
        let event = TelemetryEvent::ReviewSubmitted {
            owner: "octo".to_owned(),
            repo: "repo".to_owned(),
            number: 3,
            review_id: 9,
            event: "approve".to_owned(),
        };

        let json = serde_json::to_value(&event).expect("event should serialise");

        let field = |name: &str| json.get(name).and_then(serde_json::Value::as_str);
        assert_eq!(field("type"), Some("review_submitted"));
        assert_eq!(field("event"), Some("approve"));
    }
}
