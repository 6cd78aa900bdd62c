//! Request instrumentation
//!
//! The resolver reports through the [`MetricsSink`] capability it is
//! constructed with. Every resolution attempt produces exactly one
//! [`RequestRecord`] and one start/finish pair on the in-flight gauge.

use std::time::{Duration, Instant};

pub mod exporter;
pub mod registry;

pub use self::exporter::{init_metrics, metrics_routes};
pub use self::registry::PrometheusMetrics;

/// Outcome class used as the `status` metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Success,
    InvalidInput,
    Error,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Success => "success",
            RequestStatus::InvalidInput => "invalid_input",
            RequestStatus::Error => "error",
        }
    }
}

/// One finished resolution attempt
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord<'a> {
    pub endpoint: &'a str,
    /// Number of normalized note tokens, when input got that far
    pub note_tokens: Option<usize>,
    /// Chord label reported to the caller, if any
    pub chord_label: Option<&'a str>,
    pub status: RequestStatus,
    pub elapsed: Duration,
}

/// Write-only sink for request metrics
///
/// Implementations must tolerate concurrent calls from many requests.
pub trait MetricsSink: Send + Sync {
    /// Increment the in-flight gauge for `endpoint`
    fn request_started(&self, endpoint: &str);

    /// Decrement the in-flight gauge for `endpoint`
    fn request_finished(&self, endpoint: &str);

    /// Record a completed attempt
    fn record(&self, record: &RequestRecord<'_>);
}

/// Holds one in-flight slot and owns the attempt's record
///
/// [`RequestGuard::finish`] records the known outcome. If the guard is
/// dropped first (the request future was cancelled while awaiting the
/// fallback, or a panic unwound through it) the attempt is recorded as
/// `error`. The in-flight slot is released after the record in both cases.
pub struct RequestGuard<'a> {
    sink: &'a dyn MetricsSink,
    endpoint: &'a str,
    started: Instant,
    note_tokens: Option<usize>,
    recorded: bool,
}

impl<'a> RequestGuard<'a> {
    pub fn start(sink: &'a dyn MetricsSink, endpoint: &'a str) -> Self {
        sink.request_started(endpoint);
        Self {
            sink,
            endpoint,
            started: Instant::now(),
            note_tokens: None,
            recorded: false,
        }
    }

    /// Note how many tokens the input produced
    pub fn set_note_tokens(&mut self, count: usize) {
        self.note_tokens = Some(count);
    }

    /// Record the outcome and release the in-flight slot
    pub fn finish(mut self, chord_label: Option<&str>, status: RequestStatus) {
        self.emit(chord_label, status);
    }

    fn emit(&mut self, chord_label: Option<&str>, status: RequestStatus) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        self.sink.record(&RequestRecord {
            endpoint: self.endpoint,
            note_tokens: self.note_tokens,
            chord_label,
            status,
            elapsed: self.started.elapsed(),
        });
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.emit(None, RequestStatus::Error);
        self.sink.request_finished(self.endpoint);
    }
}
