//! Chord resolution
//!
//! Normalize → exact table lookup → model fallback on miss. Each attempt is
//! wrapped in instrumentation: one in-flight slot held for the duration and
//! one [`RequestRecord`](crate::metrics::RequestRecord) emitted once the
//! outcome is known, even if the request future is dropped.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::notes::{normalize, NoteSet};
use super::table::ChordTable;
use crate::inference::{InferenceClient, InferenceError};
use crate::metrics::{MetricsSink, RequestGuard, RequestStatus};

/// Endpoint label used for the inbound predict operation
pub const PREDICT_ENDPOINT: &str = "predict_chord";

/// Minimum number of note tokens accepted before lookup
pub const MIN_NOTES: usize = 2;

/// Why an input was rejected before lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputReason {
    /// Empty or whitespace-only input
    Empty,
    /// Fewer than [`MIN_NOTES`] tokens after normalization
    TooFewNotes,
}

impl InvalidInputReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidInputReason::Empty => "empty",
            InvalidInputReason::TooFewNotes => "too_few_notes",
        }
    }

    /// Guidance shown to the user
    pub fn guidance(&self) -> &'static str {
        match self {
            InvalidInputReason::Empty => "Please enter 2 or more notes.",
            InvalidInputReason::TooFewNotes => "Please enter at least 2 notes.",
        }
    }
}

impl fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one chord identification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Exact table hit
    Matched(String),
    /// No table entry; trimmed text returned by the model.
    ///
    /// Untrusted free text, not a member of any closed label set.
    Unrecognized(String),
    /// Rejected before lookup
    InvalidInput(InvalidInputReason),
    /// Fallback call failed
    Failed(InferenceError),
}

impl ResolutionOutcome {
    pub fn status(&self) -> RequestStatus {
        match self {
            ResolutionOutcome::Matched(_) | ResolutionOutcome::Unrecognized(_) => {
                RequestStatus::Success
            }
            ResolutionOutcome::InvalidInput(_) => RequestStatus::InvalidInput,
            ResolutionOutcome::Failed(_) => RequestStatus::Error,
        }
    }

    /// Chord label for successful outcomes
    pub fn label(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Matched(label) | ResolutionOutcome::Unrecognized(label) => {
                Some(label.as_str())
            }
            _ => None,
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionOutcome::Matched(_) => "matched",
            ResolutionOutcome::Unrecognized(_) => "unrecognized",
            ResolutionOutcome::InvalidInput(_) => "invalid_input",
            ResolutionOutcome::Failed(_) => "error",
        }
    }

    /// User-facing string for this outcome
    pub fn message(&self) -> String {
        match self {
            ResolutionOutcome::Matched(label) | ResolutionOutcome::Unrecognized(label) => {
                label.clone()
            }
            ResolutionOutcome::InvalidInput(reason) => reason.guidance().to_string(),
            ResolutionOutcome::Failed(err) => format!("Error calling inference API: {}", err),
        }
    }
}

/// Orchestrates lookup, fallback and instrumentation
pub struct ChordResolver {
    table: Arc<ChordTable>,
    inference: Arc<dyn InferenceClient>,
    metrics: Arc<dyn MetricsSink>,
}

impl ChordResolver {
    pub fn new(
        table: Arc<ChordTable>,
        inference: Arc<dyn InferenceClient>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            table,
            inference,
            metrics,
        }
    }

    /// Inbound operation: resolve and format for display
    pub async fn predict_chord(&self, raw_input: &str) -> String {
        self.resolve(raw_input).await.message()
    }

    /// Identify the chord named by `raw_input`
    ///
    /// Cancelling the returned future while the fallback is pending still
    /// records the attempt, with status `error`.
    pub async fn resolve(&self, raw_input: &str) -> ResolutionOutcome {
        let mut request = RequestGuard::start(self.metrics.as_ref(), PREDICT_ENDPOINT);
        let outcome = self.resolve_inner(raw_input, &mut request).await;
        request.finish(outcome.label(), outcome.status());
        outcome
    }

    async fn resolve_inner(
        &self,
        raw_input: &str,
        request: &mut RequestGuard<'_>,
    ) -> ResolutionOutcome {
        if raw_input.trim().is_empty() {
            debug!("Rejected empty chord query");
            return ResolutionOutcome::InvalidInput(InvalidInputReason::Empty);
        }

        let notes = normalize(raw_input);
        request.set_note_tokens(notes.len());
        if notes.len() < MIN_NOTES {
            debug!(tokens = notes.len(), "Rejected chord query with too few notes");
            return ResolutionOutcome::InvalidInput(InvalidInputReason::TooFewNotes);
        }

        let note_set = NoteSet::from_notes(&notes);
        if let Some(label) = self.table.lookup(&note_set) {
            debug!(notes = %note_set, chord = %label, "Chord table match");
            return ResolutionOutcome::Matched(label.to_string());
        }

        info!(notes = %note_set, "No table match, falling back to inference");
        match self.inference.complete(&notes).await {
            Ok(text) => ResolutionOutcome::Unrecognized(text.trim().to_string()),
            Err(e) => {
                warn!(notes = %note_set, error = %e, "Inference fallback failed");
                ResolutionOutcome::Failed(e)
            }
        }
    }
}
