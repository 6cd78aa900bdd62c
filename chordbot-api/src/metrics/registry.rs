//! Prometheus-backed metrics sink
//!
//! Every series carries a `service` label set once at construction, so one
//! registry can be scraped for several deployments of the same binary.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

use super::{MetricsSink, RequestRecord, RequestStatus};

/// Bucket bounds for the note-count distribution; larger counts overflow to +Inf
pub const NOTES_PER_REQUEST_BUCKETS: &[f64] = &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 12.0, 16.0];

/// Chord-Bot request metrics
pub struct PrometheusMetrics {
    registry: Registry,
    service: String,
    requests_total: IntCounterVec,
    request_latency_seconds: HistogramVec,
    notes_per_request: HistogramVec,
    invalid_requests_total: IntCounterVec,
    chord_predictions_total: IntCounterVec,
    active_requests: IntGaugeVec,
}

impl PrometheusMetrics {
    /// Create and register all metrics under a fresh registry
    pub fn new(service: impl Into<String>) -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("chordbot_requests_total", "Total number of Chord-Bot requests"),
            &["service", "endpoint", "status"],
        )?;

        let request_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "chordbot_request_latency_seconds",
                "Latency of Chord-Bot requests in seconds",
            )
            .buckets(prometheus::DEFAULT_BUCKETS.to_vec()),
            &["service", "endpoint"],
        )?;

        let notes_per_request = HistogramVec::new(
            HistogramOpts::new(
                "chordbot_notes_per_request",
                "Number of note tokens received per request",
            )
            .buckets(NOTES_PER_REQUEST_BUCKETS.to_vec()),
            &["service", "endpoint"],
        )?;

        let invalid_requests_total = IntCounterVec::new(
            Opts::new(
                "chordbot_invalid_requests_total",
                "Number of Chord-Bot requests with invalid input",
            ),
            &["service", "endpoint"],
        )?;

        let chord_predictions_total = IntCounterVec::new(
            Opts::new(
                "chordbot_chord_predictions_total",
                "Number of times each chord label is predicted",
            ),
            &["service", "endpoint", "chord_label"],
        )?;

        let active_requests = IntGaugeVec::new(
            Opts::new(
                "chordbot_active_requests",
                "Number of active Chord-Bot requests being processed",
            ),
            &["service", "endpoint"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_latency_seconds.clone()))?;
        registry.register(Box::new(notes_per_request.clone()))?;
        registry.register(Box::new(invalid_requests_total.clone()))?;
        registry.register(Box::new(chord_predictions_total.clone()))?;
        registry.register(Box::new(active_requests.clone()))?;

        Ok(Self {
            registry,
            service: service.into(),
            requests_total,
            request_latency_seconds,
            notes_per_request,
            invalid_requests_total,
            chord_predictions_total,
            active_requests,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Export metrics in Prometheus text format
    pub fn export_text(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn requests_total(&self, endpoint: &str, status: RequestStatus) -> u64 {
        self.requests_total
            .with_label_values(&[self.service.as_str(), endpoint, status.as_str()])
            .get()
    }

    pub fn latency_observations(&self, endpoint: &str) -> u64 {
        self.request_latency_seconds
            .with_label_values(&[self.service.as_str(), endpoint])
            .get_sample_count()
    }

    pub fn note_count_observations(&self, endpoint: &str) -> u64 {
        self.notes_per_request
            .with_label_values(&[self.service.as_str(), endpoint])
            .get_sample_count()
    }

    pub fn invalid_requests(&self, endpoint: &str) -> u64 {
        self.invalid_requests_total
            .with_label_values(&[self.service.as_str(), endpoint])
            .get()
    }

    pub fn chord_predictions(&self, endpoint: &str, label: &str) -> u64 {
        self.chord_predictions_total
            .with_label_values(&[self.service.as_str(), endpoint, label])
            .get()
    }

    pub fn active_requests(&self, endpoint: &str) -> i64 {
        self.active_requests
            .with_label_values(&[self.service.as_str(), endpoint])
            .get()
    }
}

impl MetricsSink for PrometheusMetrics {
    fn request_started(&self, endpoint: &str) {
        self.active_requests
            .with_label_values(&[self.service.as_str(), endpoint])
            .inc();
    }

    fn request_finished(&self, endpoint: &str) {
        self.active_requests
            .with_label_values(&[self.service.as_str(), endpoint])
            .dec();
    }

    fn record(&self, record: &RequestRecord<'_>) {
        let service = self.service.as_str();

        self.requests_total
            .with_label_values(&[service, record.endpoint, record.status.as_str()])
            .inc();

        self.request_latency_seconds
            .with_label_values(&[service, record.endpoint])
            .observe(record.elapsed.as_secs_f64());

        if let Some(count) = record.note_tokens {
            self.notes_per_request
                .with_label_values(&[service, record.endpoint])
                .observe(count as f64);
        }

        if record.status == RequestStatus::InvalidInput {
            self.invalid_requests_total
                .with_label_values(&[service, record.endpoint])
                .inc();
        }

        if record.status == RequestStatus::Success {
            if let Some(label) = record.chord_label {
                self.chord_predictions_total
                    .with_label_values(&[service, record.endpoint, label])
                    .inc();
            }
        }
    }
}
