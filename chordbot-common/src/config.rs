//! Service configuration
//!
//! The binary resolves every option in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Compiled default (fallback)
//!
//! Cross-field checks run once, on the merged result. There is no
//! configuration file and nothing is persisted across restarts.

use crate::{Error, Result};

pub const DEFAULT_SERVICE_NAME: &str = "chord-bot-api";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_METRICS_PORT: u16 = 8000;
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "google/flan-t5-small";

/// Resolved configuration for one Chord-Bot process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Value of the `service` label on every metric
    pub service_name: String,
    /// Front-end bind host
    pub host: String,
    /// Front-end bind port
    pub port: u16,
    /// Port of the Prometheus exposition listener
    pub metrics_port: u16,
    /// Base URL of the hosted text-generation service
    pub inference_base_url: String,
    /// Model identifier appended to the inference URL
    pub inference_model: String,
    /// Bearer token for the inference service, if any
    pub inference_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            inference_base_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_model: DEFAULT_MODEL.to_string(),
            inference_token: None,
        }
    }
}

impl ServiceConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::Config("service name must not be blank".to_string()));
        }
        if self.inference_model.trim().is_empty() {
            return Err(Error::Config("inference model must not be blank".to_string()));
        }
        if self.port != 0 && self.port == self.metrics_port {
            return Err(Error::Config(format!(
                "front-end port and metrics port are both {}",
                self.port
            )));
        }
        Ok(())
    }

    /// Front-end bind address in `host:port` form
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
