//! Command-line arguments
//!
//! Every flag falls back to its environment variable, then to the compiled
//! default. Validation runs on the merged configuration only.

use clap::Parser;
use tracing::debug;

use chordbot_common::config::{
    DEFAULT_HOST, DEFAULT_INFERENCE_URL, DEFAULT_METRICS_PORT, DEFAULT_MODEL, DEFAULT_PORT,
    DEFAULT_SERVICE_NAME,
};
use chordbot_common::{Result, ServiceConfig};

/// Command-line arguments for chordbot-api
#[derive(Parser, Debug)]
#[command(name = "chordbot-api")]
#[command(about = "Chord identification microservice")]
#[command(version)]
pub struct Args {
    /// Front-end bind host
    #[arg(long, default_value = DEFAULT_HOST, env = "CHORDBOT_HOST")]
    pub host: String,

    /// Front-end port
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CHORDBOT_PORT")]
    pub port: u16,

    /// Prometheus metrics port
    #[arg(short, long, default_value_t = DEFAULT_METRICS_PORT, env = "METRICS_PORT")]
    pub metrics_port: u16,

    /// Service name used as the `service` metric label
    #[arg(long, default_value = DEFAULT_SERVICE_NAME, env = "SERVICE_NAME")]
    pub service_name: String,

    /// Base URL of the hosted text-generation service
    #[arg(long, default_value = DEFAULT_INFERENCE_URL, env = "CHORDBOT_INFERENCE_URL")]
    pub inference_url: String,

    /// Hosted model identifier
    #[arg(long, default_value = DEFAULT_MODEL, env = "CHORDBOT_MODEL")]
    pub model: String,

    /// Bearer token for the inference service
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub inference_token: Option<String>,
}

impl Args {
    /// Merge into a [`ServiceConfig`] and validate it
    ///
    /// A blank token counts as no token.
    pub fn into_config(self) -> Result<ServiceConfig> {
        let config = ServiceConfig {
            service_name: self.service_name.trim().to_string(),
            host: self.host,
            port: self.port,
            metrics_port: self.metrics_port,
            inference_base_url: self.inference_url,
            inference_model: self.model.trim().to_string(),
            inference_token: self
                .inference_token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        };

        config.validate()?;
        debug!(
            service = %config.service_name,
            port = config.port,
            metrics_port = config.metrics_port,
            model = %config.inference_model,
            "Resolved service configuration"
        );
        Ok(config)
    }
}
