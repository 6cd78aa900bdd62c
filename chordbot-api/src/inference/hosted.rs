//! Hosted text-generation client
//!
//! Speaks the Hugging Face Inference API shape:
//! `POST {base_url}/models/{model}` with `{"inputs", "parameters"}` and a
//! `[{"generated_text": ...}]` response. No client-side timeout is set, so a
//! stalled service stalls the request that is waiting on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_prompt, InferenceClient, InferenceError, MAX_NEW_TOKENS};

const USER_AGENT: &str = concat!("chordbot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

/// Services return either a list of generations or a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generated>),
    One(Generated),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Inference client backed by a hosted model endpoint
pub struct HostedInferenceClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
}

impl HostedInferenceClient {
    /// Create a client for `model` served under `base_url`
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: Option<String>,
    ) -> Result<Self, InferenceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
            model: model.to_string(),
            api_token,
        })
    }

    /// Create a client from resolved service configuration
    pub fn from_config(config: &chordbot_common::ServiceConfig) -> Result<Self, InferenceError> {
        Self::new(
            &config.inference_base_url,
            &config.inference_model,
            config.inference_token.clone(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
            },
        };

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(model = %self.model, url = %self.endpoint, "Querying inference API");

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(InferenceError::Api(status.as_u16(), message));
        }

        let parsed: GenerationResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Parse(e.to_string()))?;

        match parsed {
            GenerationResponse::One(generated) => Ok(generated.generated_text),
            GenerationResponse::Many(list) => list
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or(InferenceError::EmptyCompletion),
        }
    }
}

#[async_trait]
impl InferenceClient for HostedInferenceClient {
    async fn complete(&self, notes: &[String]) -> Result<String, InferenceError> {
        let prompt = build_prompt(notes);
        let text = self.generate(&prompt).await?;

        tracing::info!(
            model = %self.model,
            notes = notes.len(),
            completion_len = text.len(),
            "Inference completion received"
        );

        Ok(text)
    }
}
