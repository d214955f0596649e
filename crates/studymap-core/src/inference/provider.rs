//! Inference provider - Ollama-compatible text completion
//!
//! The provider trait is the substitution seam: production code talks to a
//! local Ollama endpoint, tests plug in a scripted stub.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inference error type
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Connection-level failure (refused, DNS, broken transport)
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The bounded timeout elapsed
    #[error("Request timed out")]
    Timeout,
    /// Endpoint responded but the model is not serving
    #[error("Model unavailable")]
    ModelUnavailable,
    /// Body was not the documented response shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// Retry budget spent without a usable response
    #[error("Retries exhausted after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: String },
}

/// Capability interface: produce free-form completion text for a prompt.
///
/// Implementations must not touch storage; side effects are limited to the
/// outbound call itself.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Inference endpoint configuration, passed into clients at construction.
/// Never ambient global state.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base address of the Ollama-compatible endpoint
    pub base_url: String,
    /// Model identifier to request
    pub model: String,
    /// Per-request wall-clock bound
    pub timeout: Duration,
    /// Extra attempts after the first, per logical request
    pub max_retries: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }
}

impl InferenceConfig {
    /// Defaults overridden from `OLLAMA_BASE_URL` / `OLLAMA_MODEL`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("OLLAMA_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        config
    }
}

// ============================================================================
// OLLAMA CLIENT
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for Ollama's `/api/generate` endpoint
pub struct OllamaClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl OllamaClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: 0.3 },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.config.base_url))
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout
                } else {
                    InferenceError::RequestFailed(e.to_string())
                }
            })?;

        match response.status() {
            reqwest::StatusCode::OK => {}
            reqwest::StatusCode::SERVICE_UNAVAILABLE => {
                return Err(InferenceError::ModelUnavailable)
            }
            status => return Err(InferenceError::RequestFailed(status.to_string())),
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout
            } else {
                InferenceError::MalformedResponse(e.to_string())
            }
        })?;

        Ok(body.response)
    }
}
