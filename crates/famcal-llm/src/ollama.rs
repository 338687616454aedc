//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//! Email bodies never leave the machine, which is the reason a local model is
//! used for the fallback extraction path.
//!
//! # Features
//!
//! - Blocking HTTP communication with the `/api/generate` endpoint
//! - Deterministic sampling (temperature 0) and bounded output length
//! - JSON output mode
//! - Hard timeout so a stuck backend cannot hang a polling cycle
//!
//! # Examples
//!
//! ```no_run
//! use famcal_llm::OllamaProvider;
//! use famcal_domain::traits::LlmProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "qwen2.5:0.5b").unwrap();
//! let reply = provider.generate_json("Extract the event ...");
//! ```

use crate::LlmError;
use famcal_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model: small enough to run on a household machine
pub const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

/// Default timeout for LLM requests (300 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts (a single attempt; the timeout is already long)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Sampling configuration sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature; 0.0 makes output deterministic
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Maximum tokens to generate
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.9,
            top_k: 40,
            num_predict: 150,
        }
    }
}

/// Ollama API provider for local LLM inference
///
/// This provider communicates with a local Ollama instance to generate text.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
    options: GenerationOptions,
    timeout_secs: u64,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerationOptions,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "qwen2.5:0.5b", "llama3")
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new Ollama provider with an explicit timeout ceiling
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            options: GenerationOptions::default(),
            timeout_secs,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the sampling options
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum number of attempts (at least one is always made)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Model name this provider talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one generate request, retrying transport and server errors
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running or times out
    /// - Model is not available
    /// - The server answers with a non-success status
    /// - Response format is invalid
    fn request(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: self.options,
        };

        debug!("Sending {} char prompt to {} ({})", prompt.len(), url, self.model);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .map(|r| r.response)
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            });
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let error_text = response
                            .text()
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Timeout(self.timeout_secs));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama attempt {} failed, retrying in {:?}", attempts, delay);
                std::thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate_json(&self, prompt: &str) -> Result<String, Self::Error> {
        self.request(prompt)
    }
}
