//! Gemini Client Module
//!
//! Issues single-prompt completions against the Gemini `generateContent` REST
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AssistError, Result};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// == Generation Parameters ==
/// Bounded-length, moderate-temperature generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

// == Text Generator Trait ==
/// A remote service turning a prompt into completion text.
///
/// Any error (network, HTTP status, malformed body) is an
/// [`AssistError::ExternalService`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Whether the generator can reach a remote service at all.
    fn is_configured(&self) -> bool {
        true
    }
}

// == Gemini Client ==
#[derive(Debug, Clone)]
pub struct GeminiClient {
    /// Credential; None makes every call fail without touching the network
    api_key: Option<String>,
    model_id: String,
    base_url: String,
    params: GenerationParams,
    client: Client,
}

impl GeminiClient {
    /// Creates a client for `model_id` against `base_url`.
    pub fn new(
        api_key: Option<String>,
        model_id: impl Into<String>,
        base_url: impl Into<String>,
        params: GenerationParams,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model_id: model_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            params,
            client,
        })
    }

    /// Creates a client from the service configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            GenerationParams {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
            Duration::from_secs(config.request_timeout),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_id)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AssistError::ExternalService("GEMINI_API_KEY is not configured".to_string())
        })?;

        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            "Sending prompt to Gemini"
        );

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.params.temperature,
                max_output_tokens: self.params.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, "Failed to send request to Gemini API");
                AssistError::ExternalService(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Gemini API returned error status");
            return Err(AssistError::ExternalService(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "Failed to parse Gemini API response");
            AssistError::ExternalService(format!("Failed to parse response: {}", e))
        })?;

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                error!("No candidates in Gemini API response");
                AssistError::ExternalService("No content in API response".to_string())
            })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// == Wire Types ==
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}
