//! Google Gemini `generateContent` client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::ModelClient;
use crate::config::ModelConfig;
use crate::{Result, TripAiError};

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!("Gemini finish reason: {}", reason);
        }
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client. The key must already be loaded into `config`.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TripAiError::config("Model API key is not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TripAI/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TripAiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Model API request failed: {}", e);
                if e.is_timeout() {
                    TripAiError::request("Model API request timed out")
                } else {
                    TripAiError::request(format!("Model API request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Model API returned {}: {}", status, error_text);
            return Err(TripAiError::request_status(
                format!(
                    "Model API error {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
                status.as_u16(),
            ));
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to read model API response: {}", e);
            TripAiError::request(format!("Failed to read model API response: {e}"))
        })?;

        let text = parsed
            .into_text()
            .ok_or_else(|| TripAiError::request("Model API returned no text"))?;

        let duration = start_time.elapsed();
        info!(
            "Model responded with {} chars in {:.3}s",
            text.len(),
            duration.as_secs_f64()
        );
        if duration.as_secs() > 30 {
            warn!("Slow model response: {:.3}s", duration.as_secs_f64());
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
