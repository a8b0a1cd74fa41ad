//! Remote model provider.
//!
//! One blocking `generateContent` request per run. The provider's own
//! retry/quota behavior is out of scope: every failure mode (auth, quota,
//! transport, malformed response) surfaces as a single [`Error::Provider`]
//! kind with a status-specific message.

use crate::{
    config::Config,
    error::{Error, Result},
};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint prefix.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generation temperature; documentation output should be deterministic.
const TEMPERATURE: f32 = 0.0;

/// Output token ceiling for a generated document.
const MAX_OUTPUT_TOKENS: u32 = 16_384;

/// Overall request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Collaborator that turns an assembled prompt into documentation text.
pub(crate) trait DocumentationProvider {
    /// Performs one synchronous generation call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provider`] on any remote failure.
    fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String>;
}

/// Gemini `generateContent` client.
pub(crate) struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no API key was resolved, or
    /// [`Error::Provider`] if the HTTP client cannot be constructed.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("API key is required for the model call"))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: config.model.clone(),
        })
    }
}

impl DocumentationProvider for GeminiClient {
    fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String> {
        let body = GenerateContentRequest::new(prompt, system_instruction);
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        debug!(
            model = %self.model,
            prompt_bytes = prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::provider(format!(
                        "Request timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    ))
                } else {
                    Error::provider(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| Error::provider(format!("Failed to parse response: {}", e)))?;

        extract_text(&parsed)
    }
}

/// Maps an HTTP error status to the single provider error kind, preserving
/// the failure category in the message.
fn map_status(status: StatusCode) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::provider(format!("Authentication failed: {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            Error::provider(format!("Rate limit or quota exceeded: {}", status))
        }
        s if s.is_server_error() => Error::provider(format!("Server error: {}", s)),
        s => Error::provider(format!("Request rejected: {}", s)),
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: &GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::provider("Response contained no generated text"));
    }

    Ok(text)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(prompt: &str, system_instruction: Option<&str>) -> Self {
        Self {
            contents: vec![RequestContent {
                role: Some("user".to_string()),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system_instruction.map(|text| RequestContent {
                role: None,
                parts: vec![RequestPart {
                    text: text.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
