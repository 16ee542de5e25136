//! Generation backends.
//!
//! One polymorphic `Generator` capability with two implementations
//! selected at startup: a local Ollama server or the hosted Gemini
//! API. The pipeline above is backend-agnostic; both return the bare
//! completion with no prompt echo.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::RagError;
use shared::types::Result;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Produces a completion for `prompt`. `max_new_tokens` bounds
    /// latency and output length; near-zero `temperature` keeps
    /// decoding reproducible. A failure is terminal for the call and
    /// is never retried here.
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Ollama

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    done: bool,
}

/// Generator backed by an Ollama server's `/api/chat` endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions {
                num_predict: max_new_tokens,
                temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Generation(format!("ollama request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RagError::Generation(format!("ollama response unreadable: {e}")))?;
        if !status.is_success() {
            return Err(RagError::Generation(format!(
                "ollama API error {status}: {text}"
            )));
        }

        // Some server versions reply with line-delimited chunks even
        // when streaming is off; collect content until `done`.
        let mut full_content = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
                full_content.push_str(&chat_resp.message.content);
                if chat_resp.done {
                    break;
                }
            }
        }
        Ok(full_content.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Gemini

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generator backed by the hosted Gemini `generateContent` API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model
        );
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_new_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RagError::BackendUnavailable(format!("gemini unreachable: {e}"))
                } else {
                    RagError::Generation(format!("gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RagError::BackendUnavailable(format!(
                "gemini API error {status}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!(
                "gemini API error {status}: {body}"
            )));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| RagError::Generation(format!("gemini response malformed: {e}")))?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                RagError::Generation("gemini returned no candidates".to_string())
            })?;
        Ok(text.trim().to_string())
    }
}
