//! Query embedding.
//!
//! The encoder runs behind a model server; the server tokenizes,
//! truncates to the requested length and mean-pools the hidden states
//! into one fixed-length vector. For a fixed model the call is
//! deterministic: no sampling is involved.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::RagError;
use shared::types::Result;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds `text`, truncated to `max_length` tokens, into a
    /// fixed-length vector. Empty input fails with an encoding error
    /// before any backend call.
    async fn embed(&self, text: &str, max_length: usize) -> Result<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
    options: EmbeddingOptions,
}

#[derive(Serialize)]
struct EmbeddingOptions {
    num_ctx: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by an Ollama server's `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str, max_length: usize) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(RagError::Encoding(
                "cannot embed empty input".to_string(),
            ));
        }

        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
            options: EmbeddingOptions {
                num_ctx: max_length,
            },
        };
        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Encoding(format!(
                "embedding backend error {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.embedding.is_empty() {
            return Err(RagError::Encoding(
                "embedding backend returned an empty vector".to_string(),
            ));
        }
        Ok(parsed.embedding)
    }
}
