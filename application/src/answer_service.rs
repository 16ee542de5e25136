//! Retrieval-augmented answering: embed, retrieve, prompt, generate.

use std::sync::Arc;

use domain::prompt;
use infrastructure::config::Config;
use infrastructure::embedder::Embedder;
use infrastructure::generation::GenerationService;
use infrastructure::index::VectorIndex;
use shared::telemetry::Telemetry;
use shared::types::Result;

pub struct AnswerService {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
    generation: Arc<GenerationService>,
    config: Config,
}

impl AnswerService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<VectorIndex>,
        generation: Arc<GenerationService>,
        config: Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            embedder,
            index,
            generation,
            config,
        })
    }

    /// Answers one query grounded in the retrieved statutes. Safe to
    /// call concurrently: the index is read-only and each call owns
    /// its prompt and candidate; only the generation step serializes
    /// on the shared model.
    pub async fn ask(&self, query: &str) -> Result<String> {
        let timer = Telemetry::new();

        let query_vector = self
            .embedder
            .embed(query, self.config.embed_max_length)
            .await?;
        let passages = self.index.search(&query_vector, self.config.top_k)?;
        tracing::debug!(
            hits = passages.len(),
            elapsed_ms = timer.elapsed_ms() as u64,
            "retrieval done"
        );

        let context = prompt::join_context(passages.iter().map(|p| p.text.as_str()));
        let answer_prompt = prompt::answer_prompt(&context, query);
        let answer = self
            .generation
            .generate(
                &answer_prompt,
                self.config.answer_max_tokens,
                self.config.temperature,
            )
            .await?;

        tracing::info!(
            elapsed_ms = timer.elapsed_ms() as u64,
            chars = answer.chars().count(),
            "ask completed"
        );
        Ok(answer)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generation(&self) -> &Arc<GenerationService> {
        &self.generation
    }
}
