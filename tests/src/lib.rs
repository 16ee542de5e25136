//! Mock model backends for integration tests.
//!
//! The real backends sit behind HTTP; these run in-process so the
//! pipeline can be exercised end to end without a model server.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use infrastructure::embedder::Embedder;
use infrastructure::generator::Generator;
use shared::error::RagError;
use shared::types::Result;

/// Embedder with a fixed text-to-vector table. Unknown queries get
/// the fallback vector; lookups are exact, so feeding a corpus text
/// back as the query reproduces its corpus vector.
pub struct MapEmbedder {
    table: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl MapEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            table: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl Embedder for MapEmbedder {
    async fn embed(&self, text: &str, _max_length: usize) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(RagError::Encoding("empty input".to_string()));
        }
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Generator that replays a queue of candidate answers and a fixed
/// judge reply, distinguishing the two call kinds by the judge
/// prompt's closing clause. Counts judge invocations and can delay
/// candidate generation to force timeouts.
pub struct ScriptedGenerator {
    candidates: Mutex<VecDeque<String>>,
    judge_reply: String,
    judge_calls: Arc<AtomicUsize>,
    delays: Mutex<VecDeque<Duration>>,
}

impl ScriptedGenerator {
    pub fn new(candidates: Vec<&str>, judge_reply: &str) -> Self {
        Self {
            candidates: Mutex::new(candidates.into_iter().map(String::from).collect()),
            judge_reply: judge_reply.to_string(),
            judge_calls: Arc::new(AtomicUsize::new(0)),
            delays: Mutex::new(VecDeque::new()),
        }
    }

    /// Applies `delay` to each of the next `count` candidate calls;
    /// later calls run without delay.
    pub fn with_candidate_delays(self, delay: Duration, count: usize) -> Self {
        *self.delays.lock().unwrap() = std::iter::repeat(delay).take(count).collect();
        self
    }

    /// Shared judge-invocation counter, readable after the generator
    /// has been boxed into the service.
    pub fn judge_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.judge_calls)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _: u32, _: f32) -> Result<String> {
        if prompt.ends_with("較佳的回答是：") {
            self.judge_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(self.judge_reply.clone());
        }
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.candidates.lock().unwrap().pop_front();
        Ok(next.unwrap_or_default())
    }
}

/// Generator that echoes its prompt back, exposing exactly what the
/// retrieval and prompt-assembly stages produced.
pub struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, _: u32, _: f32) -> Result<String> {
        Ok(prompt.to_string())
    }
}
