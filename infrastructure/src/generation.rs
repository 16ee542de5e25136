//! Serialized access to the single model instance.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::generator::Generator;
use shared::telemetry::Telemetry;
use shared::types::Result;

/// Owns the one generation backend and serializes every call to it.
///
/// A single model instance cannot safely run two forward passes at
/// once, so at most one `generate` executes at any instant; other
/// callers wait on the mutex in FIFO order (tokio's mutex is fair).
/// Injected into the application layer as an `Arc`.
pub struct GenerationService {
    backend: Box<dyn Generator>,
    lock: Mutex<()>,
}

impl GenerationService {
    pub fn new(backend: Box<dyn Generator>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            lock: Mutex::new(()),
        })
    }

    pub async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let _guard = self.lock.lock().await;
        let timer = Telemetry::new();
        let result = self.backend.generate(prompt, max_new_tokens, temperature).await;
        tracing::debug!(
            elapsed_ms = timer.elapsed_ms() as u64,
            ok = result.is_ok(),
            "generation call finished"
        );
        result
    }
}
