//! Dual-answer judge pipeline.
//!
//! Generates two independent candidates concurrently, has the model
//! judge them, and returns the winner. Every failure path resolves to
//! a fixed user-facing string; nothing raises past this boundary.

use std::sync::Arc;

use futures::future;
use tokio::time::timeout;

use domain::models::Verdict;
use domain::prompt;
use shared::error::RagError;

use crate::answer_service::AnswerService;

/// Returned when either candidate is missing or generation failed.
pub const FALLBACK_GENERATION: &str = "⚠️ 未成功產生回覆，請稍後再試。";
/// Returned when the judge reply contains neither label.
pub const FALLBACK_UNDETERMINED: &str = "⚠️ 無法判斷最佳回覆，請稍後再試。";
/// Returned when the candidate pair misses the deadline or the
/// backend is unreachable.
pub const FALLBACK_TIMEOUT: &str = "⚠️ 回覆超時，請稍後再試。";

pub struct JudgePipeline {
    answers: Arc<AnswerService>,
}

impl JudgePipeline {
    pub fn new(answers: Arc<AnswerService>) -> Self {
        Self { answers }
    }

    /// The sole operation exposed to the front end. Never fails: all
    /// error paths collapse into one of the three fixed fallbacks.
    pub async fn answer_with_judgement(&self, query: &str) -> String {
        let first = self.spawn_ask(query);
        let second = self.spawn_ask(query);

        // One deadline governs the pair. On expiry the in-flight
        // generations are abandoned, not cancelled: dropping the join
        // handles detaches the tasks and discards whatever they later
        // produce, so a late answer cannot reach another request.
        let pair_timeout = self.answers.config().pair_timeout;
        let joined = match timeout(pair_timeout, future::join(first, second)).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(timeout_ms = pair_timeout.as_millis() as u64, "candidate pair timed out");
                return FALLBACK_TIMEOUT.to_string();
            }
        };

        let answer_1 = match joined.0 {
            Ok(Ok(answer)) => answer,
            Ok(Err(error)) => return fallback_for(&error),
            Err(join_error) => {
                tracing::error!(%join_error, "ask task failed");
                return FALLBACK_GENERATION.to_string();
            }
        };
        let answer_2 = match joined.1 {
            Ok(Ok(answer)) => answer,
            Ok(Err(error)) => return fallback_for(&error),
            Err(join_error) => {
                tracing::error!(%join_error, "ask task failed");
                return FALLBACK_GENERATION.to_string();
            }
        };

        // No judging of partial failures.
        if answer_1.trim().is_empty() || answer_2.trim().is_empty() {
            tracing::warn!("at least one candidate was empty, skipping judge");
            return FALLBACK_GENERATION.to_string();
        }

        let answer_1 = prompt::normalize_answer(&answer_1);
        let answer_2 = prompt::normalize_answer(&answer_2);

        let config = self.answers.config();
        let judge_prompt = prompt::judge_prompt(&answer_1, &answer_2);
        let reply = match self
            .answers
            .generation()
            .generate(&judge_prompt, config.judge_max_tokens, config.temperature)
            .await
        {
            Ok(reply) => reply,
            Err(error) => return fallback_for(&error),
        };

        match Verdict::parse(&reply) {
            Verdict::First => answer_1,
            Verdict::Second => answer_2,
            Verdict::Undetermined => {
                tracing::warn!(reply = %reply, "judge reply matched neither label");
                FALLBACK_UNDETERMINED.to_string()
            }
        }
    }

    fn spawn_ask(&self, query: &str) -> tokio::task::JoinHandle<shared::types::Result<String>> {
        let service = Arc::clone(&self.answers);
        let query = query.to_string();
        tokio::spawn(async move { service.ask(&query).await })
    }
}

/// Maps a per-request error to its user-facing fallback. Unreachable
/// backends behave like a timeout; everything else reads as a failed
/// generation.
fn fallback_for(error: &RagError) -> String {
    tracing::warn!(%error, "request failed, returning fallback");
    match error {
        RagError::Timeout | RagError::BackendUnavailable(_) => FALLBACK_TIMEOUT.to_string(),
        _ => FALLBACK_GENERATION.to_string(),
    }
}
