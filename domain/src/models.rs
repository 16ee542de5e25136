use serde::{Deserialize, Serialize};

/// One entry of the pre-built corpus artifact: a statute passage and
/// its pre-computed embedding. Corpus order defines the index position
/// that maps a search hit back to its source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A retrieval hit. `score` is the L2 distance to the query vector,
/// lower meaning more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub score: f32,
}

/// Outcome of the judge call over two candidate answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    First,
    Second,
    Undetermined,
}

/// Literal label the judge is instructed to emit for candidate 1.
pub const LABEL_FIRST: &str = "回答1";
/// Literal label the judge is instructed to emit for candidate 2.
pub const LABEL_SECOND: &str = "回答2";

impl Verdict {
    /// Parses a judge reply by loose substring containment: the first
    /// label is checked before the second, so a reply echoing both
    /// labels resolves to `First`. Neither label present means the
    /// judgement is undetermined; the caller must fall back rather
    /// than guess.
    pub fn parse(reply: &str) -> Self {
        if reply.contains(LABEL_FIRST) {
            Verdict::First
        } else if reply.contains(LABEL_SECOND) {
            Verdict::Second
        } else {
            Verdict::Undetermined
        }
    }
}
