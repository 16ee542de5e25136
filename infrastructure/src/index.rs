//! Flat in-memory k-NN index over the corpus embeddings.
//!
//! Built once at startup from the full corpus and read-only
//! thereafter, so concurrent searches need no locking.

use domain::models::{EmbeddingRecord, RetrievedPassage};
use shared::error::RagError;
use shared::types::Result;

pub struct VectorIndex {
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    /// Builds the index from all records in corpus order. Fails when
    /// the corpus is empty or vector dimensionality is inconsistent;
    /// a process must not serve requests over a malformed index.
    pub fn build(records: &[EmbeddingRecord]) -> Result<Self> {
        let first = records
            .first()
            .ok_or_else(|| RagError::IndexBuild("corpus is empty".to_string()))?;
        let dimension = first.embedding.len();
        if dimension == 0 {
            return Err(RagError::IndexBuild(
                "corpus vectors have zero dimension".to_string(),
            ));
        }

        let mut texts = Vec::with_capacity(records.len());
        let mut vectors = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.embedding.len() != dimension {
                return Err(RagError::IndexBuild(format!(
                    "record {position} has dimension {} but the corpus started with {dimension}",
                    record.embedding.len()
                )));
            }
            texts.push(record.text.clone());
            vectors.push(record.embedding.clone());
        }

        tracing::debug!(entries = texts.len(), dimension, "vector index built");
        Ok(Self {
            texts,
            vectors,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the `k` nearest passages by ascending L2 distance. A
    /// corpus smaller than `k` yields every entry, still sorted; ties
    /// keep corpus insertion order. `k == 0` retrieves nothing, which
    /// downstream turns into an empty context block.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedPassage>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (l2_distance(query, vector), position))
            .collect();
        // Stable sort on distance alone preserves insertion order for
        // equal distances.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, position)| RetrievedPassage {
                text: self.texts[position].clone(),
                score,
            })
            .collect())
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
