//! Loader for the pre-built corpus artifact.
//!
//! The index is constructed offline; at startup we only deserialize
//! the ordered `[{text, embedding}]` JSON file. The core never reads
//! raw statute documents.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use domain::models::EmbeddingRecord;
use shared::types::Result;

/// Reads the ordered sequence of embedding records from `path`.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<EmbeddingRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records: Vec<EmbeddingRecord> = serde_json::from_reader(BufReader::new(file))?;
    tracing::info!(
        count = records.len(),
        path = %path.display(),
        "corpus loaded"
    );
    Ok(records)
}
