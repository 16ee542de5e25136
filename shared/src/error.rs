use thiserror::Error;

/// Errors that can occur across the RAG pipeline.
///
/// `IndexBuild`, `DimensionMismatch` and `Config` are startup-fatal;
/// everything else is a per-request failure that the judge pipeline
/// resolves to a fixed fallback string.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("index build error: {0}")]
    IndexBuild(String),

    #[error("query dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("generation timed out")]
    Timeout,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
