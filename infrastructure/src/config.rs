use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use shared::error::RagError;
use shared::types::Result;

/// Which generation backend serves the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Model hosted on a local Ollama server.
    Local,
    /// Hosted Gemini API.
    Gemini,
}

/// Deployment configuration, read from the environment with
/// per-backend profile defaults. The two profiles differ in retrieval
/// depth and generation length because the hosted generator affords a
/// larger context budget per call.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub ollama_base_url: String,
    pub ollama_gen_model: String,
    pub ollama_embed_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub corpus_path: String,
    pub top_k: usize,
    pub answer_max_tokens: u32,
    pub judge_max_tokens: u32,
    pub temperature: f32,
    pub embed_max_length: usize,
    pub pair_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        let backend = match env::var("RAG_BACKEND").as_deref() {
            Ok("gemini") => Backend::Gemini,
            Ok("local") | Err(_) => Backend::Local,
            Ok(other) => {
                return Err(RagError::Config(format!(
                    "unknown RAG_BACKEND '{other}' (expected 'local' or 'gemini')"
                )))
            }
        };
        Self::for_backend(backend)
    }

    /// Builds the profile for `backend`, applying env overrides on top
    /// of the profile defaults.
    pub fn for_backend(backend: Backend) -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY").ok();
        if backend == Backend::Gemini && gemini_api_key.is_none() {
            return Err(RagError::Config(
                "GEMINI_API_KEY is required for the gemini backend".to_string(),
            ));
        }

        let (top_k, answer_max_tokens, judge_max_tokens, temperature) = match backend {
            Backend::Local => (8, 256, 8, 0.1),
            Backend::Gemini => (5, 1024, 64, 0.0),
        };

        Ok(Self {
            backend,
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_gen_model: env_or("OLLAMA_GEN_MODEL", "llama3.2-taiwan-legal:3b"),
            ollama_embed_model: env_or("OLLAMA_EMBED_MODEL", "llama3.2-taiwan-legal:3b"),
            gemini_api_key,
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.5-flash-preview-04-17"),
            corpus_path: env_or("CORPUS_PATH", "data/laws_embedding.json"),
            top_k: parse_env("RAG_TOP_K", top_k)?,
            answer_max_tokens: parse_env("RAG_ANSWER_MAX_TOKENS", answer_max_tokens)?,
            judge_max_tokens: parse_env("RAG_JUDGE_MAX_TOKENS", judge_max_tokens)?,
            temperature: parse_env("RAG_TEMPERATURE", temperature)?,
            embed_max_length: parse_env("RAG_EMBED_MAX_LENGTH", 512)?,
            pair_timeout: Duration::from_secs(parse_env("RAG_TIMEOUT_SECS", 90)?),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RagError::Config(format!("invalid value for {key}: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
