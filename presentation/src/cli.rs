//! Terminal surface for the legal answering pipeline.
//!
//! The webhook front end lives elsewhere; this CLI is the local
//! caller of `answer_with_judgement` for one-shot questions and an
//! interactive loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use application::{AnswerService, JudgePipeline};
use infrastructure::config::{Backend, Config};
use infrastructure::corpus;
use infrastructure::embedder::{Embedder, OllamaEmbedder};
use infrastructure::generation::GenerationService;
use infrastructure::generator::{GeminiGenerator, Generator, OllamaGenerator};
use infrastructure::index::VectorIndex;
use shared::telemetry::Telemetry;

#[derive(Parser)]
#[command(
    name = "legalrag",
    about = "Legal question answering over a pre-embedded statute corpus"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Generation backend: local (Ollama) or gemini
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Retrieval depth override
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Path to the pre-built corpus artifact
    #[arg(long, global = true)]
    pub corpus: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer a single question and exit
    Ask { question: String },
    /// Interactive loop; empty line or "exit" quits
    Chat,
}

pub struct CliApp;

impl CliApp {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&mut self, cli: Cli) -> anyhow::Result<()> {
        let config = load_config(&cli)?;
        let pipeline = build_pipeline(&config)?;

        match cli.command {
            Command::Ask { question } => {
                answer_one(&pipeline, &question).await;
            }
            Command::Chat => {
                let stdin = io::stdin();
                loop {
                    print!("{} ", "法律問題>".cyan().bold());
                    io::stdout().flush()?;
                    let mut line = String::new();
                    if stdin.lock().read_line(&mut line)? == 0 {
                        break;
                    }
                    let question = line.trim();
                    if question.is_empty() || question == "exit" {
                        break;
                    }
                    answer_one(&pipeline, question).await;
                }
            }
        }
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

async fn answer_one(pipeline: &JudgePipeline, question: &str) {
    let timer = Telemetry::new();
    let answer = pipeline.answer_with_judgement(question).await;
    println!("{}", answer);
    println!(
        "{}",
        format!("({} ms)", timer.elapsed_ms()).dimmed()
    );
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.backend.as_deref() {
        Some("local") => Config::for_backend(Backend::Local)?,
        Some("gemini") => Config::for_backend(Backend::Gemini)?,
        Some(other) => anyhow::bail!("unknown backend '{other}' (expected 'local' or 'gemini')"),
        None => Config::load()?,
    };
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    if let Some(corpus_path) = &cli.corpus {
        config.corpus_path = corpus_path.clone();
    }
    Ok(config)
}

fn build_pipeline(config: &Config) -> anyhow::Result<JudgePipeline> {
    let records = corpus::load_corpus(&config.corpus_path)?;
    let index = Arc::new(VectorIndex::build(&records)?);
    tracing::info!(
        entries = index.len(),
        dimension = index.dimension(),
        "index ready"
    );

    let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::new(
        config.ollama_base_url.clone(),
        config.ollama_embed_model.clone(),
    ));
    let generator: Box<dyn Generator> = match config.backend {
        Backend::Local => Box::new(OllamaGenerator::new(
            config.ollama_base_url.clone(),
            config.ollama_gen_model.clone(),
        )),
        Backend::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("gemini backend selected without an API key"))?;
            Box::new(GeminiGenerator::new(api_key, config.gemini_model.clone()))
        }
    };

    let generation = GenerationService::new(generator);
    let answers = AnswerService::new(embedder, index, generation, config.clone());
    Ok(JudgePipeline::new(answers))
}
