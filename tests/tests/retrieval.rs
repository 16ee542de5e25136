//! Retrieval-path tests: embedding lookup, k-NN search and prompt
//! grounding, driven through `AnswerService::ask` with an echoing
//! generator.

use std::sync::Arc;
use std::time::Duration;

use application::AnswerService;
use domain::models::EmbeddingRecord;
use infrastructure::config::{Backend, Config};
use infrastructure::embedder::Embedder;
use infrastructure::generation::GenerationService;
use infrastructure::index::VectorIndex;
use tests::{EchoGenerator, MapEmbedder};

const TORT_ARTICLE: &str =
    "民法第184條：因故意或過失，不法侵害他人之權利者，負損害賠償責任。";
const THEFT_ARTICLE: &str =
    "刑法第320條：意圖為自己或第三人不法之所有，而竊取他人之動產者，為竊盜罪。";

fn corpus() -> Vec<EmbeddingRecord> {
    vec![
        EmbeddingRecord {
            text: TORT_ARTICLE.to_string(),
            embedding: vec![1.0, 0.0],
        },
        EmbeddingRecord {
            text: THEFT_ARTICLE.to_string(),
            embedding: vec![0.0, 1.0],
        },
    ]
}

fn service(embedder: MapEmbedder, top_k: usize) -> Arc<AnswerService> {
    let mut config = Config::for_backend(Backend::Local).unwrap();
    config.top_k = top_k;
    config.pair_timeout = Duration::from_secs(5);

    let embedder: Arc<dyn Embedder> = Arc::new(embedder);
    let index = Arc::new(VectorIndex::build(&corpus()).unwrap());
    let generation = GenerationService::new(Box::new(EchoGenerator));
    AnswerService::new(embedder, index, generation, config)
}

#[tokio::test]
async fn query_near_a_passage_grounds_the_prompt_in_it() {
    // The query embeds next to the tort article, so with k=1 the
    // context is exactly that passage and the assembled prompt (echoed
    // back by the generator) carries its citation.
    let embedder = MapEmbedder::new(vec![0.0, 0.0]).with("被車撞了怎麼辦？", vec![0.9, 0.1]);
    let service = service(embedder, 1);

    let answer = service.ask("被車撞了怎麼辦？").await.unwrap();
    assert!(!answer.trim().is_empty());
    assert!(answer.contains("第184條"));
    assert!(!answer.contains("第320條"));
    assert!(answer.contains("使用者的問題: 被車撞了怎麼辦？"));
}

#[tokio::test]
async fn corpus_text_as_query_self_matches_at_top_rank() {
    let embedder = MapEmbedder::new(vec![0.0, 0.0]).with(THEFT_ARTICLE, vec![0.0, 1.0]);
    let service = service(embedder, 1);

    let answer = service.ask(THEFT_ARTICLE).await.unwrap();
    assert!(answer.contains(THEFT_ARTICLE));
}

#[tokio::test]
async fn oversized_k_brings_in_the_whole_corpus() {
    let embedder = MapEmbedder::new(vec![0.5, 0.5]);
    let service = service(embedder, 10);

    let answer = service.ask("任何問題").await.unwrap();
    assert!(answer.contains("第184條"));
    assert!(answer.contains("第320條"));
}

#[tokio::test]
async fn embedding_is_deterministic_across_repeated_calls() {
    let embedder = MapEmbedder::new(vec![0.25, 0.75]).with("重複的問題", vec![0.1, 0.9]);
    let first = embedder.embed("重複的問題", 512).await.unwrap();
    let second = embedder.embed("重複的問題", 512).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_query_fails_with_an_encoding_error() {
    let embedder = MapEmbedder::new(vec![0.5, 0.5]);
    let service = service(embedder, 1);

    let err = service.ask("   ").await.unwrap_err();
    assert!(matches!(err, shared::error::RagError::Encoding(_)));
}
