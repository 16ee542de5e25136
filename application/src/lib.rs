pub mod answer_service;
pub mod judge_pipeline;

pub use answer_service::AnswerService;
pub use judge_pipeline::JudgePipeline;
