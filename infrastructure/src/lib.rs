pub mod config;
pub mod corpus;
pub mod embedder;
pub mod generation;
pub mod generator;
pub mod index;
