//! Résumé / job-description match engine.
//!
//! Extracts structured fields from a résumé and a job description, compares
//! them through a generative text service, and produces a match score plus
//! qualitative feedback (matching points, gaps, role suggestions, career
//! tips). Document ingestion and presentation are the host application's
//! concern; this crate takes two plain-text strings and returns a
//! [`pipeline::MatchReport`].
//!
//! Every generative call is funneled through [`llm_client::TextCompletionService`],
//! so the whole pipeline runs against a deterministic stub in tests.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod normalizer;
pub mod parser;
pub mod pipeline;

pub use errors::PipelineError;
pub use llm_client::{LlmClient, LlmError, TextCompletionService};
pub use pipeline::{MatchPipeline, MatchReport};
