//! AskWeb: answers questions from the live web
//!
//! A question is expanded into several search queries, the results are
//! deduplicated and fetched, and a language model synthesizes one
//! markdown answer citing the pages it read.

pub mod config;
pub mod engines;
pub mod extract;
pub mod llm;
pub mod network;
pub mod pipeline;
pub mod web;

pub use config::Settings;
pub use engines::SearchProvider;
pub use llm::LanguageModel;
pub use pipeline::{AnswerService, Outcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
