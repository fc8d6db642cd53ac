//! Query expansion
//!
//! Turns one user question into a handful of complementary search queries.
//! The language model does the work; when it fails or produces too little,
//! a deterministic set of variations of the question is used instead.

use super::models::Query;
use crate::llm::{GenerationConfig, LanguageModel, LlmError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on expanded queries
pub const MAX_QUERIES: usize = 4;

/// Fewer parsed queries than this triggers the fallback
pub const MIN_QUERIES: usize = 2;

/// Parsed lines of this many characters or fewer are discarded
const MIN_QUERY_CHARS: usize = 5;

/// Leading enumeration and bullet characters
static ENUMERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.\-*•)\s]+").expect("enumeration pattern is valid"));

/// Why the model output could not be used
#[derive(Debug, Error)]
pub enum ExpansionFailure {
    #[error("language model call failed: {0}")]
    Model(#[from] LlmError),
    #[error("only {0} usable queries generated")]
    TooFew(usize),
}

/// Which failure path produced a fallback set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Model answered but gave fewer than two usable lines
    TooFew,
    /// Model call errored
    ModelError,
}

/// Deterministic query variations of the user question
pub fn fallback_queries(user_query: &str, kind: FallbackKind) -> Vec<Query> {
    let lowered = user_query.to_lowercase();
    let queries = match kind {
        FallbackKind::TooFew => vec![
            user_query.to_string(),
            format!("{} explained", user_query),
            format!("{} guide", user_query),
            format!("how to {}", lowered),
        ],
        FallbackKind::ModelError => vec![
            user_query.to_string(),
            format!("{} explained", user_query),
            format!("{} guide tutorial", user_query),
            format!("what is {}", lowered),
        ],
    };
    queries.into_iter().take(MAX_QUERIES).collect()
}

/// Split model output into clean queries, one per line
pub fn parse_queries(text: &str) -> Vec<Query> {
    text.lines()
        .map(|line| ENUMERATION.replace(line.trim(), "").trim_end().to_string())
        .filter(|line| line.chars().count() > MIN_QUERY_CHARS)
        .take(MAX_QUERIES)
        .collect()
}

fn expansion_prompt(user_query: &str) -> String {
    format!(
        "Given the following user question or problem, generate exactly 3-4 optimized search \
queries that would help find the best information to answer it comprehensively.

User question: {user_query}

Generate exactly 3-4 search queries. Each query should be on a separate line. Make them \
specific, diverse, and complementary to cover different aspects of the question.
IMPORTANT: Return ONLY the queries, one per line, with no numbering, bullets, or additional \
text. Just the queries themselves."
    )
}

/// Expands a user question into 2-4 search queries
#[derive(Clone)]
pub struct QueryExpander {
    model: Arc<dyn LanguageModel>,
}

impl QueryExpander {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Ask the model for queries without applying any fallback
    pub async fn generate(&self, user_query: &str) -> Result<Vec<Query>, ExpansionFailure> {
        let text = self
            .model
            .generate(&expansion_prompt(user_query), &GenerationConfig::expansion())
            .await?;

        let queries = parse_queries(&text);
        if queries.len() < MIN_QUERIES {
            return Err(ExpansionFailure::TooFew(queries.len()));
        }
        Ok(queries)
    }

    /// Expand a question, falling back to deterministic variations.
    /// Always returns between two and four queries.
    pub async fn expand(&self, user_query: &str) -> Vec<Query> {
        info!("Generating search queries for '{}'", user_query);

        let queries = match self.generate(user_query).await {
            Ok(queries) => queries,
            Err(ExpansionFailure::TooFew(count)) => {
                warn!("Only {} queries generated, using variations", count);
                fallback_queries(user_query, FallbackKind::TooFew)
            }
            Err(ExpansionFailure::Model(e)) => {
                warn!("Query generation failed: {}", e);
                fallback_queries(user_query, FallbackKind::ModelError)
            }
        };

        info!("Using {} search queries", queries.len());
        for (i, query) in queries.iter().enumerate() {
            tracing::debug!("  {}. {}", i + 1, query);
        }
        queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::FakeModel;

    fn expander(model: FakeModel) -> QueryExpander {
        QueryExpander::new(Arc::new(model))
    }

    #[test]
    fn test_parse_strips_enumeration() {
        let text = "1. rust ownership rules\n- borrow checker explained\n* lifetimes in rust\n• rust move semantics\n";
        assert_eq!(
            parse_queries(text),
            vec![
                "rust ownership rules",
                "borrow checker explained",
                "lifetimes in rust",
                "rust move semantics",
            ]
        );
    }

    #[test]
    fn test_parse_drops_short_lines_and_caps() {
        let text = "Queries:\n\n2) short\nfirst real query\nsecond real query\nthird real query\nfourth real query\nfifth real query";
        let queries = parse_queries(text);
        assert_eq!(queries.len(), MAX_QUERIES);
        assert_eq!(queries[0], "Queries:");
        assert_eq!(queries[1], "first real query");
    }

    #[test]
    fn test_fallback_shapes() {
        assert_eq!(
            fallback_queries("Bake Bread", FallbackKind::TooFew),
            vec!["Bake Bread", "Bake Bread explained", "Bake Bread guide", "how to bake bread"]
        );
        assert_eq!(
            fallback_queries("Bake Bread", FallbackKind::ModelError),
            vec![
                "Bake Bread",
                "Bake Bread explained",
                "Bake Bread guide tutorial",
                "what is bake bread"
            ]
        );
    }

    #[tokio::test]
    async fn test_expand_uses_model_output() {
        let model = FakeModel::new().expansion("tokio runtime internals\nasync rust executors\nfutures polling model");
        let queries = expander(model).expand("how does tokio work").await;
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "tokio runtime internals");
    }

    #[tokio::test]
    async fn test_model_error_uses_error_fallback() {
        let model = FakeModel::new().expansion_error("quota exceeded");
        let queries = expander(model).expand("Rust").await;
        assert_eq!(queries, fallback_queries("Rust", FallbackKind::ModelError));
    }

    #[tokio::test]
    async fn test_degenerate_output_uses_short_fallback() {
        let model = FakeModel::new().expansion("only one good query\nok");
        let queries = expander(model).expand("Rust").await;
        assert_eq!(queries, fallback_queries("Rust", FallbackKind::TooFew));
    }

    #[tokio::test]
    async fn test_expand_always_two_to_four() {
        let repeated = "long query line\n".repeat(10);
        let outputs = ["", "a\nb\nc", "one real query\ntwo real query", repeated.as_str()];
        for output in outputs {
            let queries = expander(FakeModel::new().expansion(output)).expand("question").await;
            assert!((MIN_QUERIES..=MAX_QUERIES).contains(&queries.len()), "{:?}", queries);
            assert!(queries.iter().all(|q| !q.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_generate_reports_too_few() {
        let model = FakeModel::new().expansion("just one query here");
        let err = expander(model).generate("q").await.unwrap_err();
        assert!(matches!(err, ExpansionFailure::TooFew(1)));
    }

    #[tokio::test]
    async fn test_prompt_embeds_question() {
        let model = Arc::new(FakeModel::new().expansion("first query line\nsecond query line"));
        QueryExpander::new(model.clone()).expand("why is the sky blue").await;
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User question: why is the sky blue"));
        assert!(prompts[0].contains("exactly 3-4"));
    }
}
