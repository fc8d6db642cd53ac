//! Multi-query retrieval and answer synthesis
//!
//! A question flows through four stages:
//! query expansion, per-query search with link deduplication,
//! bounded page fetching, and answer synthesis.
//! Every stage absorbs its own failures and degrades the result instead
//! of aborting the request.

mod expander;
mod fetcher;
mod models;
mod orchestrator;
mod synthesizer;

#[cfg(test)]
pub(crate) mod testing;

pub use expander::{fallback_queries, parse_queries, ExpansionFailure, FallbackKind, QueryExpander};
pub use fetcher::{ContentFetcher, PageFetcher, FETCH_TIMEOUT};
pub use models::*;
pub use orchestrator::{dedup_hits, Retriever, MAX_SOURCES, RESULTS_PER_QUERY};
pub use synthesizer::{build_prompt, combine_sources, AnswerSynthesizer};

use crate::engines::SearchProvider;
use crate::llm::LanguageModel;
use std::sync::Arc;

/// How a request ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// No search hits for any expanded query
    NoResults { queries: Vec<Query> },
    /// Hits exist but no page could be fetched
    NothingFetched {
        hits: Vec<SearchHit>,
        queries: Vec<Query>,
    },
    /// An answer was synthesized (possibly an error message from the model)
    Answered(SynthesisResult),
}

/// Full question-answering pipeline
#[derive(Clone)]
pub struct AnswerService {
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl AnswerService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        let expander = QueryExpander::new(model.clone());
        Self {
            retriever: Retriever::new(expander, search, fetcher),
            synthesizer: AnswerSynthesizer::new(model),
        }
    }

    /// Answer a question. The prior turn is only used for follow-ups.
    pub async fn answer(&self, user_query: &str, is_followup: bool, prior: Option<&PriorTurn>) -> Outcome {
        let retrieval = self.retriever.retrieve(user_query, is_followup, prior).await;

        if retrieval.hits.is_empty() {
            return Outcome::NoResults {
                queries: retrieval.queries,
            };
        }

        if retrieval.sources.is_empty() {
            return Outcome::NothingFetched {
                hits: retrieval.hits,
                queries: retrieval.queries,
            };
        }

        let prior = prior.filter(|_| is_followup);
        let answer = self
            .synthesizer
            .synthesize(user_query, &retrieval.sources, prior)
            .await;

        Outcome::Answered(SynthesisResult {
            answer,
            sources_used: retrieval.sources.iter().map(|s| s.hit().clone()).collect(),
            queries_used: retrieval.queries,
        })
    }
}
