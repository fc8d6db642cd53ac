//! Request-scoped data model for the retrieval pipeline

use serde::{Deserialize, Serialize};

/// Maximum characters of prior-turn text embedded in prompts
pub const PRIOR_TURN_MAX_CHARS: usize = 500;

/// One unit of search intent
pub type Query = String;

/// A candidate page returned by the search provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page URL, unique within one request
    pub link: String,
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        link: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// A search hit whose page was fetched and extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    #[serde(flatten)]
    hit: SearchHit,
    #[serde(skip)]
    content: String,
}

impl SourceRecord {
    pub fn new(hit: SearchHit, content: String) -> Self {
        Self { hit, content }
    }

    pub fn hit(&self) -> &SearchHit {
        &self.hit
    }

    pub fn title(&self) -> &str {
        &self.hit.title
    }

    pub fn link(&self) -> &str {
        &self.hit.link
    }

    pub fn snippet(&self) -> &str {
        &self.hit.snippet
    }

    /// Extracted page text
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Caller-supplied memory of one previous exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorTurn {
    pub query: String,
    pub summary_excerpt: String,
}

impl PriorTurn {
    /// Build a prior turn, bounding and scrubbing both fields before
    /// they can reach a prompt.
    pub fn new(query: &str, summary: &str) -> Self {
        Self {
            query: sanitize(query, PRIOR_TURN_MAX_CHARS),
            summary_excerpt: sanitize(summary, PRIOR_TURN_MAX_CHARS),
        }
    }

    /// Fold a follow-up question into the prior question
    pub fn contextualize(&self, followup: &str) -> Query {
        format!("{} (in context of: {})", followup, self.query)
    }
}

/// Drop control characters except newline and tab, then cap length
fn sanitize(text: &str, max_chars: usize) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_chars)
        .collect()
}

/// Output of the retrieval stage
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Deduplicated hits in first-seen order, before the fetch cap
    pub hits: Vec<SearchHit>,
    /// Successfully fetched sources, in hit order
    pub sources: Vec<SourceRecord>,
    /// Expanded queries that were searched
    pub queries: Vec<Query>,
}

/// Final answer with the sources and queries behind it
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Markdown answer
    pub answer: String,
    pub sources_used: Vec<SearchHit>,
    pub queries_used: Vec<Query>,
}
