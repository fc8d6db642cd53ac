//! Retrieval orchestration: expand, search, deduplicate, fetch

use super::expander::QueryExpander;
use super::fetcher::ContentFetcher;
use super::models::{PriorTurn, Query, Retrieval, SearchHit, SourceRecord};
use crate::engines::SearchProvider;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Hits requested from the provider per expanded query
pub const RESULTS_PER_QUERY: u32 = 2;

/// Maximum pages fetched per request
pub const MAX_SOURCES: usize = 8;

/// Merge hit lists keyed by link; the first occurrence wins
pub fn dedup_hits<I>(batches: I) -> Vec<SearchHit>
where
    I: IntoIterator<Item = Vec<SearchHit>>,
{
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    for hit in batches.into_iter().flatten() {
        if seen.insert(hit.link.clone()) {
            hits.push(hit);
        } else {
            debug!("Skipping duplicate link {}", hit.link);
        }
    }

    hits
}

/// Drives expansion, search and fetching for one request
#[derive(Clone)]
pub struct Retriever {
    expander: QueryExpander,
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ContentFetcher>,
}

impl Retriever {
    pub fn new(
        expander: QueryExpander,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        Self {
            expander,
            search,
            fetcher,
        }
    }

    /// Run retrieval. Failed searches and fetches shrink the result,
    /// they never abort it.
    pub async fn retrieve(
        &self,
        user_query: &str,
        is_followup: bool,
        prior: Option<&PriorTurn>,
    ) -> Retrieval {
        let expansion_input = match prior {
            Some(prior) if is_followup => prior.contextualize(user_query),
            _ => user_query.to_string(),
        };

        let queries = self.expander.expand(&expansion_input).await;
        let hits = self.search_all(&queries).await;
        info!("Collected {} unique links", hits.len());

        let sources = self.fetch_sources(&hits).await;
        info!("Fetched content for {} of {} links", sources.len(), hits.len().min(MAX_SOURCES));

        Retrieval {
            hits,
            sources,
            queries,
        }
    }

    /// Search each query in order and merge the results
    async fn search_all(&self, queries: &[Query]) -> Vec<SearchHit> {
        let mut batches = Vec::with_capacity(queries.len());
        for query in queries {
            batches.push(self.search.search(query, RESULTS_PER_QUERY).await);
        }
        dedup_hits(batches)
    }

    /// Fetch up to MAX_SOURCES pages concurrently, keeping hit order
    async fn fetch_sources(&self, hits: &[SearchHit]) -> Vec<SourceRecord> {
        let targets: Vec<SearchHit> = hits.iter().take(MAX_SOURCES).cloned().collect();

        let fetched: Vec<(SearchHit, Option<String>)> = stream::iter(targets)
            .map(|hit| {
                let fetcher = Arc::clone(&self.fetcher);
                async move {
                    let content = fetcher.fetch(&hit.link).await;
                    (hit, content)
                }
            })
            .buffered(MAX_SOURCES)
            .collect()
            .await;

        fetched
            .into_iter()
            .filter_map(|(hit, content)| match content {
                Some(content) if !content.is_empty() => Some(SourceRecord::new(hit, content)),
                _ => {
                    debug!("Dropping {} (no content)", hit.link);
                    None
                }
            })
            .collect()
    }
}
