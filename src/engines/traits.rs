//! Search provider traits and types

use crate::pipeline::SearchHit;
use async_trait::async_trait;

/// Capability that turns one query into an ordered list of candidate pages.
///
/// Implementations absorb provider failures: an error is logged and
/// reported as an empty hit list so that one failing query never aborts
/// the other queries of a request.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Search for `query`, returning at most `result_cap` hits
    async fn search(&self, query: &str, result_cap: u32) -> Vec<SearchHit>;
}
