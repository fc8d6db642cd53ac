//! HTTP networking module
//!
//! Provides the outgoing HTTP client used for search API calls,
//! page fetches and language model requests.

mod client;
mod user_agent;

pub use client::{HttpClient, HttpResponse};
pub use user_agent::generate_user_agent;
