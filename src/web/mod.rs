//! Web server module
//!
//! Provides the HTTP API consumed by the front-end.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{SearchRequest, SearchResponse, SourceResponse};
pub use routes::create_router;
pub use state::AppState;
