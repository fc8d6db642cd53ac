//! Search provider module
//!
//! Defines the SearchProvider capability and its Google implementation.

mod traits;

pub mod google;

pub use google::GoogleCustomSearch;
pub use traits::*;
