//! Generative language model module

mod gemini;
mod traits;

pub use gemini::Gemini;
pub use traits::*;
