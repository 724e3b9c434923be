//! Text analysis for Quill.
//!
//! Turns free text into the ordered sequence of normalized terms the index is
//! keyed by: a tokenizer splits the text, then token filters lowercase it and
//! drop stop words.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
