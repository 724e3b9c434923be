//! Token filter implementations for token transformation.

use crate::analysis::token::TokenStream;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> TokenStream;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod stop;

pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;
