//! Core analyzer trait definition.
//!
//! An analyzer is the whole text processing pipeline:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```
//!
//! The index runs the same analyzer over document text on add and over query
//! text on search, so both sides agree on what a term is.

use crate::analysis::token::TokenStream;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analysis never fails: any input, including empty or all-punctuation text,
/// produces a (possibly empty) stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> TokenStream;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze the given text and collect the term texts in order.
    ///
    /// ```
    /// use quill::analysis::analyzer::{Analyzer, StandardAnalyzer};
    ///
    /// let analyzer = StandardAnalyzer::new().unwrap();
    /// assert_eq!(analyzer.terms("The quick brown fox"), vec!["quick", "brown", "fox"]);
    /// ```
    fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).map(|token| token.text).collect()
    }
}
