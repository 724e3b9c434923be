//! Stop filter implementation.
//!
//! Removes common words that carry no meaning for an AND query. The default
//! English list is built once per process and shared by every filter.
//!
//! # Examples
//!
//! ```
//! use quill::analysis::token_filter::Filter;
//! use quill::analysis::token_filter::stop::StopFilter;
//! use quill::analysis::token::Token;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![Token::new("the", 0), Token::new("quick", 1), Token::new("fox", 2)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "quick");
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a shared set.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that removes stop words from the token stream.
///
/// Matching is exact, so the filter belongs after [`LowercaseFilter`] in a
/// pipeline.
///
/// [`LowercaseFilter`]: crate::analysis::token_filter::LowercaseFilter
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
        }
    }

    /// Create a new stop filter from a list of stop words.
    ///
    /// ```
    /// use quill::analysis::token_filter::stop::StopFilter;
    ///
    /// let filter = StopFilter::from_words(vec!["foo", "bar", "baz"]);
    /// assert_eq!(filter.len(), 3);
    /// assert!(filter.is_stop_word("bar"));
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        let stop_words = Arc::clone(&self.stop_words);
        Box::new(tokens.filter(move |token| !stop_words.contains(&token.text)))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
