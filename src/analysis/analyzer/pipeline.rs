//! Pipeline analyzer that combines a tokenizer with token filters.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use quill::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use quill::analysis::tokenizer::RegexTokenizer;
//! use quill::analysis::token_filter::{LowercaseFilter, StopFilter};
//!
//! let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(tokenizer)
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer");
//!
//! assert_eq!(analyzer.terms("Hello THE world AND test"), vec!["hello", "world", "test"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
///
/// Filters run in the order they were added.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The configured name of this pipeline.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> TokenStream {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    fn name(&self) -> &'static str {
        // The configured name is not 'static; see pipeline_name()
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
    use crate::analysis::tokenizer::RegexTokenizer;

    #[test]
    fn test_filters_apply_in_order() {
        let tokenizer = Arc::new(RegexTokenizer::new().unwrap());

        // Stop before lowercase: "THE" is not an exact stop word match yet
        let analyzer = PipelineAnalyzer::new(tokenizer.clone())
            .add_filter(Arc::new(StopFilter::from_words(vec!["the"])))
            .add_filter(Arc::new(LowercaseFilter::new()));
        assert_eq!(analyzer.terms("THE end"), vec!["the", "end"]);

        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::from_words(vec!["the"])));
        assert_eq!(analyzer.terms("THE end"), vec!["end"]);
    }

    #[test]
    fn test_debug_lists_stages() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
            .add_filter(Arc::new(LowercaseFilter::new()));

        assert_eq!(analyzer.pipeline_name(), "pipeline_regex");
        let debug = format!("{analyzer:?}");
        assert!(debug.contains("regex"));
        assert!(debug.contains("lowercase"));
    }
}
