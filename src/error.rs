//! Error types for the Quill library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`QuillError`] enum. The variants follow the failure classes an index can
//! run into: the filesystem, the on-disk segment format, a disagreement between
//! the offset table and the segment file, and misuse of a memory-only index.
//!
//! # Examples
//!
//! ```
//! use quill::error::{QuillError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(QuillError::format("record length must be positive"))
//! }
//!
//! let err = example_operation().unwrap_err();
//! assert!(err.is_format());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Quill operations.
#[derive(Error, Debug)]
pub enum QuillError {
    /// I/O errors (open, seek, read, write, rename).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The segment file does not follow the expected byte layout.
    #[error("Format error: {0}")]
    Format(String),

    /// A stored offset points at a record for a different term.
    #[error("Consistency error: expected term {expected:?}, found {found:?}")]
    Consistency {
        /// The term the offset table claims lives at the offset.
        expected: String,
        /// The term actually stored there.
        found: String,
    },

    /// The operation is not possible with the index's configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Storage backend errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenizer construction and the like).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with QuillError.
pub type Result<T> = std::result::Result<T, QuillError>;

impl QuillError {
    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        QuillError::Format(msg.into())
    }

    /// Create a new consistency error.
    pub fn consistency<E: Into<String>, F: Into<String>>(expected: E, found: F) -> Self {
        QuillError::Consistency {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        QuillError::InvalidConfiguration(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        QuillError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        QuillError::Analysis(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        QuillError::Other(msg.into())
    }

    /// Whether this is a segment format error.
    pub fn is_format(&self) -> bool {
        matches!(self, QuillError::Format(_))
    }

    /// Whether this is an offset table / segment consistency error.
    pub fn is_consistency(&self) -> bool {
        matches!(self, QuillError::Consistency { .. })
    }

    /// Whether this is an invalid configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, QuillError::InvalidConfiguration(_))
    }
}
