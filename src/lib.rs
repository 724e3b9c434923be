//! # Quill
//!
//! A small full-text index for Rust.
//!
//! ## Features
//!
//! - Unicode-aware text analysis with lowercasing and stop words
//! - AND queries over sorted posting lists
//! - A single self-describing segment file, rebuilt by a forward scan on open
//! - Crash-safe saves through a temporary file and an atomic rename
//! - Pluggable storage backends (file system, memory)
//!
//! ## Example
//!
//! ```no_run
//! use quill::Index;
//!
//! let index = Index::open("words.seg")?;
//! index.add(1, "first document");
//! index.add(2, "second document");
//! index.save()?;
//!
//! assert_eq!(index.search("document")?, vec![1, 2]);
//! # Ok::<(), quill::QuillError>(())
//! ```

pub mod analysis;
pub mod error;
pub mod index;
pub mod storage;
pub mod util;

pub use error::{QuillError, Result};
pub use index::{DocId, Index, IndexConfig, IndexStats, PostingList};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
