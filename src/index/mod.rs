//! Index module for Quill.
//!
//! This module holds the posting lists, the segment file format and the
//! engine that ties them together.

pub mod config;
pub mod engine;
pub mod posting;
pub mod segment;

// Re-export commonly used types
pub use config::IndexConfig;
pub use engine::{Index, IndexStats};
pub use posting::{DocId, PostingList};
pub use segment::{SegmentReader, SegmentRecord, SegmentWriter};
