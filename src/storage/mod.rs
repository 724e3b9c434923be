//! Storage abstraction layer for Quill.
//!
//! The index reads and replaces its segment through the [`Storage`] trait, so
//! the same engine runs against the file system or against memory.

pub mod file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use traits::*;
