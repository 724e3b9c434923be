//! Shared utility modules used across Quill components.

pub mod varint;
