//! Index configuration.

use serde::{Deserialize, Serialize};

use crate::storage::StorageConfig;

/// Configuration for opening an [`Index`](crate::index::Index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Settings for the file storage backing the segment.
    pub storage: StorageConfig,

    /// Whether to verify record checksums when reading the segment.
    pub verify_checksums: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            storage: StorageConfig::default(),
            verify_checksums: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();

        assert!(config.verify_checksums);
        assert_eq!(config.storage.buffer_size, 65536);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"storage": {"sync_writes": true}}"#).unwrap();

        assert!(config.verify_checksums);
        assert!(config.storage.sync_writes);
        assert_eq!(config.storage.buffer_size, 65536);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: IndexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
