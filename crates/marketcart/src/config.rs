//! Configuration for a cart scope.

use marketcart_core::{storage_key, DEFAULT_NAMESPACE};

/// Configuration for [`crate::CartStore`].
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Namespace prefix of the storage key.
    pub namespace: String,
    /// Collapse queued writes so only the newest snapshot is written.
    ///
    /// Off by default, in which case every mutation produces exactly one
    /// write.
    pub coalesce_writes: bool,
    /// Capacity of the persistence failure channel. Slow subscribers lag
    /// rather than block the writer.
    pub failure_buffer: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            coalesce_writes: false,
            failure_buffer: 16,
        }
    }
}

impl CartConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_coalesced_writes(mut self, coalesce: bool) -> Self {
        self.coalesce_writes = coalesce;
        self
    }

    pub fn with_failure_buffer(mut self, capacity: usize) -> Self {
        self.failure_buffer = capacity;
        self
    }

    /// The key the cart snapshot is stored under.
    pub fn storage_key(&self) -> String {
        storage_key(&self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "@GoMarketPlace:products");
        assert!(!config.coalesce_writes);
    }

    #[test]
    fn test_builder() {
        let config = CartConfig::default()
            .with_namespace("@Kiosk")
            .with_coalesced_writes(true)
            .with_failure_buffer(4);

        assert_eq!(config.storage_key(), "@Kiosk:products");
        assert!(config.coalesce_writes);
        assert_eq!(config.failure_buffer, 4);
    }
}
