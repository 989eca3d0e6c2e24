//! Storage engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Deepest container nesting traversal will follow. Insertions that
    /// would nest deeper are rejected.
    pub max_nesting_depth: usize,
    /// When an observer-capable host gets a storage, it observes its own
    /// storage tree.
    pub observe_own_storage: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            observe_own_storage: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: InventoryConfig =
            serde_json::from_str(r#"{ "max_nesting_depth": 4 }"#).unwrap();
        assert_eq!(config.max_nesting_depth, 4);
        assert!(config.observe_own_storage);
    }
}
