//! Item attributes relevant to storage.
//!
//! Storage only cares about two things an item carries: its size class and
//! its traits (free-form tags such as `"id_card"` or `"clothing"`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Size class of an item. Ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl Default for ItemSize {
    fn default() -> Self {
        Self::Small
    }
}

/// A tag describing what an item is, checked by slot whitelists/blacklists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemTrait(pub String);

impl ItemTrait {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemTrait {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Storage-relevant description of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub name: String,
    #[serde(default)]
    pub size: ItemSize,
    #[serde(default)]
    pub traits: BTreeSet<ItemTrait>,
}

impl ItemAttributes {
    pub fn new(name: impl Into<String>, size: ItemSize) -> Self {
        Self {
            name: name.into(),
            size,
            traits: BTreeSet::new(),
        }
    }

    pub fn with_trait(mut self, item_trait: impl Into<ItemTrait>) -> Self {
        self.traits.insert(item_trait.into());
        self
    }

    pub fn has_trait(&self, item_trait: &ItemTrait) -> bool {
        self.traits.contains(item_trait)
    }
}
