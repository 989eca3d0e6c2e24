//! Item components.

use serde::{Deserialize, Serialize};
use stowage_logic::item::{ItemAttributes, ItemSize};

/// Marks an entity as a storable item and carries its fit-relevant attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub attributes: ItemAttributes,
}

impl Item {
    pub fn new(attributes: ItemAttributes) -> Self {
        Self { attributes }
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn size(&self) -> ItemSize {
        self.attributes.size
    }
}
