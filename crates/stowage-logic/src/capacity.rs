//! Per-slot fit constraints.
//!
//! A [`SlotCapacity`] answers whether an item may go into a slot ignoring
//! occupancy. Occupancy is the slot's concern; [`FitFailure::Occupied`] lives
//! here so callers get one reason type for every rejection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{ItemAttributes, ItemSize, ItemTrait};

/// Why an item could not be placed into a slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitFailure {
    #[error("slot is already occupied")]
    Occupied,
    #[error("item size {size:?} exceeds slot maximum {max:?}")]
    TooLarge { size: ItemSize, max: ItemSize },
    #[error("item lacks every trait the slot accepts")]
    MissingTrait,
    #[error("item has forbidden trait {0:?}")]
    ForbiddenTrait(ItemTrait),
}

/// Fit constraints for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCapacity {
    /// Largest item size the slot accepts.
    pub max_size: ItemSize,
    /// If non-empty, the item must carry at least one of these traits.
    #[serde(default)]
    pub required_traits: Vec<ItemTrait>,
    /// The item must carry none of these traits.
    #[serde(default)]
    pub forbidden_traits: Vec<ItemTrait>,
}

impl Default for SlotCapacity {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl SlotCapacity {
    /// Accepts anything.
    pub fn unrestricted() -> Self {
        Self {
            max_size: ItemSize::Huge,
            required_traits: Vec::new(),
            forbidden_traits: Vec::new(),
        }
    }

    pub fn up_to(max_size: ItemSize) -> Self {
        Self {
            max_size,
            ..Self::unrestricted()
        }
    }

    pub fn requiring(mut self, item_trait: impl Into<ItemTrait>) -> Self {
        self.required_traits.push(item_trait.into());
        self
    }

    pub fn forbidding(mut self, item_trait: impl Into<ItemTrait>) -> Self {
        self.forbidden_traits.push(item_trait.into());
        self
    }

    /// Check the item against these constraints.
    pub fn check(&self, item: &ItemAttributes) -> Result<(), FitFailure> {
        if item.size > self.max_size {
            return Err(FitFailure::TooLarge {
                size: item.size,
                max: self.max_size,
            });
        }
        if let Some(bad) = self.forbidden_traits.iter().find(|t| item.has_trait(t)) {
            return Err(FitFailure::ForbiddenTrait(bad.clone()));
        }
        if !self.required_traits.is_empty()
            && !self.required_traits.iter().any(|t| item.has_trait(t))
        {
            return Err(FitFailure::MissingTrait);
        }
        Ok(())
    }

    pub fn accepts(&self, item: &ItemAttributes) -> bool {
        self.check(item).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolbox() -> ItemAttributes {
        ItemAttributes::new("toolbox", ItemSize::Large).with_trait("container")
    }

    #[test]
    fn unrestricted_accepts_anything() {
        assert!(SlotCapacity::unrestricted().accepts(&toolbox()));
    }

    #[test]
    fn size_limit() {
        let pocket = SlotCapacity::up_to(ItemSize::Small);
        assert_eq!(
            pocket.check(&toolbox()),
            Err(FitFailure::TooLarge {
                size: ItemSize::Large,
                max: ItemSize::Small
            })
        );
        assert!(pocket.accepts(&ItemAttributes::new("pen", ItemSize::Tiny)));
    }

    #[test]
    fn whitelist_is_any_of() {
        let id_slot = SlotCapacity::up_to(ItemSize::Small)
            .requiring("id_card")
            .requiring("pda");
        let pda = ItemAttributes::new("PDA", ItemSize::Small).with_trait("pda");
        assert!(id_slot.accepts(&pda));
        let pen = ItemAttributes::new("pen", ItemSize::Tiny);
        assert_eq!(id_slot.check(&pen), Err(FitFailure::MissingTrait));
    }

    #[test]
    fn blacklist_wins() {
        let bag_slot = SlotCapacity::up_to(ItemSize::Large).forbidding("container");
        assert_eq!(
            bag_slot.check(&toolbox()),
            Err(FitFailure::ForbiddenTrait(ItemTrait::new("container")))
        );
    }
}
