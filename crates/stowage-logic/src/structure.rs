//! Storage structures: which slots a storage declares.
//!
//! A [`StorageStructure`] is configuration. It names a shape ("backpack",
//! "human") and lists the slot identifiers every storage of that shape must
//! have, plus the fit constraints for each slot.
//!
//! # Declaration Order
//!
//! Indexed slots come first, `#0` through `#n-1`, then named slots in the
//! order they were declared. Duplicated named slots are dropped after their
//! first occurrence, so the sequence is always unique.
//!
//! ```
//! use stowage_logic::slot_id::{NamedSlot, SlotIdentifier};
//! use stowage_logic::structure::StorageStructure;
//!
//! let belt = StorageStructure::new("utility belt")
//!     .with_indexed_slots(2)
//!     .with_named_slot(NamedSlot::SuitStorage);
//! let ids: Vec<_> = belt.declared_identifiers().collect();
//! assert_eq!(
//!     ids,
//!     vec![
//!         SlotIdentifier::indexed(0),
//!         SlotIdentifier::indexed(1),
//!         SlotIdentifier::named(NamedSlot::SuitStorage),
//!     ]
//! );
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::capacity::SlotCapacity;
use crate::item::ItemSize;
use crate::slot_id::{NamedSlot, SlotIdentifier};

/// Upper bound on indexed slots a single structure may declare.
pub const MAX_INDEXED_SLOTS: u32 = 256;

/// Capacity override for one declared slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOverride {
    pub slot: SlotIdentifier,
    pub capacity: SlotCapacity,
}

/// Declared shape of a storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStructure {
    pub name: String,
    /// Number of positional slots, `#0..#indexed_slots`.
    #[serde(default)]
    pub indexed_slots: u32,
    /// Named roles, in declaration order.
    #[serde(default)]
    pub named_slots: Vec<NamedSlot>,
    /// Capacity applied to every slot without an override.
    #[serde(default)]
    pub default_capacity: SlotCapacity,
    #[serde(default)]
    pub overrides: Vec<SlotOverride>,
}

impl StorageStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexed_slots: 0,
            named_slots: Vec::new(),
            default_capacity: SlotCapacity::unrestricted(),
            overrides: Vec::new(),
        }
    }

    pub fn with_indexed_slots(mut self, count: u32) -> Self {
        self.indexed_slots = count;
        self
    }

    pub fn with_named_slot(mut self, slot: NamedSlot) -> Self {
        self.named_slots.push(slot);
        self
    }

    pub fn with_default_capacity(mut self, capacity: SlotCapacity) -> Self {
        self.default_capacity = capacity;
        self
    }

    pub fn with_override(
        mut self,
        slot: impl Into<SlotIdentifier>,
        capacity: SlotCapacity,
    ) -> Self {
        self.overrides.push(SlotOverride {
            slot: slot.into(),
            capacity,
        });
        self
    }

    /// Every slot identifier this structure declares, in declaration order.
    pub fn declared_identifiers(&self) -> impl Iterator<Item = SlotIdentifier> + '_ {
        let mut seen = HashSet::new();
        let named = self
            .named_slots
            .iter()
            .copied()
            .filter(move |slot| seen.insert(*slot))
            .map(SlotIdentifier::Named);
        (0..self.indexed_slots).map(SlotIdentifier::Indexed).chain(named)
    }

    pub fn slot_count(&self) -> usize {
        self.declared_identifiers().count()
    }

    pub fn declares(&self, id: &SlotIdentifier) -> bool {
        match id {
            SlotIdentifier::Indexed(index) => *index < self.indexed_slots,
            SlotIdentifier::Named(slot) => self.named_slots.contains(slot),
        }
    }

    /// Capacity for a declared slot. The last matching override wins.
    pub fn capacity_for(&self, id: &SlotIdentifier) -> &SlotCapacity {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.slot == *id)
            .map_or(&self.default_capacity, |o| &o.capacity)
    }
}

/// Structure validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Structure name empty.
    EmptyName,
    /// Declares no slots at all.
    NoSlots,
    /// Indexed slot count above [`MAX_INDEXED_SLOTS`].
    TooManyIndexedSlots(u32),
    /// Named slot listed more than once.
    DuplicateNamedSlot(NamedSlot),
    /// Override targets a slot the structure does not declare.
    UndeclaredOverride(SlotIdentifier),
}

/// Validate a structure, returning all errors found.
///
/// Duplicated named slots are tolerated by [`StorageStructure::declared_identifiers`]
/// but still reported here so configuration mistakes are visible.
pub fn validate_structure(structure: &StorageStructure) -> Vec<StructureError> {
    let mut errors = Vec::new();

    if structure.name.trim().is_empty() {
        errors.push(StructureError::EmptyName);
    }
    if structure.indexed_slots == 0 && structure.named_slots.is_empty() {
        errors.push(StructureError::NoSlots);
    }
    if structure.indexed_slots > MAX_INDEXED_SLOTS {
        errors.push(StructureError::TooManyIndexedSlots(structure.indexed_slots));
    }

    let mut seen = HashSet::new();
    for slot in &structure.named_slots {
        if !seen.insert(*slot) {
            errors.push(StructureError::DuplicateNamedSlot(*slot));
        }
    }

    for o in &structure.overrides {
        if !structure.declares(&o.slot) {
            errors.push(StructureError::UndeclaredOverride(o.slot));
        }
    }

    errors
}

/// Built-in structures used by tests, the harness and as catalog fallbacks.
pub mod presets {
    use super::*;

    /// A crew member: hands, worn equipment and pockets.
    pub fn human() -> StorageStructure {
        let mut s = StorageStructure::new("human");
        for slot in NamedSlot::ALL {
            s = s.with_named_slot(slot);
        }
        s.with_override(
            NamedSlot::Id,
            SlotCapacity::up_to(ItemSize::Small)
                .requiring("id_card")
                .requiring("pda"),
        )
        .with_override(NamedSlot::LeftPocket, SlotCapacity::up_to(ItemSize::Small))
        .with_override(NamedSlot::RightPocket, SlotCapacity::up_to(ItemSize::Small))
        .with_override(
            NamedSlot::Back,
            SlotCapacity::up_to(ItemSize::Large).requiring("back"),
        )
        .with_override(
            NamedSlot::Handcuffs,
            SlotCapacity::up_to(ItemSize::Small).requiring("restraint"),
        )
    }

    /// A backpack with `slots` positional slots for medium items.
    pub fn backpack(slots: u32) -> StorageStructure {
        StorageStructure::new("backpack")
            .with_indexed_slots(slots)
            .with_default_capacity(SlotCapacity::up_to(ItemSize::Medium))
    }

    /// A small box for small items that cannot hold other containers.
    pub fn pouch(slots: u32) -> StorageStructure {
        StorageStructure::new("pouch")
            .with_indexed_slots(slots)
            .with_default_capacity(SlotCapacity::up_to(ItemSize::Small).forbidding("container"))
    }

    /// A floor locker holding anything.
    pub fn locker(slots: u32) -> StorageStructure {
        StorageStructure::new("locker").with_indexed_slots(slots)
    }
}
