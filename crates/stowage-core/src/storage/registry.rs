//! Explicit registry of storages and item locations.
//!
//! Two maps, kept consistent by [`Inventory`](crate::inventory::Inventory):
//! host entity to its storage, and stored item to the slot holding it. The
//! second map is what makes "an item sits in at most one slot" checkable and
//! lets root ownership and cycle checks walk upward without scanning.

use std::collections::HashMap;

use hecs::Entity;

use super::item_storage::ItemStorage;
use super::slot::{Slot, SlotRef};
use super::tree::SlotTree;

#[derive(Debug, Clone)]
pub struct StorageRegistry {
    storages: HashMap<Entity, ItemStorage>,
    locations: HashMap<Entity, SlotRef>,
    max_depth: usize,
}

impl StorageRegistry {
    pub fn new(max_depth: usize) -> Self {
        Self {
            storages: HashMap::new(),
            locations: HashMap::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn get(&self, host: Entity) -> Option<&ItemStorage> {
        self.storages.get(&host)
    }

    pub(crate) fn get_mut(&mut self, host: Entity) -> Option<&mut ItemStorage> {
        self.storages.get_mut(&host)
    }

    pub fn contains(&self, host: Entity) -> bool {
        self.storages.contains_key(&host)
    }

    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    pub fn hosts(&self) -> impl Iterator<Item = Entity> + '_ {
        self.storages.keys().copied()
    }

    pub(crate) fn insert(&mut self, storage: ItemStorage) {
        self.storages.insert(storage.host(), storage);
    }

    pub(crate) fn remove(&mut self, host: Entity) -> Option<ItemStorage> {
        self.storages.remove(&host)
    }

    pub fn slot(&self, slot: &SlotRef) -> Option<&Slot> {
        self.get(slot.host)?.get_slot(&slot.id)
    }

    pub(crate) fn slot_mut(&mut self, slot: &SlotRef) -> Option<&mut Slot> {
        self.get_mut(slot.host)?.get_slot_mut(&slot.id)
    }

    pub(crate) fn storages_mut(&mut self) -> impl Iterator<Item = &mut ItemStorage> {
        self.storages.values_mut()
    }

    /// Slot currently holding `item`.
    pub fn location_of(&self, item: Entity) -> Option<SlotRef> {
        self.locations.get(&item).copied()
    }

    pub(crate) fn set_location(&mut self, item: Entity, slot: SlotRef) {
        self.locations.insert(item, slot);
    }

    pub(crate) fn clear_location(&mut self, item: Entity) {
        self.locations.remove(&item);
    }

    /// Post-order walk of `host`'s storage tree; empty if `host` has no storage.
    pub fn slot_tree(&self, host: Entity) -> SlotTree<'_> {
        match self.get(host) {
            Some(storage) => SlotTree::new(self, storage.slots()),
            None => SlotTree::empty(self),
        }
    }

    /// Entities containing `entity`, innermost first.
    pub fn ancestors(&self, entity: Entity) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            current: entity,
            remaining: self.locations.len(),
        }
    }

    /// Top-level entity that ultimately contains `entity` (itself if loose).
    pub fn root_owner(&self, entity: Entity) -> Entity {
        self.ancestors(entity).last().unwrap_or(entity)
    }

    /// Whether placing `item` into a slot of `host` would put `item` inside itself.
    pub fn would_contain_itself(&self, item: Entity, host: Entity) -> bool {
        host == item || self.ancestors(host).any(|a| a == item)
    }

    /// Storage levels at and below `entity`: 0 without storage, otherwise one
    /// more than its deepest stored container.
    pub fn storage_levels(&self, entity: Entity) -> usize {
        self.levels_bounded(entity, self.max_depth + 1)
    }

    fn levels_bounded(&self, entity: Entity, budget: usize) -> usize {
        let Some(storage) = self.get(entity) else {
            return 0;
        };
        if budget == 0 {
            return 1;
        }
        1 + storage
            .occupants()
            .map(|occupant| self.levels_bounded(occupant, budget - 1))
            .max()
            .unwrap_or(0)
    }
}

/// Upward walk through the containment chain.
pub struct Ancestors<'a> {
    registry: &'a StorageRegistry,
    current: Entity,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = self.registry.location_of(self.current)?;
        self.current = slot.host;
        Some(slot.host)
    }
}
