//! The storage owned by one host entity.

use std::collections::HashMap;

use hecs::Entity;
use stowage_logic::slot_id::SlotIdentifier;
use stowage_logic::structure::StorageStructure;

use super::slot::{Slot, SlotRef};

/// Lifecycle of a storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageState {
    Uninitialized,
    Initialized,
    Destroyed,
}

/// One slot per identifier declared by the structure, in declaration order.
///
/// Slot access is only meaningful while [`StorageState::Initialized`].
/// Calling [`slots`](Self::slots), [`get_slot`](Self::get_slot) or
/// [`structure`](Self::structure) in any other state is a lifecycle bug in
/// the caller and panics.
#[derive(Debug, Clone)]
pub struct ItemStorage {
    host: Entity,
    state: StorageState,
    structure: Option<StorageStructure>,
    slots: Vec<Slot>,
    index: HashMap<SlotIdentifier, usize>,
}

impl ItemStorage {
    pub fn new(host: Entity) -> Self {
        Self {
            host,
            state: StorageState::Uninitialized,
            structure: None,
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build one empty slot per declared identifier.
    ///
    /// # Panics
    ///
    /// If the storage was already initialized or destroyed.
    pub fn initialize(&mut self, structure: &StorageStructure) {
        assert_eq!(
            self.state,
            StorageState::Uninitialized,
            "storage of {:?} initialized twice",
            self.host
        );
        for id in structure.declared_identifiers() {
            self.index.insert(id, self.slots.len());
            self.slots.push(Slot::new(
                SlotRef::new(self.host, id),
                structure.capacity_for(&id).clone(),
            ));
        }
        self.structure = Some(structure.clone());
        self.state = StorageState::Initialized;
    }

    pub fn host(&self) -> Entity {
        self.host
    }

    pub fn state(&self) -> StorageState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == StorageState::Initialized
    }

    pub fn structure(&self) -> &StorageStructure {
        self.assert_initialized();
        match &self.structure {
            Some(structure) => structure,
            None => unreachable!("initialized storage always has a structure"),
        }
    }

    /// `None` when the structure does not declare `id`.
    pub fn get_slot(&self, id: &SlotIdentifier) -> Option<&Slot> {
        self.assert_initialized();
        self.index.get(id).map(|&i| &self.slots[i])
    }

    pub(crate) fn get_slot_mut(&mut self, id: &SlotIdentifier) -> Option<&mut Slot> {
        self.assert_initialized();
        let i = *self.index.get(id)?;
        Some(&mut self.slots[i])
    }

    /// Slots owned directly by this storage (no recursion).
    pub fn slots(&self) -> std::slice::Iter<'_, Slot> {
        self.assert_initialized();
        self.slots.iter()
    }

    pub(crate) fn slots_mut(&mut self) -> std::slice::IterMut<'_, Slot> {
        self.assert_initialized();
        self.slots.iter_mut()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Occupants of the direct slots.
    pub fn occupants(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots().filter_map(Slot::occupant)
    }

    /// Release every slot. Calling this again does nothing.
    pub fn destroy(&mut self) {
        if self.state == StorageState::Destroyed {
            return;
        }
        self.slots.clear();
        self.index.clear();
        self.structure = None;
        self.state = StorageState::Destroyed;
    }

    fn assert_initialized(&self) {
        assert!(
            self.state == StorageState::Initialized,
            "storage of {:?} accessed while {:?}",
            self.host,
            self.state
        );
    }
}
