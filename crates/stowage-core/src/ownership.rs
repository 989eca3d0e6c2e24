//! Root ownership and tree-wide observation.
//!
//! The root owner of a storage is the top-level entity that ultimately
//! contains it: the crew member wearing the backpack that holds the toolbox.
//! Root owners observe every slot in their tree. When a container changes
//! root (picked up, handed over, dropped), observation of its whole subtree
//! moves from the old root to the new one in a single pass. Individual
//! mutations inside the tree never touch observer sets.

use hecs::Entity;

use crate::components::ObserverHandle;
use crate::error::SlotError;
use crate::inventory::Inventory;
use crate::storage::{Slot, SlotRef};

/// Outcome of a move: which root held the item before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTransfer {
    pub item: Entity,
    pub previous_root: Entity,
    pub new_root: Entity,
}

impl OwnershipTransfer {
    pub fn changed_hands(&self) -> bool {
        self.previous_root != self.new_root
    }
}

impl Inventory {
    /// Subscribe `observer` to every slot in `host`'s tree, nested storages
    /// included. Returns how many slots gained the observer.
    pub fn add_observer_to_tree(
        &mut self,
        host: Entity,
        observer: ObserverHandle,
    ) -> Result<usize, SlotError> {
        if !self.storages.contains(host) {
            return Err(SlotError::NoStorage(host));
        }
        if !self.world.contains(observer.entity()) {
            return Err(SlotError::NoSuchEntity(observer.entity()));
        }
        Ok(self.observe_tree(host, observer))
    }

    /// Unsubscribe `observer` from every slot in `host`'s tree. Returns how
    /// many slots lost the observer.
    pub fn remove_observer_from_tree(
        &mut self,
        host: Entity,
        observer: ObserverHandle,
    ) -> Result<usize, SlotError> {
        if !self.storages.contains(host) {
            return Err(SlotError::NoStorage(host));
        }
        Ok(self.unobserve_tree(host, observer))
    }

    /// Move tree observation of `host` from `previous` to `new`.
    ///
    /// Roots that are not observer-capable (a loose bag on the floor, a
    /// locker) are skipped. Equal roots do nothing.
    pub fn on_root_ownership_changed(
        &mut self,
        host: Entity,
        previous: Option<Entity>,
        new: Option<Entity>,
    ) -> Result<(), SlotError> {
        if !self.storages.contains(host) {
            return Err(SlotError::NoStorage(host));
        }
        if previous == new {
            return Ok(());
        }
        let leaving = previous.filter(|&e| self.is_observer_capable(e));
        let arriving = new.filter(|&e| self.is_observer_capable(e));
        if let Some(leaving) = leaving {
            let removed = self.unobserve_tree(host, ObserverHandle(leaving));
            log::debug!("{:?} stopped observing {} slot(s) of {:?}", leaving, removed, host);
        }
        if let Some(arriving) = arriving {
            let added = self.observe_tree(host, ObserverHandle(arriving));
            log::debug!("{:?} now observes {} slot(s) of {:?}", arriving, added, host);
        }
        log::info!("{:?} root owner {:?} -> {:?}", host, previous, new);
        Ok(())
    }

    /// Root change for a host known to have a storage.
    pub(crate) fn hand_over(&mut self, host: Entity, previous: Entity, new: Entity) {
        if let Err(e) = self.on_root_ownership_changed(host, Some(previous), Some(new)) {
            log::error!("ownership hand-over of {:?} failed: {}", host, e);
        }
    }

    pub(crate) fn observe_tree(&mut self, host: Entity, observer: ObserverHandle) -> usize {
        let mut added = 0;
        for slot in self.tree_refs(host) {
            if let Some(slot) = self.storages.slot_mut(&slot) {
                if slot.add_observer(observer, &mut self.outbox) {
                    added += 1;
                }
            }
        }
        added
    }

    pub(crate) fn unobserve_tree(&mut self, host: Entity, observer: ObserverHandle) -> usize {
        let mut removed = 0;
        for slot in self.tree_refs(host) {
            if let Some(slot) = self.storages.slot_mut(&slot) {
                if slot.remove_observer(observer) {
                    removed += 1;
                }
            }
        }
        removed
    }

    fn tree_refs(&self, host: Entity) -> Vec<SlotRef> {
        self.storages.slot_tree(host).map(Slot::slot_ref).collect()
    }
}
