//! A single-occupant slot with its observer set.

use std::collections::BTreeSet;
use std::fmt;

use hecs::Entity;
use stowage_logic::capacity::{FitFailure, SlotCapacity};
use stowage_logic::item::ItemAttributes;
use stowage_logic::slot_id::SlotIdentifier;

use crate::components::ObserverHandle;
use crate::error::SlotError;
use crate::transport::{OccupantSummary, SlotUpdateSink};

/// Address of a slot: the entity hosting the storage plus the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotRef {
    pub host: Entity,
    pub id: SlotIdentifier,
}

impl SlotRef {
    pub fn new(host: Entity, id: impl Into<SlotIdentifier>) -> Self {
        Self {
            host,
            id: id.into(),
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.host, self.id)
    }
}

/// Holds at most one item and notifies its observers whenever that changes.
#[derive(Debug, Clone)]
pub struct Slot {
    slot_ref: SlotRef,
    capacity: SlotCapacity,
    occupant: Option<OccupantSummary>,
    observers: BTreeSet<ObserverHandle>,
}

impl Slot {
    pub(crate) fn new(slot_ref: SlotRef, capacity: SlotCapacity) -> Self {
        Self {
            slot_ref,
            capacity,
            occupant: None,
            observers: BTreeSet::new(),
        }
    }

    pub fn slot_ref(&self) -> SlotRef {
        self.slot_ref
    }

    pub fn id(&self) -> SlotIdentifier {
        self.slot_ref.id
    }

    /// Entity whose storage owns this slot.
    pub fn host(&self) -> Entity {
        self.slot_ref.host
    }

    pub fn capacity(&self) -> &SlotCapacity {
        &self.capacity
    }

    pub fn occupant(&self) -> Option<Entity> {
        self.occupant.as_ref().map(|o| o.entity)
    }

    pub fn occupant_summary(&self) -> Option<&OccupantSummary> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn observers(&self) -> impl Iterator<Item = ObserverHandle> + '_ {
        self.observers.iter().copied()
    }

    pub fn is_observed_by(&self, observer: ObserverHandle) -> bool {
        self.observers.contains(&observer)
    }

    /// Why `item` cannot go here right now, if it cannot.
    pub fn fit(&self, item: &ItemAttributes) -> Result<(), FitFailure> {
        if self.occupant.is_some() {
            return Err(FitFailure::Occupied);
        }
        self.capacity.check(item)
    }

    pub fn can_fit(&self, item: &ItemAttributes) -> bool {
        self.fit(item).is_ok()
    }

    /// Replace the occupant and notify every observer once.
    ///
    /// `Some` must fit (empty slot, constraints met) or the call is rejected
    /// without touching the slot or notifying anyone. `None` always succeeds.
    /// Returns the previous occupant.
    pub(crate) fn set_occupant(
        &mut self,
        item: Option<(Entity, &ItemAttributes)>,
        sink: &mut dyn SlotUpdateSink,
    ) -> Result<Option<Entity>, SlotError> {
        let Some((entity, attributes)) = item else {
            return Ok(self.take(sink));
        };
        self.fit(attributes).map_err(|reason| SlotError::Rejected {
            slot: self.slot_ref,
            reason,
        })?;
        let previous = self.occupant.replace(OccupantSummary {
            entity,
            name: attributes.name.clone(),
            size: attributes.size,
        });
        self.notify_all(sink);
        Ok(previous.map(|o| o.entity))
    }

    /// Empty the slot and notify every observer once.
    pub(crate) fn take(&mut self, sink: &mut dyn SlotUpdateSink) -> Option<Entity> {
        let previous = self.occupant.take();
        self.notify_all(sink);
        previous.map(|o| o.entity)
    }

    /// Put an occupant back without notifying anyone. Used when restoring saves.
    pub(crate) fn restore_occupant(&mut self, occupant: OccupantSummary) {
        self.occupant = Some(occupant);
    }

    pub(crate) fn restore_observer(&mut self, observer: ObserverHandle) {
        self.observers.insert(observer);
    }

    /// Subscribe `observer`. A new subscriber immediately receives the
    /// current contents; adding an existing subscriber does nothing.
    pub fn add_observer(
        &mut self,
        observer: ObserverHandle,
        sink: &mut dyn SlotUpdateSink,
    ) -> bool {
        if !self.observers.insert(observer) {
            return false;
        }
        sink.broadcast_slot_update(observer, self.slot_ref, self.occupant.as_ref());
        true
    }

    /// Unsubscribe `observer`. Returns whether it was subscribed.
    pub fn remove_observer(&mut self, observer: ObserverHandle) -> bool {
        self.observers.remove(&observer)
    }

    pub(crate) fn clear_observers(&mut self) {
        self.observers.clear();
    }

    fn notify_all(&self, sink: &mut dyn SlotUpdateSink) {
        for observer in &self.observers {
            sink.broadcast_slot_update(*observer, self.slot_ref, self.occupant.as_ref());
        }
        log::debug!(
            "{} now holds {:?}, notified {} observer(s)",
            self.slot_ref,
            self.occupant.as_ref().map(|o| o.name.as_str()),
            self.observers.len()
        );
    }
}
