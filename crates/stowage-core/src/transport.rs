//! Outbound slot notifications.
//!
//! The engine never talks to the network itself. Every notification is
//! handed to a [`SlotUpdateSink`]; the inventory's own sink is an
//! [`UpdateLog`] outbox that the transport drains after each mutation, so
//! delivery order per slot always equals mutation order.

use hecs::Entity;
use stowage_logic::item::ItemSize;

use crate::components::ObserverHandle;
use crate::storage::SlotRef;

/// What observers learn about a slot's occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantSummary {
    pub entity: Entity,
    pub name: String,
    pub size: ItemSize,
}

/// One notification: `observer` must now see `occupant` in `slot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub observer: ObserverHandle,
    pub slot: SlotRef,
    pub occupant: Option<OccupantSummary>,
}

/// Receiver of slot notifications (a transport, a UI binding, a test log).
pub trait SlotUpdateSink {
    fn broadcast_slot_update(
        &mut self,
        observer: ObserverHandle,
        slot: SlotRef,
        occupant: Option<&OccupantSummary>,
    );
}

/// In-order queue of pending notifications.
#[derive(Debug, Clone, Default)]
pub struct UpdateLog {
    updates: Vec<SlotUpdate>,
}

impl UpdateLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[SlotUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Updates addressed to one observer, oldest first.
    pub fn for_observer(&self, observer: ObserverHandle) -> impl Iterator<Item = &SlotUpdate> {
        self.updates.iter().filter(move |u| u.observer == observer)
    }

    pub fn drain(&mut self) -> Vec<SlotUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Hand every queued update to `sink`, oldest first. Returns how many.
    pub fn flush_to(&mut self, sink: &mut dyn SlotUpdateSink) -> usize {
        let updates = self.drain();
        for update in &updates {
            sink.broadcast_slot_update(update.observer, update.slot, update.occupant.as_ref());
        }
        updates.len()
    }
}

impl SlotUpdateSink for UpdateLog {
    fn broadcast_slot_update(
        &mut self,
        observer: ObserverHandle,
        slot: SlotRef,
        occupant: Option<&OccupantSummary>,
    ) {
        self.updates.push(SlotUpdate {
            observer,
            slot,
            occupant: occupant.cloned(),
        });
    }
}
