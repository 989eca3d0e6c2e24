//! Errors returned by storage mutations.
//!
//! All of these are ordinary outcomes of interactive play (an item that does
//! not fit, a slot the container does not have) and are returned as values.
//! Lifecycle misuse of a standalone [`ItemStorage`](crate::storage::ItemStorage)
//! panics instead; see its docs.

use hecs::Entity;
use stowage_logic::capacity::FitFailure;
use thiserror::Error;

use crate::storage::SlotRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Item violates the slot's constraints or the slot is occupied.
    #[error("{slot} rejected item: {reason}")]
    Rejected { slot: SlotRef, reason: FitFailure },

    /// Item would end up (transitively) inside its own storage.
    #[error("placing {item:?} into {slot} would make it contain itself")]
    CyclicContainment { item: Entity, slot: SlotRef },

    /// Storage tree would nest deeper than the configured maximum.
    #[error("nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// Slot not declared by the host's storage structure.
    #[error("no slot {0}")]
    UnknownSlot(SlotRef),

    #[error("entity {0:?} has no storage")]
    NoStorage(Entity),

    #[error("entity {0:?} already has a storage")]
    StorageExists(Entity),

    #[error("entity {0:?} is not an item")]
    NotAnItem(Entity),

    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("unknown storage structure {0:?}")]
    UnknownStructure(String),

    /// No empty slot in the storage accepts the item.
    #[error("no free slot in {0:?} fits the item")]
    NoFreeSlot(Entity),
}
