//! Stowage Core - hierarchical slot storage engine
//!
//! Items, players and viewers are `hecs` entities. Any entity may host an
//! [`ItemStorage`](storage::ItemStorage): a fixed set of slots declared by a
//! [`StorageStructure`](stowage_logic::structure::StorageStructure). An item
//! sitting in a slot may host a storage of its own, so storages form trees
//! (a backpack on a crew member, a toolbox in the backpack).
//!
//! # Architecture
//!
//! - **[`Inventory`](inventory::Inventory)**: the single authority. Every
//!   mutation goes through it, and it queues one notification per observer
//!   per slot change in its outbox.
//! - **[`StorageRegistry`](storage::StorageRegistry)**: explicit lookup from
//!   host entity to storage and from item to the slot that holds it.
//! - **Observers**: per-slot subscriber sets. Root holders observe their
//!   whole tree; ownership transfers move that observation along.
//!
//! # Example
//!
//! ```rust
//! use stowage_core::prelude::*;
//! use stowage_logic::item::{ItemAttributes, ItemSize};
//! use stowage_logic::slot_id::NamedSlot;
//! use stowage_logic::structure::presets;
//!
//! let mut inventory = Inventory::new();
//! let crew = inventory.spawn_holder("Engineer");
//! inventory.initialize_storage(crew, &presets::human()).unwrap();
//!
//! let wrench = inventory.spawn_item(ItemAttributes::new("wrench", ItemSize::Small));
//! let hand = SlotRef::new(crew, NamedSlot::LeftHand);
//! inventory.transfer(wrench, hand).unwrap();
//!
//! assert_eq!(inventory.slot(&hand).and_then(|s| s.occupant()), Some(wrench));
//! ```

pub mod components;
pub mod error;
pub mod inventory;
pub mod ownership;
pub mod persistence;
pub mod populate;
pub mod storage;
pub mod transport;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::error::SlotError;
    pub use crate::inventory::Inventory;
    pub use crate::ownership::OwnershipTransfer;
    pub use crate::populate::{LoadoutPopulator, PopulationContext, PopulationFailure, Populator};
    pub use crate::storage::{ItemStorage, Slot, SlotRef, StorageState};
    pub use crate::transport::{OccupantSummary, SlotUpdate, SlotUpdateSink, UpdateLog};
}
