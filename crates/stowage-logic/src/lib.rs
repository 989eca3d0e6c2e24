//! Pure item-storage rules for Stowage.
//!
//! This crate holds everything about storage that is independent of the
//! entity runtime: how slots are named, what fits where, which slots a
//! container declares, and how initial contents are described. Types here
//! are plain data, serializable with serde, and unit-testable without a
//! world.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`capacity`] | Per-slot fit constraints (max size, trait whitelist/blacklist) |
//! | [`catalog`] | Named storage structures loaded from JSON |
//! | [`config`] | Runtime knobs for the storage engine |
//! | [`item`] | Item size classes, traits and attributes |
//! | [`loadout`] | Declarative initial contents for a storage |
//! | [`slot_id`] | Slot identifiers: named roles and positional indexes |
//! | [`structure`] | Storage shapes (declared slot identifiers) and validation |

pub mod capacity;
pub mod catalog;
pub mod config;
pub mod item;
pub mod loadout;
pub mod slot_id;
pub mod structure;
