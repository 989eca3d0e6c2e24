//! Component definitions for the ECS world.
//!
//! Components are pure data structs attached to entities.
//! Storage itself is not a component; it lives in the registry.

mod common;
mod item;

pub use common::*;
pub use item::*;
