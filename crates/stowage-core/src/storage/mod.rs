//! Storage model: slots, per-host storages, the registry tying them
//! together, and tree traversal.

mod item_storage;
mod registry;
mod slot;
mod tree;

pub use item_storage::*;
pub use registry::*;
pub use slot::*;
pub use tree::*;
