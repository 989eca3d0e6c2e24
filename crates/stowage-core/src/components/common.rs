//! Common components used across multiple entity types.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marker: this entity can observe slots (a player connection, a UI view).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observer;

/// Handle identifying a slot subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(pub Entity);

impl ObserverHandle {
    pub fn entity(self) -> Entity {
        self.0
    }
}

impl From<Entity> for ObserverHandle {
    fn from(entity: Entity) -> Self {
        Self(entity)
    }
}
