//! Declarative initial contents for a storage.
//!
//! A [`Loadout`] lists items to place when a storage is first populated.
//! Entries may name a container structure and carry a nested loadout, so a
//! crew member can spawn wearing a backpack that already holds a toolbox.

use serde::{Deserialize, Serialize};

use crate::catalog::StructureCatalog;
use crate::item::ItemAttributes;
use crate::slot_id::SlotIdentifier;

fn always() -> f32 {
    1.0
}

/// One item to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutEntry {
    /// Target slot. `None` means the first empty slot that fits.
    #[serde(default)]
    pub slot: Option<SlotIdentifier>,
    pub item: ItemAttributes,
    /// Catalog structure name if this item is itself a container.
    #[serde(default)]
    pub structure: Option<String>,
    /// Contents of the container, populated after it is placed.
    #[serde(default)]
    pub contents: Option<Loadout>,
    /// Spawn probability in `[0, 1]`.
    #[serde(default = "always")]
    pub chance: f32,
}

impl LoadoutEntry {
    pub fn new(item: ItemAttributes) -> Self {
        Self {
            slot: None,
            item,
            structure: None,
            contents: None,
            chance: 1.0,
        }
    }

    pub fn in_slot(mut self, slot: impl Into<SlotIdentifier>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    pub fn as_container(mut self, structure: impl Into<String>, contents: Option<Loadout>) -> Self {
        self.structure = Some(structure.into());
        self.contents = contents;
        self
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }
}

/// Named list of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LoadoutEntry>,
}

impl Loadout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: LoadoutEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Total entries including nested loadouts.
    pub fn total_entries(&self) -> usize {
        self.entries
            .iter()
            .map(|e| 1 + e.contents.as_ref().map_or(0, Loadout::total_entries))
            .sum()
    }
}

/// Loadout validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadoutError {
    /// Chance outside `[0, 1]`.
    InvalidChance { item: String, chance: f32 },
    /// Entry names a structure the catalog does not have.
    UnknownStructure { item: String, structure: String },
    /// Entry has contents but is not a container.
    ContentsWithoutStructure(String),
}

/// Validate a loadout (recursively) against a catalog, returning all errors found.
pub fn validate_loadout(loadout: &Loadout, catalog: &StructureCatalog) -> Vec<LoadoutError> {
    let mut errors = Vec::new();
    for entry in &loadout.entries {
        if !(0.0..=1.0).contains(&entry.chance) {
            errors.push(LoadoutError::InvalidChance {
                item: entry.item.name.clone(),
                chance: entry.chance,
            });
        }
        match (&entry.structure, &entry.contents) {
            (Some(structure), contents) => {
                if catalog.get(structure).is_none() {
                    errors.push(LoadoutError::UnknownStructure {
                        item: entry.item.name.clone(),
                        structure: structure.clone(),
                    });
                }
                if let Some(contents) = contents {
                    errors.extend(validate_loadout(contents, catalog));
                }
            }
            (None, Some(_)) => {
                errors.push(LoadoutError::ContentsWithoutStructure(entry.item.name.clone()));
            }
            (None, None) => {}
        }
    }
    errors
}
