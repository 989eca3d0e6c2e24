//! Named storage structures loaded from data.
//!
//! The catalog is the explicit lookup object for structures: whoever needs
//! "the backpack shape" receives a catalog reference instead of reaching
//! into global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::structure::{presets, validate_structure, StorageStructure, StructureError};

/// Errors from loading or extending a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("structure {name:?} is invalid: {errors:?}")]
    Invalid {
        name: String,
        errors: Vec<StructureError>,
    },
    #[error("structure {0:?} defined twice")]
    Duplicate(String),
}

/// A set of uniquely named structures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureCatalog {
    structures: Vec<StorageStructure>,
}

impl StructureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in presets.
    pub fn with_presets() -> Self {
        Self {
            structures: vec![
                presets::human(),
                presets::backpack(7),
                presets::pouch(4),
                presets::locker(20),
            ],
        }
    }

    /// Parse a JSON array of structures, validating each one.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let structures: Vec<StorageStructure> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for structure in structures {
            catalog.insert(structure)?;
        }
        Ok(catalog)
    }

    /// Add a structure. Rejects invalid structures and duplicate names.
    pub fn insert(&mut self, structure: StorageStructure) -> Result<(), CatalogError> {
        let errors = validate_structure(&structure);
        if !errors.is_empty() {
            return Err(CatalogError::Invalid {
                name: structure.name,
                errors,
            });
        }
        if self.get(&structure.name).is_some() {
            return Err(CatalogError::Duplicate(structure.name));
        }
        self.structures.push(structure);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StorageStructure> {
        self.structures.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.structures.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
