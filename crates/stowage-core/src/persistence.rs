//! Save/Load functionality for persisting storage state
//!
//! Uses bincode for compact binary serialization of the whole inventory.
//! Entity handles are not stable across worlds, so every reference (slot
//! occupants, observers) is written as an index into the saved entity list
//! and rebuilt on load.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use stowage_logic::catalog::StructureCatalog;
use stowage_logic::config::InventoryConfig;
use stowage_logic::slot_id::SlotIdentifier;
use stowage_logic::structure::StorageStructure;
use thiserror::Error;

use crate::components::{Item, Name, Observer, ObserverHandle};
use crate::inventory::Inventory;
use crate::storage::{ItemStorage, SlotRef};
use crate::transport::OccupantSummary;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of an inventory
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: InventoryConfig,
    /// All entities with their components and storages
    pub entities: Vec<SerializableEntity>,
}

/// All possible components for an entity, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    pub name: Option<Name>,
    pub item: Option<Item>,
    pub observer: bool,
    pub storage: Option<SerializableStorage>,
}

#[derive(Serialize, Deserialize)]
pub struct SerializableStorage {
    pub structure: StorageStructure,
    pub slots: Vec<SerializableSlot>,
}

#[derive(Serialize, Deserialize)]
pub struct SerializableSlot {
    pub id: SlotIdentifier,
    /// Index into [`SaveData::entities`]
    pub occupant: Option<u32>,
    pub observers: Vec<u32>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Save references missing entity #{0}")]
    DanglingReference(u32),
    #[error("Saved slot {0} is not declared by its structure")]
    UndeclaredSlot(SlotIdentifier),
    #[error("Saved occupant #{0} is not an item")]
    OccupantNotAnItem(u32),
    #[error("Saved entity #{0} occupies more than one slot")]
    DuplicateOccupant(u32),
    #[error("Saved entity #{0} is stored inside itself")]
    CyclicContainment(u32),
    #[error("Saved storage of entity #{index} is nested {depth} deep, maximum {max}")]
    NestingTooDeep { index: u32, depth: usize, max: usize },
}

/// Extract every entity from the inventory into serializable form
fn serialize_entities(inventory: &Inventory) -> Vec<SerializableEntity> {
    let world = &inventory.world;
    let order: Vec<Entity> = world.iter().map(|e| e.entity()).collect();
    let index: HashMap<Entity, u32> = order
        .iter()
        .enumerate()
        .map(|(i, e)| (*e, i as u32))
        .collect();

    let mut entities = Vec::with_capacity(order.len());
    for entity in order {
        let mut se = SerializableEntity::default();
        if let Ok(c) = world.get::<&Name>(entity) {
            se.name = Some((*c).clone());
        }
        if let Ok(c) = world.get::<&Item>(entity) {
            se.item = Some((*c).clone());
        }
        se.observer = world.get::<&Observer>(entity).is_ok();

        if let Some(storage) = inventory.storages.get(entity) {
            let slots = storage
                .slots()
                .map(|slot| SerializableSlot {
                    id: slot.id(),
                    occupant: slot.occupant().and_then(|o| index.get(&o).copied()),
                    observers: slot
                        .observers()
                        .filter_map(|h| index.get(&h.entity()).copied())
                        .collect(),
                })
                .collect();
            se.storage = Some(SerializableStorage {
                structure: storage.structure().clone(),
                slots,
            });
        }

        entities.push(se);
    }
    entities
}

/// Rebuild an inventory from serialized entities
fn deserialize_entities(
    inventory: &mut Inventory,
    entities: Vec<SerializableEntity>,
) -> Result<(), SaveError> {
    let spawned: Vec<Entity> = entities
        .iter()
        .map(|se| spawn_entity(&mut inventory.world, se))
        .collect();
    let resolve = |i: u32| {
        spawned
            .get(i as usize)
            .copied()
            .ok_or(SaveError::DanglingReference(i))
    };

    let mut stored = HashSet::new();

    for (host, se) in spawned.iter().zip(entities) {
        let Some(saved) = se.storage else { continue };
        let mut storage = ItemStorage::new(*host);
        storage.initialize(&saved.structure);

        for saved_slot in saved.slots {
            let slot = storage
                .get_slot_mut(&saved_slot.id)
                .ok_or(SaveError::UndeclaredSlot(saved_slot.id))?;
            if let Some(i) = saved_slot.occupant {
                if !stored.insert(i) {
                    return Err(SaveError::DuplicateOccupant(i));
                }
                let occupant = resolve(i)?;
                let item = inventory
                    .world
                    .get::<&Item>(occupant)
                    .map_err(|_| SaveError::OccupantNotAnItem(i))?;
                slot.restore_occupant(OccupantSummary {
                    entity: occupant,
                    name: item.attributes.name.clone(),
                    size: item.attributes.size,
                });
                inventory
                    .storages
                    .set_location(occupant, SlotRef::new(*host, saved_slot.id));
            }
            for i in saved_slot.observers {
                slot.restore_observer(ObserverHandle(resolve(i)?));
            }
        }
        inventory.storages.insert(storage);
    }

    check_containment(inventory, &spawned)
}

/// Reject loaded trees that no sequence of moves could have produced.
fn check_containment(inventory: &Inventory, spawned: &[Entity]) -> Result<(), SaveError> {
    let registry = &inventory.storages;
    for (i, entity) in spawned.iter().enumerate() {
        if let Some(slot) = registry.location_of(*entity) {
            if registry.would_contain_itself(*entity, slot.host) {
                return Err(SaveError::CyclicContainment(i as u32));
            }
        }
    }
    let max = registry.max_depth();
    for (i, entity) in spawned.iter().enumerate() {
        if !registry.contains(*entity) {
            continue;
        }
        let depth = registry.ancestors(*entity).count() + 1;
        if depth > max {
            return Err(SaveError::NestingTooDeep {
                index: i as u32,
                depth,
                max,
            });
        }
    }
    Ok(())
}

/// Spawn an entity with all its components
fn spawn_entity(world: &mut World, se: &SerializableEntity) -> Entity {
    let entity = world.spawn(());

    if let Some(c) = &se.name {
        let _ = world.insert_one(entity, c.clone());
    }
    if let Some(c) = &se.item {
        let _ = world.insert_one(entity, c.clone());
    }
    if se.observer {
        let _ = world.insert_one(entity, Observer);
    }
    entity
}

/// Save the complete inventory to a writer
pub fn save_inventory<W: Write>(writer: W, inventory: &Inventory) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        config: inventory.config.clone(),
        entities: serialize_entities(inventory),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load an inventory from a reader. Queued notifications are not saved; the
/// loaded inventory starts with an empty outbox.
pub fn load_inventory<R: Read>(
    reader: R,
    catalog: StructureCatalog,
) -> Result<Inventory, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut inventory = Inventory::with_config(save_data.config, catalog);
    deserialize_entities(&mut inventory, save_data.entities)?;
    Ok(inventory)
}

impl Inventory {
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        save_inventory(writer, self)
    }

    /// Replace this inventory's contents with a saved one, keeping the catalog
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        *self = load_inventory(reader, self.catalog.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_logic::item::{ItemAttributes, ItemSize};
    use stowage_logic::slot_id::NamedSlot;
    use stowage_logic::structure::presets;

    #[test]
    fn test_save_load_roundtrip() {
        let mut inventory = Inventory::new();
        let crew = inventory.spawn_holder("Engineer");
        inventory.initialize_storage(crew, &presets::human()).unwrap();
        let bag = inventory.spawn_container(
            ItemAttributes::new("backpack", ItemSize::Large).with_trait("back"),
            &presets::backpack(3),
        );
        let wrench = inventory.spawn_item(ItemAttributes::new("wrench", ItemSize::Small));
        inventory.transfer(bag, SlotRef::new(crew, NamedSlot::Back)).unwrap();
        inventory
            .transfer(wrench, SlotRef::new(bag, SlotIdentifier::indexed(2)))
            .unwrap();

        let mut save_buffer = Vec::new();
        inventory.save(&mut save_buffer).expect("Save failed");

        let mut loaded = Inventory::new();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.item_count(), 2);
        assert_eq!(loaded.storages().len(), 2);
        assert!(loaded.pending_updates().is_empty());

        let crew = loaded
            .world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == "Engineer")
            .map(|(e, _)| e)
            .unwrap();
        let bag = loaded
            .slot(&SlotRef::new(crew, NamedSlot::Back))
            .and_then(|s| s.occupant())
            .unwrap();
        let held = loaded
            .slot(&SlotRef::new(bag, SlotIdentifier::indexed(2)))
            .and_then(|s| s.occupant_summary())
            .unwrap();
        assert_eq!(held.name, "wrench");
        assert_eq!(loaded.root_owner(held.entity), crew);
        assert!(loaded
            .storage(bag)
            .unwrap()
            .slots()
            .all(|s| s.is_observed_by(ObserverHandle(crew))));
    }

    #[test]
    fn version_mismatch() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            config: InventoryConfig::default(),
            entities: Vec::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        let err = load_inventory(&bytes[..], StructureCatalog::new()).err().unwrap();
        assert!(matches!(
            err,
            SaveError::VersionMismatch { found, .. } if found == SAVE_VERSION + 1
        ));
    }

    #[test]
    fn dangling_occupant() {
        let data = SaveData {
            version: SAVE_VERSION,
            config: InventoryConfig::default(),
            entities: vec![SerializableEntity {
                storage: Some(SerializableStorage {
                    structure: presets::pouch(1),
                    slots: vec![SerializableSlot {
                        id: SlotIdentifier::indexed(0),
                        occupant: Some(5),
                        observers: Vec::new(),
                    }],
                }),
                ..Default::default()
            }],
        };
        let bytes = bincode::serialize(&data).unwrap();
        let err = load_inventory(&bytes[..], StructureCatalog::new()).err().unwrap();
        assert!(matches!(err, SaveError::DanglingReference(5)));
    }

    fn pen() -> SerializableEntity {
        SerializableEntity {
            item: Some(Item::new(ItemAttributes::new("pen", ItemSize::Tiny))),
            ..Default::default()
        }
    }

    fn container(slots: Vec<Option<u32>>) -> SerializableEntity {
        SerializableEntity {
            item: Some(Item::new(ItemAttributes::new("tin", ItemSize::Small))),
            storage: Some(SerializableStorage {
                structure: presets::locker(slots.len() as u32),
                slots: slots
                    .into_iter()
                    .enumerate()
                    .map(|(i, occupant)| SerializableSlot {
                        id: SlotIdentifier::indexed(i as u32),
                        occupant,
                        observers: Vec::new(),
                    })
                    .collect(),
            }),
            ..Default::default()
        }
    }

    fn load(entities: Vec<SerializableEntity>, config: InventoryConfig) -> SaveError {
        let data = SaveData {
            version: SAVE_VERSION,
            config,
            entities,
        };
        let bytes = bincode::serialize(&data).unwrap();
        load_inventory(&bytes[..], StructureCatalog::new()).err().unwrap()
    }

    #[test]
    fn one_item_in_two_slots() {
        let err = load(
            vec![pen(), container(vec![Some(0), Some(0)])],
            InventoryConfig::default(),
        );
        assert!(matches!(err, SaveError::DuplicateOccupant(0)));
    }

    #[test]
    fn containers_holding_each_other() {
        let err = load(
            vec![container(vec![Some(1)]), container(vec![Some(0)])],
            InventoryConfig::default(),
        );
        assert!(matches!(err, SaveError::CyclicContainment(_)));

        let err = load(vec![container(vec![Some(0)])], InventoryConfig::default());
        assert!(matches!(err, SaveError::CyclicContainment(0)));
    }

    #[test]
    fn saved_tree_too_deep() {
        let config = InventoryConfig {
            max_nesting_depth: 2,
            ..InventoryConfig::default()
        };
        let err = load(
            vec![
                container(vec![Some(1)]),
                container(vec![Some(2)]),
                container(vec![None]),
            ],
            config,
        );
        assert!(matches!(
            err,
            SaveError::NestingTooDeep {
                index: 2,
                depth: 3,
                max: 2
            }
        ));
    }
}
