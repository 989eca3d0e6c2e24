//! Initial contents for freshly initialized storages.
//!
//! A [`Populator`] places zero or more items into a storage. Each item that
//! cannot be placed is reported as a [`PopulationFailure`] and cleaned up;
//! the rest of the pass carries on.

use std::fmt;

use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stowage_logic::loadout::{Loadout, LoadoutEntry};

use crate::error::SlotError;
use crate::inventory::Inventory;
use crate::storage::SlotRef;

/// Shared state for one population pass.
pub struct PopulationContext {
    pub rng: StdRng,
    /// Entity the population is performed for, if any (the spawning player).
    pub spawned_by: Option<Entity>,
}

impl PopulationContext {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spawned_by: None,
        }
    }

    pub fn for_entity(mut self, entity: Entity) -> Self {
        self.spawned_by = Some(entity);
        self
    }
}

/// One item that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationFailure {
    pub item: String,
    pub host: Entity,
    pub reason: SlotError,
}

impl fmt::Display for PopulationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not place {} in {:?}: {}", self.item, self.host, self.reason)
    }
}

impl std::error::Error for PopulationFailure {}

/// Places initial contents into `host`'s storage.
pub trait Populator {
    fn populate(
        &mut self,
        inventory: &mut Inventory,
        host: Entity,
        ctx: &mut PopulationContext,
    ) -> Vec<PopulationFailure>;
}

impl<F> Populator for F
where
    F: FnMut(&mut Inventory, Entity, &mut PopulationContext) -> Vec<PopulationFailure>,
{
    fn populate(
        &mut self,
        inventory: &mut Inventory,
        host: Entity,
        ctx: &mut PopulationContext,
    ) -> Vec<PopulationFailure> {
        self(inventory, host, ctx)
    }
}

/// Populates from a [`Loadout`], recursing into container entries.
pub struct LoadoutPopulator<'a> {
    loadout: &'a Loadout,
}

impl<'a> LoadoutPopulator<'a> {
    pub fn new(loadout: &'a Loadout) -> Self {
        Self { loadout }
    }
}

impl Populator for LoadoutPopulator<'_> {
    fn populate(
        &mut self,
        inventory: &mut Inventory,
        host: Entity,
        ctx: &mut PopulationContext,
    ) -> Vec<PopulationFailure> {
        let mut failures = Vec::new();
        for entry in &self.loadout.entries {
            if entry.chance < 1.0 && ctx.rng.gen::<f32>() >= entry.chance {
                continue;
            }
            place_entry(inventory, host, entry, ctx, &mut failures);
        }
        failures
    }
}

fn place_entry(
    inventory: &mut Inventory,
    host: Entity,
    entry: &LoadoutEntry,
    ctx: &mut PopulationContext,
    failures: &mut Vec<PopulationFailure>,
) {
    let fail = |reason| PopulationFailure {
        item: entry.item.name.clone(),
        host,
        reason,
    };

    let item = match &entry.structure {
        Some(name) => match inventory.spawn_container_named(entry.item.clone(), name) {
            Ok(item) => item,
            Err(reason) => {
                failures.push(fail(reason));
                return;
            }
        },
        None => inventory.spawn_item(entry.item.clone()),
    };

    let target = match entry.slot {
        Some(id) => Some(SlotRef::new(host, id)),
        None => inventory.first_free_slot(host, item),
    };
    let placed = match target {
        Some(slot) => inventory.transfer(item, slot).map(|_| ()),
        None => Err(SlotError::NoFreeSlot(host)),
    };
    if let Err(reason) = placed {
        failures.push(fail(reason));
        if let Err(e) = inventory.despawn(item) {
            log::error!("cleaning up unplaced {:?}: {}", item, e);
        }
        return;
    }

    if let Some(contents) = &entry.contents {
        failures.extend(LoadoutPopulator::new(contents).populate(inventory, item, ctx));
    }
}
