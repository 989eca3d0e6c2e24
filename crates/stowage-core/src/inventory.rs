//! Inventory - the storage authority and main entry point
//!
//! Every change to slot occupancy goes through [`Inventory`]. It validates
//! the whole move before touching anything, applies it, and queues the
//! resulting observer notifications in its outbox in the order they happen.
//! The transport drains that outbox with [`Inventory::flush`].

use hecs::{Entity, World};
use stowage_logic::catalog::StructureCatalog;
use stowage_logic::config::InventoryConfig;
use stowage_logic::item::ItemAttributes;
use stowage_logic::structure::StorageStructure;

use crate::components::{Item, Name, Observer, ObserverHandle};
use crate::error::SlotError;
use crate::ownership::OwnershipTransfer;
use crate::populate::{PopulationContext, PopulationFailure, Populator};
use crate::storage::{ItemStorage, Slot, SlotRef, SlotTree, StorageRegistry};
use crate::transport::{SlotUpdate, SlotUpdateSink, UpdateLog};

/// Single authority over every storage in a world
pub struct Inventory {
    /// ECS world containing items, holders and viewers
    pub world: World,
    pub(crate) storages: StorageRegistry,
    pub(crate) catalog: StructureCatalog,
    pub(crate) config: InventoryConfig,
    pub(crate) outbox: UpdateLog,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Empty inventory with default config and the preset catalog
    pub fn new() -> Self {
        Self::with_config(InventoryConfig::default(), StructureCatalog::with_presets())
    }

    pub fn with_config(config: InventoryConfig, catalog: StructureCatalog) -> Self {
        Self {
            world: World::new(),
            storages: StorageRegistry::new(config.max_nesting_depth),
            catalog,
            config,
            outbox: UpdateLog::new(),
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StructureCatalog {
        &self.catalog
    }

    pub fn storages(&self) -> &StorageRegistry {
        &self.storages
    }

    // ── Entities ────────────────────────────────────────────────────────

    /// Spawn a player-like entity that can hold a storage and observe slots
    pub fn spawn_holder(&mut self, name: impl Into<String>) -> Entity {
        self.world.spawn((Name::new(name), Observer))
    }

    /// Spawn a bare observer, e.g. a UI view watching a single slot
    pub fn spawn_viewer(&mut self) -> ObserverHandle {
        ObserverHandle(self.world.spawn((Observer,)))
    }

    pub fn spawn_item(&mut self, attributes: ItemAttributes) -> Entity {
        self.world
            .spawn((Name::new(attributes.name.clone()), Item::new(attributes)))
    }

    /// Spawn an item that hosts its own storage
    pub fn spawn_container(
        &mut self,
        attributes: ItemAttributes,
        structure: &StorageStructure,
    ) -> Entity {
        let item = self.spawn_item(attributes);
        self.attach_storage(item, structure);
        item
    }

    /// Spawn a container using a structure from the catalog
    pub fn spawn_container_named(
        &mut self,
        attributes: ItemAttributes,
        structure: &str,
    ) -> Result<Entity, SlotError> {
        let structure = self
            .catalog
            .get(structure)
            .cloned()
            .ok_or_else(|| SlotError::UnknownStructure(structure.to_string()))?;
        Ok(self.spawn_container(attributes, &structure))
    }

    pub fn is_observer_capable(&self, entity: Entity) -> bool {
        self.world.get::<&Observer>(entity).is_ok()
    }

    pub fn item_attributes(&self, entity: Entity) -> Result<ItemAttributes, SlotError> {
        if !self.world.contains(entity) {
            return Err(SlotError::NoSuchEntity(entity));
        }
        self.world
            .get::<&Item>(entity)
            .map(|item| item.attributes.clone())
            .map_err(|_| SlotError::NotAnItem(entity))
    }

    /// Number of item entities in the world
    pub fn item_count(&self) -> usize {
        self.world.query::<&Item>().iter().count()
    }

    /// Remove an entity: take it out of its slot, release its contents,
    /// drop it as an observer everywhere, then despawn it.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SlotError> {
        if !self.world.contains(entity) {
            return Err(SlotError::NoSuchEntity(entity));
        }
        if let Some(slot) = self.storages.location_of(entity) {
            self.vacate(slot);
        }
        self.destroy_storage(entity);
        // any entity may have been subscribed through a bare handle
        let handle = ObserverHandle(entity);
        for storage in self.storages.storages_mut() {
            for slot in storage.slots_mut() {
                slot.remove_observer(handle);
            }
        }
        self.world
            .despawn(entity)
            .map_err(|_| SlotError::NoSuchEntity(entity))
    }

    // ── Storage lifecycle ───────────────────────────────────────────────

    /// Give `host` an empty storage shaped by `structure`.
    ///
    /// A host that is itself stored gains a new storage level, so the tree
    /// above it must leave room for one more.
    pub fn initialize_storage(
        &mut self,
        host: Entity,
        structure: &StorageStructure,
    ) -> Result<(), SlotError> {
        if !self.world.contains(host) {
            return Err(SlotError::NoSuchEntity(host));
        }
        if self.storages.contains(host) {
            return Err(SlotError::StorageExists(host));
        }
        let depth = self.storages.ancestors(host).count() + 1;
        let max = self.storages.max_depth();
        if depth > max {
            log::warn!("{:?} cannot host a storage at depth {}", host, depth);
            return Err(SlotError::NestingTooDeep { depth, max });
        }
        self.attach_storage(host, structure);
        Ok(())
    }

    /// Give `host` a storage and run `populator` over it.
    ///
    /// Population failures are per item: they are logged and returned, and
    /// everything that could be placed stays placed.
    pub fn initialize_storage_with(
        &mut self,
        host: Entity,
        structure: &StorageStructure,
        populator: &mut dyn Populator,
        ctx: &mut PopulationContext,
    ) -> Result<Vec<PopulationFailure>, SlotError> {
        self.initialize_storage(host, structure)?;
        let failures = populator.populate(self, host, ctx);
        for failure in &failures {
            log::warn!("populating {:?}: {}", host, failure);
        }
        Ok(failures)
    }

    fn attach_storage(&mut self, host: Entity, structure: &StorageStructure) {
        let mut storage = ItemStorage::new(host);
        storage.initialize(structure);
        self.storages.insert(storage);
        log::info!(
            "{:?} initialized '{}' storage with {} slots",
            host,
            structure.name,
            structure.slot_count()
        );

        if self.config.observe_own_storage {
            let root = self.storages.root_owner(host);
            if self.is_observer_capable(root) {
                self.observe_tree(host, ObserverHandle(root));
            }
        }
    }

    /// Empty and drop `host`'s storage. Released items become loose.
    /// Does nothing if `host` has no storage.
    pub fn destroy_storage(&mut self, host: Entity) -> Vec<Entity> {
        let occupied: Vec<SlotRef> = match self.storages.get(host) {
            Some(storage) => storage
                .slots()
                .filter(|s| !s.is_empty())
                .map(Slot::slot_ref)
                .collect(),
            None => return Vec::new(),
        };
        let released: Vec<Entity> = occupied.into_iter().filter_map(|s| self.vacate(s)).collect();
        if let Some(mut storage) = self.storages.remove(host) {
            storage.destroy();
        }
        log::info!("{:?} storage destroyed, released {} item(s)", host, released.len());
        released
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    pub fn storage(&self, host: Entity) -> Option<&ItemStorage> {
        self.storages.get(host)
    }

    /// `None` if the host has no storage or the storage lacks that slot
    pub fn slot(&self, slot: &SlotRef) -> Option<&Slot> {
        self.storages.slot(slot)
    }

    /// Nested-first walk of every slot under `host`
    pub fn slot_tree(&self, host: Entity) -> Option<SlotTree<'_>> {
        self.storages
            .contains(host)
            .then(|| self.storages.slot_tree(host))
    }

    pub fn location_of(&self, item: Entity) -> Option<SlotRef> {
        self.storages.location_of(item)
    }

    pub fn root_owner(&self, entity: Entity) -> Entity {
        self.storages.root_owner(entity)
    }

    /// Whether `item` could be moved into `slot` right now
    pub fn can_fit(&self, item: Entity, slot: SlotRef) -> bool {
        match self.item_attributes(item) {
            Ok(attributes) => self.check_placement(item, &attributes, slot).is_ok(),
            Err(_) => false,
        }
    }

    /// First empty direct slot of `host` that accepts `item`
    pub fn first_free_slot(&self, host: Entity, item: Entity) -> Option<SlotRef> {
        let attributes = self.item_attributes(item).ok()?;
        self.storages
            .get(host)?
            .slots()
            .map(Slot::slot_ref)
            .find(|&slot| self.check_placement(item, &attributes, slot).is_ok())
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Move `item` into `to`, from wherever it currently is.
    ///
    /// Everything is validated before anything changes, so on error both the
    /// source and the destination are untouched and nobody is notified.
    /// Moving an item into the slot it already occupies does nothing.
    pub fn transfer(&mut self, item: Entity, to: SlotRef) -> Result<OwnershipTransfer, SlotError> {
        let attributes = self.item_attributes(item)?;
        let from = self.storages.location_of(item);
        let previous_root = self.storages.root_owner(item);
        if from == Some(to) {
            return Ok(OwnershipTransfer {
                item,
                previous_root,
                new_root: previous_root,
            });
        }
        self.check_placement(item, &attributes, to)?;

        if let Some(from) = from {
            if let Some(slot) = self.storages.slot_mut(&from) {
                slot.take(&mut self.outbox);
            }
        }
        let slot = self
            .storages
            .slot_mut(&to)
            .ok_or(SlotError::UnknownSlot(to))?;
        slot.set_occupant(Some((item, &attributes)), &mut self.outbox)?;
        self.storages.set_location(item, to);

        let new_root = self.storages.root_owner(item);
        if self.storages.contains(item) {
            self.hand_over(item, previous_root, new_root);
        }
        log::info!(
            "{} ({:?}) moved from {} to {}",
            attributes.name,
            item,
            from.map_or_else(|| "nowhere".to_string(), |f| f.to_string()),
            to
        );
        Ok(OwnershipTransfer {
            item,
            previous_root,
            new_root,
        })
    }

    /// Remove the occupant of `slot`, leaving it loose. An empty slot stays
    /// empty and nobody is notified.
    pub fn take(&mut self, slot: SlotRef) -> Result<Option<Entity>, SlotError> {
        let current = self.storages.slot(&slot).ok_or(SlotError::UnknownSlot(slot))?;
        if current.is_empty() {
            return Ok(None);
        }
        Ok(self.vacate(slot))
    }

    /// Set or clear the occupant of `slot`
    pub fn set_occupant(&mut self, slot: SlotRef, item: Option<Entity>) -> Result<(), SlotError> {
        match item {
            Some(item) => self.transfer(item, slot).map(|_| ()),
            None => self.take(slot).map(|_| ()),
        }
    }

    /// Empty every direct slot of `host`. Nested containers leave whole.
    pub fn clear(&mut self, host: Entity) -> Result<Vec<Entity>, SlotError> {
        let occupied: Vec<SlotRef> = self
            .storages
            .get(host)
            .ok_or(SlotError::NoStorage(host))?
            .slots()
            .filter(|s| !s.is_empty())
            .map(Slot::slot_ref)
            .collect();
        Ok(occupied.into_iter().filter_map(|s| self.vacate(s)).collect())
    }

    fn check_placement(
        &self,
        item: Entity,
        attributes: &ItemAttributes,
        to: SlotRef,
    ) -> Result<(), SlotError> {
        let slot = self.storages.slot(&to).ok_or(SlotError::UnknownSlot(to))?;
        if self.storages.would_contain_itself(item, to.host) {
            log::warn!("{:?} cannot go into {}: it would contain itself", item, to);
            return Err(SlotError::CyclicContainment { item, slot: to });
        }
        if let Err(reason) = slot.fit(attributes) {
            log::warn!("{} rejected {}: {}", to, attributes.name, reason);
            return Err(SlotError::Rejected { slot: to, reason });
        }
        let depth =
            self.storages.ancestors(to.host).count() + 1 + self.storages.storage_levels(item);
        let max = self.storages.max_depth();
        if depth > max {
            return Err(SlotError::NestingTooDeep { depth, max });
        }
        Ok(())
    }

    /// Empty an occupied slot and hand the removed item's tree to its new
    /// root (the item itself).
    pub(crate) fn vacate(&mut self, slot: SlotRef) -> Option<Entity> {
        let previous_root = self.storages.root_owner(slot.host);
        let item = self.storages.slot_mut(&slot)?.take(&mut self.outbox)?;
        self.storages.clear_location(item);
        if self.storages.contains(item) {
            self.hand_over(item, previous_root, item);
        }
        log::info!("{:?} taken out of {}", item, slot);
        Some(item)
    }

    // ── Slot observers ──────────────────────────────────────────────────

    /// Subscribe `observer` to one slot. Returns whether it was newly added.
    pub fn add_observer(
        &mut self,
        slot: SlotRef,
        observer: ObserverHandle,
    ) -> Result<bool, SlotError> {
        if !self.world.contains(observer.entity()) {
            return Err(SlotError::NoSuchEntity(observer.entity()));
        }
        let target = self
            .storages
            .slot_mut(&slot)
            .ok_or(SlotError::UnknownSlot(slot))?;
        Ok(target.add_observer(observer, &mut self.outbox))
    }

    /// Unsubscribe `observer` from one slot. Returns whether it was subscribed.
    pub fn remove_observer(
        &mut self,
        slot: SlotRef,
        observer: ObserverHandle,
    ) -> Result<bool, SlotError> {
        let target = self
            .storages
            .slot_mut(&slot)
            .ok_or(SlotError::UnknownSlot(slot))?;
        Ok(target.remove_observer(observer))
    }

    // ── Outbox ──────────────────────────────────────────────────────────

    /// Notifications queued since the last drain or flush
    pub fn pending_updates(&self) -> &[SlotUpdate] {
        self.outbox.updates()
    }

    pub fn drain_updates(&mut self) -> Vec<SlotUpdate> {
        self.outbox.drain()
    }

    /// Deliver queued notifications to the transport, oldest first
    pub fn flush(&mut self, sink: &mut dyn SlotUpdateSink) -> usize {
        self.outbox.flush_to(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_logic::capacity::FitFailure;
    use stowage_logic::item::ItemSize;
    use stowage_logic::slot_id::{NamedSlot, SlotIdentifier};
    use stowage_logic::structure::presets;

    fn crew(inventory: &mut Inventory, name: &str) -> Entity {
        let e = inventory.spawn_holder(name);
        inventory.initialize_storage(e, &presets::human()).unwrap();
        e
    }

    fn wrench(inventory: &mut Inventory) -> Entity {
        inventory.spawn_item(ItemAttributes::new("wrench", ItemSize::Small))
    }

    #[test]
    fn holder_observes_own_storage() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let storage = inv.storage(p).unwrap();
        assert!(storage.slots().all(|s| s.is_observed_by(ObserverHandle(p))));
        // one catch-up per slot
        assert_eq!(inv.pending_updates().len(), storage.slot_count());
    }

    #[test]
    fn transfer_between_hands() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let w = wrench(&mut inv);
        let left = SlotRef::new(p, NamedSlot::LeftHand);
        let right = SlotRef::new(p, NamedSlot::RightHand);
        inv.transfer(w, left).unwrap();
        inv.drain_updates();

        let moved = inv.transfer(w, right).unwrap();
        assert!(!moved.changed_hands());
        assert!(inv.slot(&left).unwrap().is_empty());
        assert_eq!(inv.slot(&right).unwrap().occupant(), Some(w));
        assert_eq!(inv.location_of(w), Some(right));
        // left emptied, right filled
        let updates = inv.drain_updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].slot, left);
        assert!(updates[0].occupant.is_none());
        assert_eq!(updates[1].slot, right);
    }

    #[test]
    fn same_slot_transfer_is_noop() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let w = wrench(&mut inv);
        let left = SlotRef::new(p, NamedSlot::LeftHand);
        inv.transfer(w, left).unwrap();
        inv.drain_updates();
        inv.transfer(w, left).unwrap();
        assert!(inv.pending_updates().is_empty());
    }

    #[test]
    fn rejected_transfer_keeps_source() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let toolbox = inv.spawn_item(ItemAttributes::new("toolbox", ItemSize::Large));
        let hand = SlotRef::new(p, NamedSlot::LeftHand);
        inv.transfer(toolbox, hand).unwrap();
        inv.drain_updates();

        let pocket = SlotRef::new(p, NamedSlot::LeftPocket);
        let err = inv.transfer(toolbox, pocket).unwrap_err();
        assert!(matches!(
            err,
            SlotError::Rejected {
                reason: FitFailure::TooLarge { .. },
                ..
            }
        ));
        assert_eq!(inv.location_of(toolbox), Some(hand));
        assert!(inv.pending_updates().is_empty());
    }

    #[test]
    fn unknown_slot() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let w = wrench(&mut inv);
        let nowhere = SlotRef::new(p, SlotIdentifier::indexed(9));
        assert!(inv.slot(&nowhere).is_none());
        assert_eq!(inv.transfer(w, nowhere), Err(SlotError::UnknownSlot(nowhere)));
        assert_eq!(inv.take(nowhere), Err(SlotError::UnknownSlot(nowhere)));
    }

    #[test]
    fn not_an_item() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let q = crew(&mut inv, "Q");
        let hand = SlotRef::new(p, NamedSlot::LeftHand);
        assert_eq!(inv.transfer(q, hand), Err(SlotError::NotAnItem(q)));
    }

    #[test]
    fn take_from_empty_slot_is_quiet() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        inv.drain_updates();
        assert_eq!(inv.take(SlotRef::new(p, NamedSlot::Belt)), Ok(None));
        assert!(inv.pending_updates().is_empty());
    }

    #[test]
    fn set_occupant_round_trip() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let w = wrench(&mut inv);
        let belt = SlotRef::new(p, NamedSlot::Belt);
        inv.set_occupant(belt, Some(w)).unwrap();
        assert_eq!(inv.slot(&belt).unwrap().occupant(), Some(w));
        inv.set_occupant(belt, None).unwrap();
        assert!(inv.slot(&belt).unwrap().is_empty());
        assert_eq!(inv.location_of(w), None);
    }

    #[test]
    fn clear_only_direct_slots() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let bag = inv.spawn_container(
            ItemAttributes::new("backpack", ItemSize::Large).with_trait("back"),
            &presets::backpack(3),
        );
        let w = wrench(&mut inv);
        inv.transfer(bag, SlotRef::new(p, NamedSlot::Back)).unwrap();
        inv.transfer(w, SlotRef::new(bag, SlotIdentifier::indexed(0))).unwrap();

        let removed = inv.clear(p).unwrap();
        assert_eq!(removed, vec![bag]);
        assert_eq!(inv.location_of(w).map(|s| s.host), Some(bag));
        assert_eq!(inv.root_owner(w), bag);
        assert_eq!(inv.clear(w), Err(SlotError::NoStorage(w)));
    }

    #[test]
    fn first_free_slot_skips_occupied_and_unfit() {
        let mut inv = Inventory::new();
        let bag = inv.spawn_container(
            ItemAttributes::new("bag", ItemSize::Large),
            &presets::backpack(3),
        );
        let a = wrench(&mut inv);
        inv.transfer(a, SlotRef::new(bag, SlotIdentifier::indexed(0))).unwrap();
        let b = wrench(&mut inv);
        assert_eq!(
            inv.first_free_slot(bag, b),
            Some(SlotRef::new(bag, SlotIdentifier::indexed(1)))
        );
        let big = inv.spawn_item(ItemAttributes::new("crate", ItemSize::Huge));
        assert_eq!(inv.first_free_slot(bag, big), None);
    }

    #[test]
    fn initialize_twice_is_an_error() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        assert_eq!(
            inv.initialize_storage(p, &presets::human()),
            Err(SlotError::StorageExists(p))
        );
    }

    #[test]
    fn destroy_storage_releases_and_is_idempotent() {
        let mut inv = Inventory::new();
        let bag = inv.spawn_container(
            ItemAttributes::new("bag", ItemSize::Large),
            &presets::backpack(2),
        );
        let w = wrench(&mut inv);
        inv.transfer(w, SlotRef::new(bag, SlotIdentifier::indexed(1))).unwrap();
        assert_eq!(inv.destroy_storage(bag), vec![w]);
        assert!(inv.storage(bag).is_none());
        assert_eq!(inv.location_of(w), None);
        assert!(inv.destroy_storage(bag).is_empty());
    }

    #[test]
    fn despawn_observer_unsubscribes_everywhere() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let viewer = inv.spawn_viewer();
        let belt = SlotRef::new(p, NamedSlot::Belt);
        inv.add_observer(belt, viewer).unwrap();
        inv.despawn(viewer.entity()).unwrap();
        assert!(!inv.slot(&belt).unwrap().is_observed_by(viewer));
        assert_eq!(inv.despawn(viewer.entity()), Err(SlotError::NoSuchEntity(viewer.entity())));
    }

    #[test]
    fn despawn_stored_item_empties_slot() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let w = wrench(&mut inv);
        let hand = SlotRef::new(p, NamedSlot::RightHand);
        inv.transfer(w, hand).unwrap();
        inv.despawn(w).unwrap();
        assert!(inv.slot(&hand).unwrap().is_empty());
        assert_eq!(inv.item_count(), 0);
    }

    #[test]
    fn named_container_from_catalog() {
        let mut inv = Inventory::new();
        let pouch = inv
            .spawn_container_named(ItemAttributes::new("pouch", ItemSize::Small), "pouch")
            .unwrap();
        assert_eq!(inv.storage(pouch).unwrap().slot_count(), 4);
        assert_eq!(
            inv.spawn_container_named(ItemAttributes::new("x", ItemSize::Small), "nope"),
            Err(SlotError::UnknownStructure("nope".into()))
        );
    }

    #[test]
    fn flush_hands_updates_to_transport() {
        let mut inv = Inventory::new();
        let _p = crew(&mut inv, "P");
        let queued = inv.pending_updates().len();
        let mut transport = UpdateLog::new();
        assert_eq!(inv.flush(&mut transport), queued);
        assert!(inv.pending_updates().is_empty());
        assert_eq!(transport.len(), queued);
    }

    #[test]
    fn storage_on_stored_item_respects_depth_bound() {
        let config = InventoryConfig {
            max_nesting_depth: 3,
            ..InventoryConfig::default()
        };
        let mut inv = Inventory::with_config(config, StructureCatalog::with_presets());
        let p = crew(&mut inv, "P");
        let bag = inv.spawn_container(
            ItemAttributes::new("backpack", ItemSize::Large).with_trait("back"),
            &presets::backpack(2),
        );
        let tool_box = inv.spawn_container(
            ItemAttributes::new("box", ItemSize::Medium),
            &presets::locker(1),
        );
        let tin = inv.spawn_item(ItemAttributes::new("tin", ItemSize::Small));
        inv.transfer(bag, SlotRef::new(p, NamedSlot::Back)).unwrap();
        inv.transfer(tool_box, SlotRef::new(bag, SlotIdentifier::indexed(0))).unwrap();
        inv.transfer(tin, SlotRef::new(tool_box, SlotIdentifier::indexed(0))).unwrap();

        assert_eq!(
            inv.initialize_storage(tin, &presets::pouch(1)),
            Err(SlotError::NestingTooDeep { depth: 4, max: 3 })
        );
        assert!(inv.storage(tin).is_none());

        // every slot in the tree is still reachable
        let total = inv.slot_tree(p).unwrap().count();
        assert_eq!(total, NamedSlot::ALL.len() + 2 + 1);
    }

    #[test]
    fn despawn_purges_bare_handles() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let belt = SlotRef::new(p, NamedSlot::Belt);
        let rock = inv.spawn_item(ItemAttributes::new("rock", ItemSize::Small));
        inv.add_observer(belt, ObserverHandle(rock)).unwrap();

        inv.despawn(rock).unwrap();
        assert!(!inv.slot(&belt).unwrap().is_observed_by(ObserverHandle(rock)));
    }

    #[test]
    fn observer_must_exist() {
        let mut inv = Inventory::new();
        let p = crew(&mut inv, "P");
        let belt = SlotRef::new(p, NamedSlot::Belt);
        let gone = inv.spawn_viewer();
        inv.despawn(gone.entity()).unwrap();
        assert_eq!(
            inv.add_observer(belt, gone),
            Err(SlotError::NoSuchEntity(gone.entity()))
        );
        assert_eq!(
            inv.add_observer_to_tree(p, gone),
            Err(SlotError::NoSuchEntity(gone.entity()))
        );
    }
}
