//! Stowage Headless Scenario Harness
//!
//! Validates the bundled structure catalog and loadouts, then drives the
//! storage engine through crew spawning, hand-overs and saves in-process.
//!
//! Usage:
//!   cargo run -p stowage-simtest
//!   cargo run -p stowage-simtest -- --verbose

use std::collections::{BTreeMap, HashSet};

use hecs::Entity;
use stowage_core::prelude::*;
use stowage_logic::catalog::StructureCatalog;
use stowage_logic::item::{ItemAttributes, ItemSize};
use stowage_logic::loadout::{validate_loadout, Loadout};
use stowage_logic::slot_id::{NamedSlot, SlotIdentifier};

// ── Bundled data (same JSON a game server would ship) ───────────────────
const STRUCTURES_JSON: &str = include_str!("../../../data/storage_structures.json");
const LOADOUTS_JSON: &str = include_str!("../../../data/loadouts.json");

const SEED: u64 = 42;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

/// Transport stand-in that counts deliveries per observer.
#[derive(Default)]
struct CountingTransport {
    per_observer: BTreeMap<ObserverHandle, usize>,
    empty_slot_updates: usize,
}

impl SlotUpdateSink for CountingTransport {
    fn broadcast_slot_update(
        &mut self,
        observer: ObserverHandle,
        _slot: SlotRef,
        occupant: Option<&OccupantSummary>,
    ) {
        *self.per_observer.entry(observer).or_default() += 1;
        if occupant.is_none() {
            self.empty_slot_updates += 1;
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();
    println!("=== Stowage Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Structure catalog
    let catalog = match StructureCatalog::from_json(STRUCTURES_JSON) {
        Ok(c) => c,
        Err(e) => {
            println!("  ✗ catalog_parse: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("loaded {} storage structures", catalog.len());
    results.extend(validate_catalog(&catalog, verbose));

    // 2. Loadouts
    let loadouts: Vec<Loadout> = match serde_json::from_str(LOADOUTS_JSON) {
        Ok(l) => l,
        Err(e) => {
            println!("  ✗ loadouts_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_loadouts(&loadouts, &catalog, verbose));

    // 3. Crew population
    results.extend(validate_population(&loadouts, &catalog, verbose));

    // 4. Ownership hand-over
    results.extend(validate_hand_over(&loadouts, &catalog, verbose));

    // 5. Containment rules
    results.extend(validate_containment(&catalog, verbose));

    // 6. Notification delivery
    results.extend(validate_delivery(&loadouts, &catalog, verbose));

    // 7. Save / load
    results.extend(validate_persistence(&loadouts, &catalog, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn find_loadout<'a>(loadouts: &'a [Loadout], name: &str) -> Option<&'a Loadout> {
    loadouts.iter().find(|l| l.name == name)
}

/// Spawn a crew member with a human storage populated from `loadout`.
fn spawn_crew(
    inventory: &mut Inventory,
    name: &str,
    loadout: &Loadout,
    seed: u64,
) -> Result<(Entity, Vec<PopulationFailure>), SlotError> {
    let crew = inventory.spawn_holder(name);
    let structure = inventory
        .catalog()
        .get("human")
        .cloned()
        .ok_or_else(|| SlotError::UnknownStructure("human".into()))?;
    let mut ctx = PopulationContext::seeded(seed).for_entity(crew);
    let failures = inventory.initialize_storage_with(
        crew,
        &structure,
        &mut LoadoutPopulator::new(loadout),
        &mut ctx,
    )?;
    Ok((crew, failures))
}

fn tree_names(inventory: &Inventory, host: Entity) -> Vec<String> {
    inventory
        .slot_tree(host)
        .map(|tree| {
            tree.filter_map(|s| s.occupant_summary().map(|o| o.name.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn tree_observed_only_by(
    inventory: &Inventory,
    host: Entity,
    owner: Entity,
    former: Option<Entity>,
) -> bool {
    inventory.slot_tree(host).is_some_and(|mut tree| {
        tree.all(|s| {
            s.is_observed_by(ObserverHandle(owner))
                && former.map_or(true, |f| !s.is_observed_by(ObserverHandle(f)))
        })
    })
}

// ── 1. Structure Catalog ────────────────────────────────────────────────

fn validate_catalog(catalog: &StructureCatalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Structure Catalog ---");
    let mut results = Vec::new();

    let required = ["human", "backpack", "pouch", "locker"];
    let missing: Vec<_> = required.iter().filter(|n| catalog.get(n).is_none()).collect();
    results.push(TestResult::new(
        "catalog_has_core_structures",
        missing.is_empty(),
        if missing.is_empty() {
            format!("{} structures loaded", catalog.len())
        } else {
            format!("missing {:?}", missing)
        },
    ));

    let human_slots = catalog.get("human").map_or(0, |s| s.slot_count());
    results.push(TestResult::new(
        "human_declares_every_role",
        human_slots == NamedSlot::ALL.len(),
        format!("{} of {} roles", human_slots, NamedSlot::ALL.len()),
    ));

    // Every structure yields unique identifiers
    let mut duplicates = Vec::new();
    for name in catalog.names() {
        if let Some(structure) = catalog.get(name) {
            let ids: Vec<SlotIdentifier> = structure.declared_identifiers().collect();
            let unique: HashSet<_> = ids.iter().collect();
            if unique.len() != ids.len() {
                duplicates.push(name.to_string());
            }
        }
    }
    results.push(TestResult::new(
        "structure_identifiers_unique",
        duplicates.is_empty(),
        if duplicates.is_empty() {
            "all identifiers unique".to_string()
        } else {
            format!("duplicates in {:?}", duplicates)
        },
    ));

    if verbose {
        for name in catalog.names() {
            if let Some(s) = catalog.get(name) {
                println!("  {:<10} {:>3} slots", name, s.slot_count());
            }
        }
    }

    results
}

// ── 2. Loadouts ─────────────────────────────────────────────────────────

fn validate_loadouts(
    loadouts: &[Loadout],
    catalog: &StructureCatalog,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Loadouts ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "loadouts_not_empty",
        !loadouts.is_empty(),
        format!("{} loadouts loaded", loadouts.len()),
    ));

    for loadout in loadouts {
        let errors = validate_loadout(loadout, catalog);
        results.push(TestResult::new(
            &format!("loadout_valid_{}", loadout.name.replace(' ', "_")),
            errors.is_empty(),
            if errors.is_empty() {
                format!("{} entries", loadout.total_entries())
            } else {
                format!("{:?}", errors)
            },
        ));
        if verbose {
            println!("  {:<14} {:>3} entries", loadout.name, loadout.total_entries());
        }
    }

    results
}

// ── 3. Crew Population ──────────────────────────────────────────────────

fn validate_population(
    loadouts: &[Loadout],
    catalog: &StructureCatalog,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Crew Population ---");
    let mut results = Vec::new();
    let Some(engineer) = find_loadout(loadouts, "engineer") else {
        results.push(TestResult::new("population_engineer", false, "no engineer loadout"));
        return results;
    };

    let mut inventory = Inventory::with_config(Default::default(), catalog.clone());
    let (crew, failures) = match spawn_crew(&mut inventory, "Engineer", engineer, SEED) {
        Ok(spawned) => spawned,
        Err(e) => {
            results.push(TestResult::new("population_engineer", false, e.to_string()));
            return results;
        }
    };

    results.push(TestResult::new(
        "population_no_failures",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{} items placed", inventory.item_count())
        } else {
            failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
        },
    ));

    // Every placed item reports the crew member as root
    let names = tree_names(&inventory, crew);
    let stray = inventory
        .world
        .query::<&Item>()
        .iter()
        .filter(|(e, _)| inventory.root_owner(*e) != crew)
        .count();
    results.push(TestResult::new(
        "population_single_root",
        stray == 0 && names.len() == inventory.item_count(),
        format!("{} items in tree, {} with another root", names.len(), stray),
    ));

    results.push(TestResult::new(
        "population_crew_observes_tree",
        tree_observed_only_by(&inventory, crew, crew, None),
        "crew observes every nested slot",
    ));

    // Same seed, same result
    let mut again = Inventory::with_config(Default::default(), catalog.clone());
    let same = spawn_crew(&mut again, "Engineer", engineer, SEED)
        .map(|(c, _)| tree_names(&again, c) == names)
        .unwrap_or(false);
    results.push(TestResult::new("population_deterministic", same, format!("seed {}", SEED)));

    if verbose {
        for name in &names {
            println!("  carries {}", name);
        }
    }

    results
}

// ── 4. Ownership Hand-over ──────────────────────────────────────────────

fn validate_hand_over(
    loadouts: &[Loadout],
    catalog: &StructureCatalog,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Ownership Hand-over ---");
    let mut results = Vec::new();
    let Some(engineer) = find_loadout(loadouts, "engineer") else {
        results.push(TestResult::new("hand_over", false, "no engineer loadout"));
        return results;
    };

    let mut inventory = Inventory::with_config(Default::default(), catalog.clone());
    let Ok((p, _)) = spawn_crew(&mut inventory, "P", engineer, SEED) else {
        results.push(TestResult::new("hand_over", false, "spawn failed"));
        return results;
    };
    let Ok((q, _)) = spawn_crew(&mut inventory, "Q", &Loadout::default(), SEED) else {
        results.push(TestResult::new("hand_over", false, "spawn failed"));
        return results;
    };

    let Some(bag) = inventory
        .slot(&SlotRef::new(p, NamedSlot::Back))
        .and_then(|s| s.occupant())
    else {
        results.push(TestResult::new("hand_over", false, "engineer has no backpack"));
        return results;
    };

    match inventory.transfer(bag, SlotRef::new(q, NamedSlot::Back)) {
        Ok(moved) => {
            results.push(TestResult::new(
                "hand_over_roots",
                moved.previous_root == p && moved.new_root == q,
                format!("{:?} -> {:?}", moved.previous_root, moved.new_root),
            ));
            results.push(TestResult::new(
                "hand_over_observation_moves",
                tree_observed_only_by(&inventory, bag, q, Some(p)),
                "every nested slot observed by Q, none by P",
            ));
        }
        Err(e) => results.push(TestResult::new("hand_over_roots", false, e.to_string())),
    }

    // Drop it: nobody observes a loose bag
    let dropped = inventory.take(SlotRef::new(q, NamedSlot::Back));
    let unobserved = inventory
        .slot_tree(bag)
        .is_some_and(|mut tree| tree.all(|s| s.observers().next().is_none()));
    results.push(TestResult::new(
        "drop_stops_observation",
        dropped == Ok(Some(bag)) && unobserved && inventory.root_owner(bag) == bag,
        "loose bag has no observers",
    ));

    if verbose {
        println!("  backpack {:?} passed P -> Q -> floor", bag);
    }

    results
}

// ── 5. Containment Rules ────────────────────────────────────────────────

fn validate_containment(catalog: &StructureCatalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Containment Rules ---");
    let mut results = Vec::new();

    let mut inventory = Inventory::with_config(Default::default(), catalog.clone());
    let spawned = inventory
        .spawn_container_named(ItemAttributes::new("duffel", ItemSize::Large), "duffel")
        .and_then(|outer| {
            let inner = inventory.spawn_container_named(
                ItemAttributes::new("backpack", ItemSize::Large),
                "backpack",
            )?;
            inventory.transfer(inner, SlotRef::new(outer, SlotIdentifier::indexed(3)))?;
            Ok((outer, inner))
        });
    let (outer, inner) = match spawned {
        Ok(pair) => pair,
        Err(e) => {
            results.push(TestResult::new("containment_setup", false, e.to_string()));
            return results;
        }
    };
    inventory.drain_updates();

    let cyclic = inventory.transfer(outer, SlotRef::new(inner, SlotIdentifier::indexed(0)));
    results.push(TestResult::new(
        "cycle_rejected",
        matches!(cyclic, Err(SlotError::CyclicContainment { .. }))
            && inventory.pending_updates().is_empty(),
        format!("{:?}", cyclic.err()),
    ));

    // Nested first, then the holding slot
    let order: Vec<SlotRef> = inventory
        .slot_tree(outer)
        .map(|t| t.map(Slot::slot_ref).collect())
        .unwrap_or_default();
    let holder_pos = order
        .iter()
        .position(|s| *s == SlotRef::new(outer, SlotIdentifier::indexed(3)));
    let last_nested = order.iter().rposition(|s| s.host == inner);
    let expected = inventory.storage(outer).map_or(0, |s| s.slot_count())
        + inventory.storage(inner).map_or(0, |s| s.slot_count());
    results.push(TestResult::new(
        "traversal_post_order",
        order.len() == expected && matches!((last_nested, holder_pos), (Some(n), Some(h)) if n < h),
        format!("{} slots, holder at {:?}", order.len(), holder_pos),
    ));

    let pouch = inventory
        .spawn_item(ItemAttributes::new("pouch", ItemSize::Small).with_trait("container"));
    let tiny_box =
        inventory.spawn_container_named(ItemAttributes::new("box", ItemSize::Small), "pouch");
    let rejected = tiny_box
        .as_ref()
        .map(|b| inventory.can_fit(pouch, SlotRef::new(*b, SlotIdentifier::indexed(0))));
    results.push(TestResult::new(
        "forbidden_trait_rejected",
        rejected == Ok(false),
        "containers cannot go into pouches",
    ));

    if verbose {
        println!("  walked {} slots", order.len());
    }

    results
}

// ── 6. Notification Delivery ────────────────────────────────────────────

fn validate_delivery(
    loadouts: &[Loadout],
    catalog: &StructureCatalog,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Notification Delivery ---");
    let mut results = Vec::new();
    let Some(security) = find_loadout(loadouts, "security") else {
        results.push(TestResult::new("delivery", false, "no security loadout"));
        return results;
    };

    let mut inventory = Inventory::with_config(Default::default(), catalog.clone());
    let Ok((officer, _)) = spawn_crew(&mut inventory, "Officer", security, SEED) else {
        results.push(TestResult::new("delivery", false, "spawn failed"));
        return results;
    };

    let mut transport = CountingTransport::default();
    inventory.flush(&mut transport);
    let slots_in_tree = inventory.slot_tree(officer).map_or(0, |t| t.count());
    let owner_updates = transport
        .per_observer
        .get(&ObserverHandle(officer))
        .copied()
        .unwrap_or(0);
    // catch-ups, plus one per placed item
    results.push(TestResult::new(
        "delivery_covers_tree",
        owner_updates >= slots_in_tree,
        format!("{} updates for {} slots", owner_updates, slots_in_tree),
    ));

    // A UI viewer on one slot sees catch-up then each change, once
    let viewer = inventory.spawn_viewer();
    let pocket = SlotRef::new(officer, NamedSlot::RightPocket);
    let mut view = CountingTransport::default();
    let setup = inventory.add_observer(pocket, viewer).and_then(|first| {
        let second = inventory.add_observer(pocket, viewer)?;
        inventory.take(pocket)?;
        Ok((first, second))
    });
    match setup {
        Ok((true, false)) => {}
        Ok((first, second)) => results.push(TestResult::new(
            "viewer_subscribe_once",
            false,
            format!("first add {}, second add {}", first, second),
        )),
        Err(e) => {
            results.push(TestResult::new("delivery_setup", false, e.to_string()));
            return results;
        }
    }
    inventory.flush(&mut view);
    let seen = view.per_observer.get(&viewer).copied().unwrap_or(0);
    results.push(TestResult::new(
        "viewer_catch_up_then_change",
        seen == 2 && view.empty_slot_updates >= 1,
        format!("viewer received {} updates", seen),
    ));

    if verbose {
        println!("  {} observer(s) reached", transport.per_observer.len());
    }

    results
}

// ── 7. Save / Load ──────────────────────────────────────────────────────

fn validate_persistence(
    loadouts: &[Loadout],
    catalog: &StructureCatalog,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();

    let mut inventory = Inventory::with_config(Default::default(), catalog.clone());
    for (i, loadout) in loadouts.iter().filter(|l| l.name != "supply locker").enumerate() {
        let name = format!("crew-{}", i);
        if let Err(e) = spawn_crew(&mut inventory, &name, loadout, SEED + i as u64) {
            results.push(TestResult::new("persistence_setup", false, e.to_string()));
            return results;
        }
    }
    if let Some(locker_loadout) = find_loadout(loadouts, "supply locker") {
        let locker = inventory.world.spawn(());
        if let Some(structure) = catalog.get("locker").cloned() {
            let mut ctx = PopulationContext::seeded(SEED);
            if let Err(e) = inventory.initialize_storage_with(
                locker,
                &structure,
                &mut LoadoutPopulator::new(locker_loadout),
                &mut ctx,
            ) {
                results.push(TestResult::new("persistence_setup", false, e.to_string()));
                return results;
            }
        }
    }

    let mut bytes = Vec::new();
    if let Err(e) = inventory.save(&mut bytes) {
        results.push(TestResult::new("save", false, e.to_string()));
        return results;
    }
    let loaded = match stowage_core::persistence::load_inventory(&bytes[..], catalog.clone()) {
        Ok(l) => l,
        Err(e) => {
            results.push(TestResult::new("load", false, e.to_string()));
            return results;
        }
    };

    results.push(TestResult::new(
        "persistence_counts",
        loaded.item_count() == inventory.item_count()
            && loaded.storages().len() == inventory.storages().len(),
        format!(
            "{} items, {} storages, {} bytes",
            loaded.item_count(),
            loaded.storages().len(),
            bytes.len()
        ),
    ));

    let names = |inv: &Inventory| -> Vec<String> {
        let mut all: Vec<String> = inv
            .storages()
            .hosts()
            .filter(|h| inv.location_of(*h).is_none())
            .flat_map(|h| tree_names(inv, h))
            .collect();
        all.sort();
        all
    };
    results.push(TestResult::new(
        "persistence_contents",
        names(&loaded) == names(&inventory),
        "same items in the same trees",
    ));

    if verbose {
        println!("  saved {} bytes", bytes.len());
    }

    results
}
