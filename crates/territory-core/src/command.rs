//! Command validation (§6, §7).
//!
//! Commands are drained once at the start of a tick. Each is resolved to
//! either a state mutation or a [`RejectionReason`]; a rejection never
//! mutates state and is reported back as data, not a crate-level error
//! (§7, "Invalid command").

use std::collections::BTreeSet;

use territory_nations::NationRegistry;
use territory_types::{Arrow, ArrowId, City, Command, CommandOutcome, NationStatus, RejectionReason};
use territory_world::{Map, OwnershipMatrix};

use crate::config::ArrowPricingConfig;

/// Tracks, per external owner id, whether that nation has already spent
/// its one free arrow (§6, "firstArrowFree"). Not part of [`territory_types::Nation`]
/// itself -- it is bookkeeping for command validation, not simulation state.
#[derive(Debug, Clone, Default)]
pub struct FirstArrowTracker {
    used: BTreeSet<String>,
}

impl FirstArrowTracker {
    /// A fresh tracker with no owner having drawn an arrow yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn consume(&mut self, owner: &str) -> bool {
        self.used.insert(owner.to_owned())
    }
}

/// Drain one inbound command against current room state, applying it if
/// valid or returning the rejection reason untouched (§5, "atomic event
/// between ticks").
pub fn apply_command(
    registry: &mut NationRegistry,
    matrix: &mut OwnershipMatrix,
    map: &Map,
    pricing: &ArrowPricingConfig,
    first_arrow: &mut FirstArrowTracker,
    tick: u64,
    command: Command,
) -> CommandOutcome {
    match command {
        Command::FoundNation { owner, x, y } => apply_found_nation(registry, matrix, map, owner, x, y),
        Command::BuildStructure { owner, x, y, kind } => {
            apply_build_structure(registry, map, &owner, x, y, kind)
        }
        Command::DrawArrow { owner, kind, path } => {
            apply_draw_arrow(registry, map, pricing, first_arrow, tick, &owner, kind, path)
        }
    }
}

fn apply_found_nation(
    registry: &mut NationRegistry,
    matrix: &mut OwnershipMatrix,
    map: &Map,
    owner: String,
    x: u32,
    y: u32,
) -> CommandOutcome {
    if !map.in_bounds(x, y) {
        return CommandOutcome::Rejected(RejectionReason::OutOfBounds);
    }
    if !map.is_claimable(x, y) {
        return CommandOutcome::Rejected(RejectionReason::CannotFoundOnOcean);
    }
    let coord = territory_types::Coord::new(x, y);
    if matrix.get(x, y).is_some() {
        return CommandOutcome::Rejected(RejectionReason::CellAlreadyOwned);
    }
    let idx = registry.register(owner, coord, false, 1.0, territory_types::ResourceBundle::zero());
    if registry.add_cell(matrix, map, idx, coord).is_err() {
        return CommandOutcome::Rejected(RejectionReason::OutOfBounds);
    }
    CommandOutcome::Accepted
}

fn apply_build_structure(
    registry: &mut NationRegistry,
    map: &Map,
    owner: &str,
    x: u32,
    y: u32,
    kind: territory_types::CityType,
) -> CommandOutcome {
    if !map.in_bounds(x, y) {
        return CommandOutcome::Rejected(RejectionReason::OutOfBounds);
    }
    let Some(idx) = registry.idx_of(owner) else {
        return CommandOutcome::Rejected(RejectionReason::UnknownOwner);
    };
    let Some(nation) = registry.get(idx) else {
        return CommandOutcome::Rejected(RejectionReason::UnknownOwner);
    };
    if nation.status != NationStatus::Active {
        return CommandOutcome::Rejected(RejectionReason::NationNotActive);
    }
    let coord = territory_types::Coord::new(x, y);
    let in_territory = registry.territory_of(idx).is_some_and(|t| t.contains(&coord));
    if !in_territory {
        return CommandOutcome::Rejected(RejectionReason::NotInTerritory);
    }
    if let Some(n) = registry.get_mut(idx) {
        n.cities.retain(|c| !(c.at == coord));
        n.cities.push(City { at: coord, kind, name: None });
    }
    CommandOutcome::Accepted
}

#[allow(clippy::too_many_arguments)]
fn apply_draw_arrow(
    registry: &mut NationRegistry,
    map: &Map,
    pricing: &ArrowPricingConfig,
    first_arrow: &mut FirstArrowTracker,
    tick: u64,
    owner: &str,
    kind: territory_types::ArrowType,
    path: Vec<territory_types::Coord>,
) -> CommandOutcome {
    if path.len() < 2 {
        return CommandOutcome::Rejected(RejectionReason::ArrowPathTooShort);
    }
    let Some(idx) = registry.idx_of(owner) else {
        return CommandOutcome::Rejected(RejectionReason::UnknownOwner);
    };
    let Some(nation) = registry.get(idx) else {
        return CommandOutcome::Rejected(RejectionReason::UnknownOwner);
    };
    if nation.status != NationStatus::Active {
        return CommandOutcome::Rejected(RejectionReason::NationNotActive);
    }
    let Some(start) = path.first().copied() else {
        return CommandOutcome::Rejected(RejectionReason::ArrowPathTooShort);
    };
    if !map.in_bounds(start.x, start.y) {
        return CommandOutcome::Rejected(RejectionReason::OutOfBounds);
    }
    let start_owned = registry.territory_of(idx).is_some_and(|t| t.contains(&start));
    if !start_owned {
        return CommandOutcome::Rejected(RejectionReason::ArrowStartNotOwned);
    }
    let slot_occupied = match kind {
        territory_types::ArrowType::Attack => nation.arrow_orders.attack.is_some(),
        territory_types::ArrowType::Defend => nation.arrow_orders.defend.is_some(),
    };
    if slot_occupied {
        return CommandOutcome::Rejected(RejectionReason::ArrowSlotOccupied);
    }

    let free = pricing.first_arrow_free && !first_arrow.used.contains(owner);
    let (food_cost, gold_cost) = if free { (0.0, 0.0) } else { pricing.price_of(path.len()) };
    let price = territory_types::ResourceBundle {
        food: food_cost,
        wood: 0.0,
        stone: 0.0,
        iron: 0.0,
        gold: gold_cost,
    };
    if !free && !nation.resources.can_afford(&price) {
        return CommandOutcome::Rejected(RejectionReason::InsufficientResources);
    }

    let population = nation.population;
    let initial_power = population * pricing.player_attack_percent;

    let Some(n) = registry.get_mut(idx) else {
        return CommandOutcome::Rejected(RejectionReason::UnknownOwner);
    };
    n.resources.add(territory_types::Resource::Food, -food_cost);
    n.resources.add(territory_types::Resource::Gold, -gold_cost);
    n.population = (n.population - initial_power).max(0.0);
    first_arrow.consume(owner);

    let arrow = Arrow {
        id: ArrowId::new(),
        kind,
        path,
        current_index: 1,
        initial_power,
        remaining_power: initial_power,
        created_at_tick: tick,
        stalled_ticks: 0,
        troop_commitment: pricing.player_attack_percent,
        status: territory_types::ArrowStatus::Advancing,
    };
    match kind {
        territory_types::ArrowType::Attack => n.arrow_orders.attack = Some(arrow),
        territory_types::ArrowType::Defend => n.arrow_orders.defend = Some(arrow),
    }
    CommandOutcome::Accepted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{ArrowType, CityType, Coord, ResourceBundle};
    use territory_world::uniform_grassland_map;

    fn founded_nation(registry: &mut NationRegistry, matrix: &mut OwnershipMatrix, map: &Map, owner: &str) {
        let idx = registry.register(owner.to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        registry.add_cell(matrix, map, idx, Coord::new(0, 0)).unwrap();
    }

    #[test]
    fn found_nation_on_ocean_is_rejected() {
        let mut cells = vec![
            territory_types::Cell { biome: territory_types::Biome::Grassland, is_river: false, resource_node: None, region_id: 0 };
            100
        ];
        cells[5] = territory_types::Cell { biome: territory_types::Biome::Ocean, is_river: false, resource_node: None, region_id: 0 };
        let map = Map::new(10, 10, cells).unwrap();
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let outcome = apply_found_nation(&mut registry, &mut matrix, &map, "alice".to_owned(), 5, 0);
        assert_eq!(outcome, CommandOutcome::Rejected(RejectionReason::CannotFoundOnOcean));
    }

    #[test]
    fn found_nation_succeeds_and_registers() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let outcome = apply_found_nation(&mut registry, &mut matrix, &map, "alice".to_owned(), 2, 2);
        assert_eq!(outcome, CommandOutcome::Accepted);
        assert!(registry.idx_of("alice").is_some());
    }

    #[test]
    fn build_structure_off_territory_is_rejected() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        founded_nation(&mut registry, &mut matrix, &map, "alice");
        let outcome = apply_build_structure(&mut registry, &map, "alice", 9, 9, CityType::Farm);
        assert_eq!(outcome, CommandOutcome::Rejected(RejectionReason::NotInTerritory));
    }

    #[test]
    fn build_structure_in_territory_succeeds() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        founded_nation(&mut registry, &mut matrix, &map, "alice");
        let outcome = apply_build_structure(&mut registry, &map, "alice", 0, 0, CityType::Tower);
        assert_eq!(outcome, CommandOutcome::Accepted);
    }

    #[test]
    fn draw_arrow_from_unowned_start_is_rejected() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        founded_nation(&mut registry, &mut matrix, &map, "alice");
        let pricing = ArrowPricingConfig::default();
        let mut tracker = FirstArrowTracker::new();
        let outcome = apply_draw_arrow(
            &mut registry,
            &map,
            &pricing,
            &mut tracker,
            0,
            "alice",
            ArrowType::Attack,
            vec![Coord::new(5, 5), Coord::new(6, 5)],
        );
        assert_eq!(outcome, CommandOutcome::Rejected(RejectionReason::ArrowStartNotOwned));
    }

    #[test]
    fn first_arrow_is_free_then_priced() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        founded_nation(&mut registry, &mut matrix, &map, "alice");
        let mut pricing = ArrowPricingConfig::default();
        pricing.food.base = 10.0;
        pricing.gold.base = 10.0;
        if let Some(n) = registry.get_mut(registry.idx_of("alice").unwrap()) {
            n.resources.food = 0.0;
            n.resources.gold = 0.0;
        }
        let mut tracker = FirstArrowTracker::new();

        let first = apply_draw_arrow(
            &mut registry,
            &map,
            &pricing,
            &mut tracker,
            0,
            "alice",
            ArrowType::Attack,
            vec![Coord::new(0, 0), Coord::new(1, 0)],
        );
        assert_eq!(first, CommandOutcome::Accepted);

        if let Some(n) = registry.get_mut(registry.idx_of("alice").unwrap()) {
            n.arrow_orders.attack = None;
        }
        let second = apply_draw_arrow(
            &mut registry,
            &map,
            &pricing,
            &mut tracker,
            1,
            "alice",
            ArrowType::Attack,
            vec![Coord::new(0, 0), Coord::new(1, 0)],
        );
        assert_eq!(second, CommandOutcome::Rejected(RejectionReason::InsufficientResources));
    }

    #[test]
    fn occupied_slot_is_rejected() {
        let map = uniform_grassland_map(10, 10);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        founded_nation(&mut registry, &mut matrix, &map, "alice");
        let pricing = ArrowPricingConfig::default();
        let mut tracker = FirstArrowTracker::new();
        let first = apply_draw_arrow(
            &mut registry,
            &map,
            &pricing,
            &mut tracker,
            0,
            "alice",
            ArrowType::Attack,
            vec![Coord::new(0, 0), Coord::new(1, 0)],
        );
        assert_eq!(first, CommandOutcome::Accepted);
        let second = apply_draw_arrow(
            &mut registry,
            &map,
            &pricing,
            &mut tracker,
            1,
            "alice",
            ArrowType::Attack,
            vec![Coord::new(0, 0), Coord::new(1, 0)],
        );
        assert_eq!(second, CommandOutcome::Rejected(RejectionReason::ArrowSlotOccupied));
    }
}
