//! Connectivity Checker (C4, §4.4).
//!
//! Runs every `connectivityCheckIntervalTicks` (or whenever a nation lost
//! a cell this tick). BFS from the capital through owned 4-neighbors;
//! anything unreached is pruned. A nation that has lost its capital cell
//! either hands the role to its nearest surviving town (succession) or,
//! absent a candidate, is defeated outright.

use std::collections::{BTreeSet, VecDeque};

use territory_nations::NationRegistry;
use territory_types::{CityType, Coord, NationIdx, NationStatus};
use territory_world::{Map, OwnershipMatrix};
use tracing::{info, warn};

/// Run the connectivity audit for every non-defeated nation.
///
/// Returns `true` if any nation had cells pruned, underwent succession,
/// or was defeated.
pub fn run_connectivity_pass(registry: &mut NationRegistry, matrix: &mut OwnershipMatrix, map: &Map) -> bool {
    let nations: Vec<NationIdx> = registry.iter().map(|(idx, _)| idx).collect();
    let mut any = false;
    for idx in nations {
        if audit_nation(registry, matrix, map, idx) {
            any = true;
        }
    }
    any
}

/// Run the connectivity audit for a single nation (§4.4).
pub fn audit_nation(registry: &mut NationRegistry, matrix: &mut OwnershipMatrix, map: &Map, nation: NationIdx) -> bool {
    let Some(nation_state) = registry.get(nation) else { return false };
    if nation_state.status != NationStatus::Active {
        return false;
    }
    let Some(capital) = nation_state.capital_cell else { return false };
    let Some(territory) = registry.territory_of(nation) else { return false };
    if !territory.contains(&capital) {
        return handle_lost_capital(registry, matrix, map, nation);
    }

    let territory_snapshot = territory.clone();
    let reachable = flood_fill(&territory_snapshot, capital, map, matrix, nation);
    let mut pruned = false;
    for &coord in territory_snapshot.difference(&reachable) {
        if registry.remove_cell(matrix, map, nation, coord).is_ok() {
            pruned = true;
        }
    }
    if pruned {
        warn!(nation = %nation, "connectivity audit pruned disconnected territory");
    }
    pruned
}

/// BFS from `capital` through cells owned by `nation`, 4-connected.
fn flood_fill(
    territory: &BTreeSet<Coord>,
    capital: Coord,
    map: &Map,
    matrix: &OwnershipMatrix,
    nation: NationIdx,
) -> BTreeSet<Coord> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    if territory.contains(&capital) {
        visited.insert(capital);
        queue.push_back(capital);
    }
    while let Some(current) = queue.pop_front() {
        for neighbor in current.von_neumann_neighbors(map.width(), map.height()) {
            if matrix.get(neighbor.x, neighbor.y) == Some(nation) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    visited
}

/// A nation's capital cell is no longer owned: promote the nearest
/// surviving town, or defeat the nation if none remains (§4.4).
fn handle_lost_capital(
    registry: &mut NationRegistry,
    matrix: &mut OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
) -> bool {
    let Some(nation_state) = registry.get(nation) else { return false };
    let old_capital = nation_state.capital_cell;
    let territory = registry.territory_of(nation).cloned().unwrap_or_default();
    let Some(nation_state) = registry.get(nation) else { return false };
    let candidate = nation_state
        .cities
        .iter()
        .filter(|c| c.kind == CityType::Town && territory.contains(&c.at))
        .min_by_key(|c| old_capital.map_or(0, |cap| cap.manhattan_distance(c.at)))
        .map(|c| c.at);

    let Some(new_capital) = candidate else {
        let erased = registry.erase_territory(matrix, nation);
        if let Some(n) = registry.get_mut(nation) {
            n.status = NationStatus::Defeated;
            n.capital_cell = None;
            n.cities.clear();
        }
        warn!(nation = %nation, cells_erased = erased.len(), "nation defeated: no succession candidate");
        return true;
    };

    if let Some(n) = registry.get_mut(nation) {
        n.cities.retain(|c| c.kind != CityType::Capital);
        if let Some(town) = n.cities.iter_mut().find(|c| c.at == new_capital) {
            town.kind = CityType::Capital;
        }
        n.capital_cell = Some(new_capital);
    }
    let _ = map;
    info!(nation = %nation, x = new_capital.x, y = new_capital.y, "capital succession");
    true
}
