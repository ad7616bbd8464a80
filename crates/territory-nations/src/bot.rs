//! Bot Director (C8, §4.8).
//!
//! Synthesizes a 2-point attack arrow for a bot nation that has no live
//! attack order, once every `botOrderIntervalTicks`, committing a fixed
//! fraction of its population.

use rand::Rng;
use territory_types::{Arrow, ArrowId, ArrowStatus, ArrowType, Coord, Nation, NationIdx};
use territory_world::{Map, OwnershipMatrix};

use crate::config::BotConfig;
use crate::registry::NationRegistry;

/// Whether `nation` should receive a new bot order this tick: it is a
/// bot, has no live attack arrow, and the interval has elapsed.
#[must_use]
pub fn due_for_order(nation: &Nation, current_tick: u64, config: &BotConfig) -> bool {
    nation.is_bot
        && nation.arrow_orders.attack.is_none()
        && u64::from(config.bot_order_interval_ticks) > 0
        && current_tick % u64::from(config.bot_order_interval_ticks) == 0
}

/// Score a frontier candidate for the bot director: resource nodes and
/// their neighbors score highest, then terrain similarity to the
/// anchor, then proximity to the nearest enemy capital (§4.8).
fn bot_score(candidate: Coord, map: &Map, anchor: Coord, nearest_enemy_capital: Option<Coord>) -> f64 {
    let Ok(cell) = map.cell(candidate.x, candidate.y) else {
        return f64::NEG_INFINITY;
    };
    let mut value = 0.0;
    if cell.resource_node.is_some() {
        value += 10.0;
    } else {
        let near_node = candidate
            .von_neumann_neighbors(map.width(), map.height())
            .iter()
            .any(|&n| map.cell(n.x, n.y).is_ok_and(|c| c.resource_node.is_some()));
        if near_node {
            value += 4.0;
        }
    }
    if let Ok(anchor_cell) = map.cell(anchor.x, anchor.y) {
        value += crate::biome::similarity(anchor_cell.biome, cell.biome) * 3.0;
    }
    if let Some(enemy_capital) = nearest_enemy_capital {
        let distance = f64::from(candidate.manhattan_distance(enemy_capital));
        value += 20.0 / (distance + 1.0);
    }
    value
}

/// Generate and score frontier candidates for a bot nation, reusing
/// [`crate::arrow::generate_candidates`]'s adjacency rule but with the
/// bot's own scoring function (§4.8).
fn candidates_for_bot(
    registry: &NationRegistry,
    matrix: &OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    anchor: Coord,
    nearest_enemy_capital: Option<Coord>,
) -> Vec<Coord> {
    let Some(border) = registry.border_of(nation) else {
        return Vec::new();
    };
    let mut seen = std::collections::BTreeSet::new();
    let mut scored = Vec::new();
    for &owned in border {
        for neighbor in owned.von_neumann_neighbors(map.width(), map.height()) {
            if matrix.get(neighbor.x, neighbor.y) == Some(nation) || !seen.insert(neighbor) {
                continue;
            }
            if !map.is_claimable(neighbor.x, neighbor.y) {
                continue;
            }
            scored.push((neighbor, bot_score(neighbor, map, anchor, nearest_enemy_capital)));
        }
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(c, _)| c).collect()
}

/// Synthesize a 2-point attack arrow for a due bot nation, deducting the
/// committed power from its population. Returns `None` (bot "sits out
/// this cycle") if candidate generation is empty.
pub fn synthesize_order<R: Rng + ?Sized>(
    registry: &mut NationRegistry,
    matrix: &OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    nearest_enemy_capital: Option<Coord>,
    config: &BotConfig,
    current_tick: u64,
    rng: &mut R,
) -> Option<Arrow> {
    let anchor = registry.get(nation)?.capital_cell?;
    let candidates = candidates_for_bot(registry, matrix, map, nation, anchor, nearest_enemy_capital);
    if candidates.is_empty() {
        return None;
    }
    let top_k = config.bot_candidate_pick_top.min(candidates.len()).max(1);
    let pick_idx = rng.random_range(0..top_k);
    let target = *candidates.get(pick_idx)?;

    let nation_state = registry.get_mut(nation)?;
    let commitment = config.bot_attack_percent.clamp(0.0, 1.0);
    let initial_power = nation_state.population * commitment;
    if initial_power <= 0.0 {
        return None;
    }
    nation_state.population -= initial_power;

    let arrow = Arrow {
        id: ArrowId::new(),
        kind: ArrowType::Attack,
        path: vec![anchor, target],
        current_index: 1,
        initial_power,
        remaining_power: initial_power,
        created_at_tick: current_tick,
        stalled_ticks: 0,
        troop_commitment: commitment,
        status: ArrowStatus::Advancing,
    };
    Some(arrow)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use territory_types::{NationStatus, ResourceBundle};
    use territory_world::uniform_grassland_map;

    fn bot_nation() -> Nation {
        Nation {
            owner: "bot-1".to_owned(),
            status: NationStatus::Active,
            is_bot: true,
            capital_cell: Some(Coord::new(5, 5)),
            cities: Vec::new(),
            population: 1000.0,
            max_population: 1000.0,
            resources: ResourceBundle::zero(),
            arrow_orders: territory_types::ArrowOrders::default(),
            territory_delta_outbound: territory_types::TerritoryDelta::empty(),
            territory_percentage: 0.0,
        }
    }

    #[test]
    fn due_for_order_requires_no_live_attack_arrow() {
        let config = BotConfig { bot_order_interval_ticks: 10, ..BotConfig::default() };
        let mut nation = bot_nation();
        assert!(due_for_order(&nation, 10, &config));
        nation.arrow_orders.attack = Some(Arrow {
            id: ArrowId::new(),
            kind: ArrowType::Attack,
            path: vec![Coord::new(0, 0), Coord::new(1, 0)],
            current_index: 1,
            initial_power: 10.0,
            remaining_power: 10.0,
            created_at_tick: 0,
            stalled_ticks: 0,
            troop_commitment: 0.3,
            status: ArrowStatus::Advancing,
        });
        assert!(!due_for_order(&nation, 10, &config));
    }

    #[test]
    fn synthesize_order_deducts_population_and_returns_two_point_path() {
        let map = uniform_grassland_map(20, 20);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let nation =
            registry.register("bot-1".to_owned(), Coord::new(5, 5), true, 1000.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, nation, Coord::new(5, 5)).unwrap();
        let config = BotConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let arrow =
            synthesize_order(&mut registry, &matrix, &map, nation, None, &config, 12, &mut rng).unwrap();
        assert_eq!(arrow.path.len(), 2);
        assert_eq!(arrow.path.first(), Some(&Coord::new(5, 5)));
        assert_eq!(arrow.created_at_tick, 12);
        assert!(registry.get(nation).unwrap().population < 1000.0);
    }

    #[test]
    fn sitting_out_when_no_candidates_available() {
        let map = uniform_grassland_map(1, 1);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let nation =
            registry.register("bot-1".to_owned(), Coord::new(0, 0), true, 1000.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, nation, Coord::new(0, 0)).unwrap();
        let config = BotConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let arrow = synthesize_order(&mut registry, &matrix, &map, nation, None, &config, 0, &mut rng);
        assert!(arrow.is_none());
    }
}
