//! Arrow State Machine (C5, §4.5) -- the core of the core.
//!
//! Each live arrow is advanced exactly once per tick for its owning
//! nation: a per-tick pressure budget is spent converting candidate
//! cells, then the waypoint and retirement checks run.

use std::collections::BTreeSet;

use territory_types::{Arrow, ArrowStatus, BonusBundle, Coord, Nation, NationIdx};
use territory_world::{Map, OwnershipMatrix};

use crate::biome;
use crate::config::{ArrowConfig, CostConfig, StructureConfig};
use crate::defense;
use crate::registry::NationRegistry;

/// Result of processing one attack arrow for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowOutcome {
    /// The arrow remains live; `spent` pressure was committed to
    /// conversions this tick (may be zero).
    Active {
        /// Pressure committed to conversions this tick.
        spent: f64,
    },
    /// The arrow retired; `returned_power` must be added to the owning
    /// nation's population.
    Retired {
        /// Residual `remainingPower` returned to population.
        returned_power: f64,
    },
}

/// `budget = min(remainingPower, clamp(pressurePerTick +
/// sqrt(initialPower)*pressurePerSqrtPower, 1, maxPressurePerTick))`
/// (§4.5, "Per-tick pressure budget").
#[must_use]
pub fn per_tick_budget(arrow: &Arrow, config: &ArrowConfig) -> f64 {
    let raw = config.pressure_per_tick + arrow.initial_power.sqrt() * config.pressure_per_sqrt_power;
    let clamped = raw.clamp(1.0, config.max_pressure_per_tick);
    clamped.min(arrow.remaining_power)
}

/// Perpendicular distance from `point` to the segment `a -> b`, and the
/// normalized position `t` of the closest point along the segment.
fn point_to_segment(point: Coord, a: Coord, b: Coord) -> (f64, f64) {
    let (px, py) = (f64::from(point.x), f64::from(point.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    let dist = (px - cx).hypot(py - cy);
    (dist, t)
}

/// Minimum perpendicular distance from `point` to any segment of `path`,
/// along with a `[0, 1]` progress fraction of how far along the path the
/// closest point lies.
fn min_distance_to_path(point: Coord, path: &[Coord]) -> (f64, f64) {
    let mut best_dist = f64::INFINITY;
    let mut best_progress = 0.0;
    let segment_count = path.len().saturating_sub(1).max(1);
    for (i, pair) in path.windows(2).enumerate() {
        let (Some(&a), Some(&b)) = (pair.first(), pair.get(1)) else {
            continue;
        };
        let (dist, t) = point_to_segment(point, a, b);
        if dist < best_dist {
            best_dist = dist;
            #[allow(clippy::cast_precision_loss)]
            let progress = (i as f64 + t) / segment_count as f64;
            best_progress = progress;
        }
    }
    if best_dist.is_infinite() {
        (0.0, 0.0)
    } else {
        (best_dist, best_progress)
    }
}

/// Whether `coord` is near the arrow's "spearhead" -- within Manhattan
/// distance 2 of the current target waypoint, or within 1 of the path
/// itself -- and therefore exempt from the min-owned-neighbor stability
/// rule (§4.5).
fn is_spearhead(coord: Coord, arrow: &Arrow) -> bool {
    if let Some(waypoint) = arrow.current_waypoint() {
        if coord.manhattan_distance(waypoint) <= 2 {
            return true;
        }
    }
    min_distance_to_path(coord, &arrow.path).0 <= 1.0
}

/// Build the expansion candidate set for `nation`'s arrow this tick
/// (§4.5, "Candidate generation").
#[must_use]
pub fn generate_candidates(
    registry: &NationRegistry,
    matrix: &OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    arrow: &Arrow,
    config: &ArrowConfig,
) -> Vec<Coord> {
    let Some(border) = registry.border_of(nation) else {
        return Vec::new();
    };
    let mut seen = BTreeSet::new();
    let mut candidates = Vec::new();
    for &owned in border {
        for neighbor in owned.von_neumann_neighbors(map.width(), map.height()) {
            if matrix.get(neighbor.x, neighbor.y) == Some(nation) || !seen.insert(neighbor) {
                continue;
            }
            if !map.is_claimable(neighbor.x, neighbor.y) {
                continue;
            }
            let (dist, _) = min_distance_to_path(neighbor, &arrow.path);
            if dist > config.path_corridor_radius {
                continue;
            }
            if !is_spearhead(neighbor, arrow) {
                let owned_neighbors = neighbor
                    .von_neumann_neighbors(map.width(), map.height())
                    .iter()
                    .filter(|&&n| matrix.get(n.x, n.y) == Some(nation))
                    .count();
                #[allow(clippy::cast_possible_truncation)]
                if (owned_neighbors as u32) < config.min_owned_neighbors_for_stable {
                    continue;
                }
            }
            candidates.push(neighbor);
            if candidates.len() >= config.max_arrow_candidates {
                return candidates;
            }
        }
    }
    candidates
}

/// Score one candidate: higher is better (§4.5, "Scoring").
fn score(candidate: Coord, matrix: &OwnershipMatrix, map: &Map, nation: NationIdx, arrow: &Arrow) -> f64 {
    let owned_neighbors = candidate
        .von_neumann_neighbors(map.width(), map.height())
        .iter()
        .filter(|&&n| matrix.get(n.x, n.y) == Some(nation))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let mut compactness = owned_neighbors as f64;
    if owned_neighbors >= 3 {
        compactness += 5.0;
    }
    let (dist_to_path, progress) = min_distance_to_path(candidate, &arrow.path);
    let dist_to_waypoint = arrow
        .current_waypoint()
        .map_or(0.0, |w| f64::from(candidate.manhattan_distance(w)));
    let source_penalty = arrow.path.first().map_or(0.0, |&s| f64::from(candidate.manhattan_distance(s))) * 0.01;
    compactness.mul_add(2.0, progress * 10.0) - dist_to_path - dist_to_waypoint * 0.5 - source_penalty
}

/// Sort `candidates` by descending score (§4.5, "Sort descending").
fn sorted_by_score(
    mut candidates: Vec<Coord>,
    matrix: &OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    arrow: &Arrow,
) -> Vec<Coord> {
    candidates.sort_by(|&a, &b| {
        let sa = score(a, matrix, map, nation, arrow);
        let sb = score(b, matrix, map, nation, arrow);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Any 4-neighbor of `candidate` currently owned by `nation` ("source").
fn find_source(candidate: Coord, matrix: &OwnershipMatrix, map: &Map, nation: NationIdx) -> Option<Coord> {
    candidate
        .von_neumann_neighbors(map.width(), map.height())
        .into_iter()
        .find(|&n| matrix.get(n.x, n.y) == Some(nation))
}

/// The cost to convert `candidate` for `nation`, plus whether it is
/// currently enemy-owned and by whom (§4.5, "Per-candidate cost").
fn cost_of(
    candidate: Coord,
    source: Coord,
    matrix: &OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    registry: &NationRegistry,
    bonuses: &[BonusBundle],
    capital: Coord,
    cost_cfg: &CostConfig,
    structure_cfg: &StructureConfig,
) -> Option<(f64, Option<NationIdx>)> {
    let source_cell = map.cell(source.x, source.y).ok()?;
    let target_cell = map.cell(candidate.x, candidate.y).ok()?;
    let similarity = biome::similarity(source_cell.biome, target_cell.biome).max(cost_cfg.min_terrain_similarity);
    let loss_mult = 1.0 + cost_cfg.similarity_loss_coefficient * (1.0 - similarity);
    let speed_mult = 0.5 + 0.5 * similarity;
    let terrain_cross_mult = biome::crossing_cost_mult(
        target_cell.biome,
        cost_cfg.river_crossing_cost_mult,
        cost_cfg.mountain_crossing_cost_mult,
    );
    let target_terrain_mult = biome::defense_mult(target_cell.biome);
    let distance = f64::from(candidate.manhattan_distance(capital));
    let distance_penalty =
        1.0 + distance.min(cost_cfg.max_distance_penalty_tiles) * cost_cfg.distance_penalty_per_tile;

    let attacker_bonus = bonuses.get(usize::from(nation.get())).copied().unwrap_or_else(BonusBundle::neutral);
    let defender = matrix.get(candidate.x, candidate.y);

    let Some(defender_idx) = defender else {
        let cost = cost_cfg.base_cost * loss_mult * distance_penalty * terrain_cross_mult * target_terrain_mult
            / (attacker_bonus.expansion_bonus * speed_mult);
        return Some((cost, None));
    };

    let defender_nation: &Nation = registry.get(defender_idx)?;
    let defender_bonus =
        bonuses.get(usize::from(defender_idx.get())).copied().unwrap_or_else(BonusBundle::neutral);
    let structure_effect = defense::strongest_effect_at(defender_nation, candidate, structure_cfg);
    // Encirclement detection is deferred (§9 Open Question): every
    // defender is treated as non-encircled.
    let defense = cost_cfg.base_defense
        * defender_bonus.defense_bonus
        * cost_cfg.contested_defense_mult
        * target_terrain_mult
        * structure_effect.troop_loss_multiplier;
    let cost = cost_cfg.base_cost
        * loss_mult
        * defense
        * distance_penalty
        * terrain_cross_mult
        * target_terrain_mult
        / (attacker_bonus.attack_bonus * speed_mult * structure_effect.speed_multiplier);
    Some((cost, Some(defender_idx)))
}

/// Advance one live attack arrow for `nation` by one tick (§4.5).
#[allow(clippy::too_many_arguments)]
pub fn process_attack_arrow(
    registry: &mut NationRegistry,
    matrix: &mut OwnershipMatrix,
    map: &Map,
    nation: NationIdx,
    arrow: &mut Arrow,
    bonuses: &[BonusBundle],
    current_tick: u64,
    tick_rate_ms: u64,
    arrow_cfg: &ArrowConfig,
    cost_cfg: &CostConfig,
    structure_cfg: &StructureConfig,
) -> ArrowOutcome {
    let capital = registry.get(nation).and_then(|n| n.capital_cell).unwrap_or(Coord::new(0, 0));
    let budget = per_tick_budget(arrow, arrow_cfg);
    let raw_candidates = generate_candidates(registry, matrix, map, nation, arrow, arrow_cfg);
    let candidates = sorted_by_score(raw_candidates, matrix, map, nation, arrow);

    let mut spent = 0.0;
    let mut examined = 0u32;
    let mut advanced_this_tick = false;
    for candidate in candidates {
        if examined >= arrow_cfg.attempts_per_tick || spent >= budget {
            break;
        }
        examined = examined.saturating_add(1);
        if matrix.get(candidate.x, candidate.y) == Some(nation) {
            continue;
        }
        let Some(source) = find_source(candidate, matrix, map, nation) else {
            continue;
        };
        let Some((cost, defender)) = cost_of(
            candidate, source, matrix, map, nation, registry, bonuses, capital, cost_cfg, structure_cfg,
        ) else {
            continue;
        };
        if budget - spent < cost {
            continue;
        }
        if let Some(defender_idx) = defender {
            let _ = registry.remove_cell(matrix, map, defender_idx, candidate);
        }
        if registry.add_cell(matrix, map, nation, candidate).is_ok() {
            spent += cost;
            advanced_this_tick = true;
        }
    }

    arrow.remaining_power = (arrow.remaining_power - spent).max(0.0);

    if advanced_this_tick {
        if let Some(waypoint) = arrow.current_waypoint() {
            let near_waypoint = registry
                .territory_of(nation)
                .is_some_and(|territory| territory.iter().any(|&c| c.manhattan_distance(waypoint) <= 2));
            if near_waypoint && !arrow.at_final_waypoint() {
                arrow.current_index = arrow.current_index.saturating_add(1);
            }
        }
    }

    if spent > 0.0 {
        arrow.stalled_ticks = 0;
    } else {
        arrow.stalled_ticks = arrow.stalled_ticks.saturating_add(1);
    }

    update_status(arrow, advanced_this_tick, spent);

    let age_ms = current_tick.saturating_sub(arrow.created_at_tick).saturating_mul(tick_rate_ms);
    #[allow(clippy::cast_precision_loss)]
    let expiry_ms = (arrow_cfg.min_arrow_duration_ms as f64 + arrow.initial_power * arrow_cfg.arrow_duration_per_power_ms)
        .clamp(arrow_cfg.min_arrow_duration_ms as f64, arrow_cfg.max_arrow_duration_ms as f64);
    #[allow(clippy::cast_precision_loss)]
    let age_ms_f64 = age_ms as f64;

    if arrow.remaining_power <= arrow_cfg.retire_epsilon
        || arrow.stalled_ticks >= arrow_cfg.max_stall_ticks
        || age_ms_f64 > expiry_ms
    {
        ArrowOutcome::Retired { returned_power: arrow.remaining_power.max(0.0) }
    } else {
        ArrowOutcome::Active { spent }
    }
}

/// Recompute an arrow's derived visual-hint status (§4.5, "State labels").
fn update_status(arrow: &mut Arrow, advanced: bool, spent: f64) {
    arrow.status = if advanced {
        ArrowStatus::Advancing
    } else if spent > 0.0 {
        ArrowStatus::Consolidating
    } else if arrow.stalled_ticks > 0 {
        ArrowStatus::Stalled
    } else {
        arrow.status
    };
}

/// Outcome of advancing a defend arrow by one tick: the power returned to
/// the nation's population this tick, and whether the arrow retired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefendTickOutcome {
    /// Power handed back to `population` this tick, every tick (§4.5,
    /// "return `defendReturnRate` power to population").
    pub returned: f64,
    /// Whether `remaining_power` has drained enough to retire the arrow.
    pub retired: bool,
}

/// Advance one live defend arrow by one tick (§4.5, "Defend arrow").
pub fn process_defend_arrow(arrow: &mut Arrow, arrow_cfg: &ArrowConfig) -> DefendTickOutcome {
    let return_rate = arrow_cfg.pressure_per_tick * arrow_cfg.defend_return_rate_fraction;
    let returned = return_rate.min(arrow.remaining_power);
    arrow.remaining_power -= returned;
    let retired = arrow.remaining_power <= 0.5;
    if retired {
        let leftover = arrow.remaining_power.max(0.0);
        arrow.remaining_power = 0.0;
        DefendTickOutcome { returned: returned + leftover, retired }
    } else {
        DefendTickOutcome { returned, retired }
    }
}

/// Hole-filling pass: convert small, fully-surrounded gaps in `nation`'s
/// territory for free, up to a budget scaled by territory size (§4.5,
/// "Hole-filling pass").
pub fn hole_fill(registry: &mut NationRegistry, matrix: &mut OwnershipMatrix, map: &Map, nation: NationIdx, config: &ArrowConfig) {
    let Some(territory_len) = registry.territory_of(nation).map(std::collections::BTreeSet::len) else {
        return;
    };
    #[allow(clippy::cast_precision_loss)]
    let budget_f64 = (territory_len as f64 * config.dynamic_fill_budget_scale)
        .clamp(f64::from(config.dynamic_fill_budget_floor), f64::from(config.dynamic_fill_budget_ceiling));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let budget = budget_f64 as u32;

    let Some(border) = registry.border_of(nation).cloned() else {
        return;
    };
    let mut filled = 0u32;
    let mut seen = BTreeSet::new();
    for owned in border {
        if filled >= budget {
            break;
        }
        for neighbor in owned.von_neumann_neighbors(map.width(), map.height()) {
            if filled >= budget || !seen.insert(neighbor) {
                continue;
            }
            if matrix.get(neighbor.x, neighbor.y).is_some() || !map.is_claimable(neighbor.x, neighbor.y) {
                continue;
            }
            let owned_neighbors = neighbor
                .von_neumann_neighbors(map.width(), map.height())
                .iter()
                .filter(|&&n| matrix.get(n.x, n.y) == Some(nation))
                .count();
            if owned_neighbors >= 3 && registry.add_cell(matrix, map, nation, neighbor).is_ok() {
                filled = filled.saturating_add(1);
            }
        }
    }
}
