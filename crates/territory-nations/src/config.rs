//! Configuration for arrow tuning, cost pricing, and structure defense
//! (§6, "arrow tuning" / "cost" / "structures").
//!
//! Mirrors the `#[serde(default = "...")]` pattern used for every tunable
//! in the room-level configuration bundle so a room can start from a
//! partial YAML document and fall back to the design brief's defaults.

use serde::{Deserialize, Serialize};

/// Per-tick pressure budget and candidate-generation tuning for the arrow
/// state machine (C5).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowConfig {
    /// Flat per-tick pressure budget component.
    #[serde(default = "default_pressure_per_tick")]
    pub pressure_per_tick: f64,

    /// Scaling factor applied to `sqrt(initialPower)`.
    #[serde(default = "default_pressure_per_sqrt_power")]
    pub pressure_per_sqrt_power: f64,

    /// Hard ceiling on the per-tick budget.
    #[serde(default = "default_max_pressure_per_tick")]
    pub max_pressure_per_tick: f64,

    /// Maximum candidates examined for conversion per tick.
    #[serde(default = "default_attempts_per_tick")]
    pub attempts_per_tick: u32,

    /// Maximum perpendicular distance from a candidate to the arrow path.
    #[serde(default = "default_path_corridor_radius")]
    pub path_corridor_radius: f64,

    /// Minimum owned 4-neighbors required for a non-spearhead candidate.
    #[serde(default = "default_min_owned_neighbors_for_stable")]
    pub min_owned_neighbors_for_stable: u32,

    /// Hard cap on the candidate set size.
    #[serde(default = "default_max_arrow_candidates")]
    pub max_arrow_candidates: usize,

    /// Consecutive zero-spend ticks before an arrow retires.
    #[serde(default = "default_max_stall_ticks")]
    pub max_stall_ticks: u32,

    /// Remaining power at or below which an arrow retires outright.
    #[serde(default = "default_retire_epsilon")]
    pub retire_epsilon: f64,

    /// Minimum arrow lifetime regardless of `initialPower`.
    #[serde(default = "default_min_arrow_duration_ms")]
    pub min_arrow_duration_ms: u64,

    /// Maximum arrow lifetime regardless of `initialPower`.
    #[serde(default = "default_max_arrow_duration_ms")]
    pub max_arrow_duration_ms: u64,

    /// Additional lifetime granted per unit of `initialPower`.
    #[serde(default = "default_arrow_duration_per_power_ms")]
    pub arrow_duration_per_power_ms: f64,

    /// Cells considered for the post-conversion hole-filling pass, scaled
    /// by territory size and clamped to `[4, 18]`.
    #[serde(default = "default_dynamic_fill_budget_floor")]
    pub dynamic_fill_budget_floor: u32,

    /// Upper clamp for the hole-filling budget.
    #[serde(default = "default_dynamic_fill_budget_ceiling")]
    pub dynamic_fill_budget_ceiling: u32,

    /// Scaling factor applied to `|territory|` for the hole-filling budget.
    #[serde(default = "default_dynamic_fill_budget_scale")]
    pub dynamic_fill_budget_scale: f64,

    /// Fraction of `pressurePerTick` returned to population each tick by
    /// a live defend arrow.
    #[serde(default = "default_defend_return_rate_fraction")]
    pub defend_return_rate_fraction: f64,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            pressure_per_tick: default_pressure_per_tick(),
            pressure_per_sqrt_power: default_pressure_per_sqrt_power(),
            max_pressure_per_tick: default_max_pressure_per_tick(),
            attempts_per_tick: default_attempts_per_tick(),
            path_corridor_radius: default_path_corridor_radius(),
            min_owned_neighbors_for_stable: default_min_owned_neighbors_for_stable(),
            max_arrow_candidates: default_max_arrow_candidates(),
            max_stall_ticks: default_max_stall_ticks(),
            retire_epsilon: default_retire_epsilon(),
            min_arrow_duration_ms: default_min_arrow_duration_ms(),
            max_arrow_duration_ms: default_max_arrow_duration_ms(),
            arrow_duration_per_power_ms: default_arrow_duration_per_power_ms(),
            dynamic_fill_budget_floor: default_dynamic_fill_budget_floor(),
            dynamic_fill_budget_ceiling: default_dynamic_fill_budget_ceiling(),
            dynamic_fill_budget_scale: default_dynamic_fill_budget_scale(),
            defend_return_rate_fraction: default_defend_return_rate_fraction(),
        }
    }
}

/// Pricing and distance/terrain-penalty tuning for the arrow cost formula
/// (§4.5, "Per-candidate cost").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConfig {
    /// Flat cost before any multiplier is applied.
    #[serde(default = "default_base_cost")]
    pub base_cost: f64,

    /// Flat defender defense before any multiplier is applied.
    #[serde(default = "default_base_defense")]
    pub base_defense: f64,

    /// Additional multiplier applied to a contested (enemy-owned) cell.
    #[serde(default = "default_contested_defense_mult")]
    pub contested_defense_mult: f64,

    /// Cost growth per tile of distance from the issuing nation's capital.
    #[serde(default = "default_distance_penalty_per_tile")]
    pub distance_penalty_per_tile: f64,

    /// Cap on the distance-penalty tile count.
    #[serde(default = "default_max_distance_penalty_tiles")]
    pub max_distance_penalty_tiles: f64,

    /// Cost multiplier for crossing a river cell.
    #[serde(default = "default_river_crossing_cost_mult")]
    pub river_crossing_cost_mult: f64,

    /// Cost multiplier for crossing a mountain cell.
    #[serde(default = "default_mountain_crossing_cost_mult")]
    pub mountain_crossing_cost_mult: f64,

    /// Coefficient `k` in `lossMult = 1 + k * (1 - similarity)`.
    #[serde(default = "default_similarity_loss_coefficient")]
    pub similarity_loss_coefficient: f64,

    /// Floor applied to the raw terrain-similarity factor.
    #[serde(default = "default_min_terrain_similarity")]
    pub min_terrain_similarity: f64,

    /// Defense multiplier applied to an encircled defender (§4.5).
    #[serde(default = "default_encircled_defense_mult")]
    pub encircled_defense_mult: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            base_cost: default_base_cost(),
            base_defense: default_base_defense(),
            contested_defense_mult: default_contested_defense_mult(),
            distance_penalty_per_tile: default_distance_penalty_per_tile(),
            max_distance_penalty_tiles: default_max_distance_penalty_tiles(),
            river_crossing_cost_mult: default_river_crossing_cost_mult(),
            mountain_crossing_cost_mult: default_mountain_crossing_cost_mult(),
            similarity_loss_coefficient: default_similarity_loss_coefficient(),
            min_terrain_similarity: default_min_terrain_similarity(),
            encircled_defense_mult: default_encircled_defense_mult(),
        }
    }
}

/// One defense-post tier's radius and effect (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefensePostConfig {
    /// Euclidean radius within which this post's effect applies.
    pub defense_radius: f64,
    /// Multiplier applied to defender defense inside the radius.
    pub troop_loss_multiplier: f64,
    /// Fractional reduction applied to attacker speed inside the radius.
    pub speed_reduction: f64,
}

/// Structure defense-post tiers (§4.6) and the town population bonus
/// feeding the population-cap formula (C2).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureConfig {
    /// Town/capital-tier defense post.
    #[serde(default = "default_town_post")]
    pub town: DefensePostConfig,

    /// Tower-tier defense post (stronger, larger radius).
    #[serde(default = "default_tower_post")]
    pub tower: DefensePostConfig,

    /// Flat population-cap bonus per town-tier city (C2's `townBonus`).
    #[serde(default = "default_town_population_bonus")]
    pub town_population_bonus: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            town: default_town_post(),
            tower: default_tower_post(),
            town_population_bonus: default_town_population_bonus(),
        }
    }
}

/// Bot cadence and targeting tuning for the bot director (C8).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Ticks between bot order cycles for a bot with no live attack arrow.
    #[serde(default = "default_bot_order_interval_ticks")]
    pub bot_order_interval_ticks: u32,

    /// Fraction of population committed to a bot-synthesized arrow.
    #[serde(default = "default_bot_attack_percent")]
    pub bot_attack_percent: f64,

    /// Size of the top-K pool a bot samples its candidate from.
    #[serde(default = "default_bot_candidate_pick_top")]
    pub bot_candidate_pick_top: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_order_interval_ticks: default_bot_order_interval_ticks(),
            bot_attack_percent: default_bot_attack_percent(),
            bot_candidate_pick_top: default_bot_candidate_pick_top(),
        }
    }
}

const fn default_pressure_per_tick() -> f64 {
    6.0
}
const fn default_pressure_per_sqrt_power() -> f64 {
    0.6
}
const fn default_max_pressure_per_tick() -> f64 {
    40.0
}
const fn default_attempts_per_tick() -> u32 {
    64
}
const fn default_path_corridor_radius() -> f64 {
    7.0
}
const fn default_min_owned_neighbors_for_stable() -> u32 {
    2
}
const fn default_max_arrow_candidates() -> usize {
    256
}
const fn default_max_stall_ticks() -> u32 {
    6
}
const fn default_retire_epsilon() -> f64 {
    3.0
}
const fn default_min_arrow_duration_ms() -> u64 {
    5_000
}
const fn default_max_arrow_duration_ms() -> u64 {
    600_000
}
const fn default_arrow_duration_per_power_ms() -> f64 {
    500.0
}
const fn default_dynamic_fill_budget_floor() -> u32 {
    4
}
const fn default_dynamic_fill_budget_ceiling() -> u32 {
    18
}
const fn default_dynamic_fill_budget_scale() -> f64 {
    0.008
}
const fn default_defend_return_rate_fraction() -> f64 {
    0.3
}

const fn default_base_cost() -> f64 {
    10.0
}
const fn default_base_defense() -> f64 {
    10.0
}
const fn default_contested_defense_mult() -> f64 {
    1.5
}
const fn default_distance_penalty_per_tile() -> f64 {
    0.01
}
const fn default_max_distance_penalty_tiles() -> f64 {
    60.0
}
const fn default_river_crossing_cost_mult() -> f64 {
    1.5
}
const fn default_mountain_crossing_cost_mult() -> f64 {
    2.0
}
const fn default_similarity_loss_coefficient() -> f64 {
    1.5
}
const fn default_min_terrain_similarity() -> f64 {
    0.3
}
const fn default_encircled_defense_mult() -> f64 {
    0.2
}

const fn default_town_post() -> DefensePostConfig {
    DefensePostConfig { defense_radius: 20.0, troop_loss_multiplier: 3.0, speed_reduction: 0.5 }
}
const fn default_tower_post() -> DefensePostConfig {
    DefensePostConfig { defense_radius: 40.0, troop_loss_multiplier: 6.0, speed_reduction: 0.66 }
}
const fn default_town_population_bonus() -> f64 {
    50.0
}

const fn default_bot_order_interval_ticks() -> u32 {
    25
}
const fn default_bot_attack_percent() -> f64 {
    0.3
}
const fn default_bot_candidate_pick_top() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_config_defaults_match_design_brief() {
        let cfg = ArrowConfig::default();
        assert!((cfg.path_corridor_radius - 7.0).abs() < f64::EPSILON);
        assert_eq!(cfg.min_owned_neighbors_for_stable, 2);
        assert_eq!(cfg.max_stall_ticks, 6);
        assert!((cfg.retire_epsilon - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn structure_config_tower_stronger_than_town() {
        let cfg = StructureConfig::default();
        assert!(cfg.tower.defense_radius > cfg.town.defense_radius);
        assert!(cfg.tower.troop_loss_multiplier > cfg.town.troop_loss_multiplier);
    }

    #[test]
    fn bot_config_defaults_are_sane_fractions() {
        let cfg = BotConfig::default();
        assert!(cfg.bot_attack_percent > 0.0 && cfg.bot_attack_percent < 1.0);
    }

    #[test]
    fn parse_partial_arrow_config_yaml() {
        let yaml = "pressurePerTick: 9.0\n";
        let cfg: ArrowConfig = serde_yml::from_str(yaml).unwrap_or_default();
        assert!((cfg.pressure_per_tick - 9.0).abs() < f64::EPSILON);
        assert!((cfg.path_corridor_radius - 7.0).abs() < f64::EPSILON);
    }
}
