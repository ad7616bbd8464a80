//! Room-level configuration bundle (§6).
//!
//! Aggregates every tunable the map/lobby layer supplies at room start
//! into one strongly-typed structure, loadable from a partial YAML
//! document via the same `#[serde(default = "...")]` pattern used by
//! every sub-config (`territory-nations::config`, `territory-resources::config`).

use serde::{Deserialize, Serialize};
use territory_nations::{ArrowConfig, BotConfig, CostConfig, StructureConfig};
use territory_resources::ResourceConfig;

/// Per-resource player pricing for drawing a new arrow (§6, "player arrow
/// pricing"), distinct from [`CostConfig`]'s per-tile troop-conversion cost.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowPriceTier {
    /// Flat price charged once per arrow.
    #[serde(default = "default_price_base")]
    pub base: f64,
    /// Additional price per tile of the drawn path's length.
    #[serde(default = "default_price_per_tile")]
    pub per_tile: f64,
}

impl Default for ArrowPriceTier {
    fn default() -> Self {
        Self { base: default_price_base(), per_tile: default_price_per_tile() }
    }
}

/// Player-facing arrow-drawing price, charged against the issuer's
/// treasury at command-validation time (§6, §7 "insufficient resources").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowPricingConfig {
    /// Food price tier.
    #[serde(default)]
    pub food: ArrowPriceTier,
    /// Gold price tier.
    #[serde(default)]
    pub gold: ArrowPriceTier,
    /// Whether every nation's first arrow is free regardless of treasury.
    #[serde(default = "default_first_arrow_free")]
    pub first_arrow_free: bool,
    /// Fraction of population committed to a player-drawn arrow, mirroring
    /// `BotConfig::bot_attack_percent`'s role for bot-synthesized ones.
    #[serde(default = "default_player_attack_percent")]
    pub player_attack_percent: f64,
}

impl Default for ArrowPricingConfig {
    fn default() -> Self {
        Self {
            food: ArrowPriceTier::default(),
            gold: ArrowPriceTier::default(),
            first_arrow_free: default_first_arrow_free(),
            player_attack_percent: default_player_attack_percent(),
        }
    }
}

impl ArrowPricingConfig {
    /// The food/gold price of an arrow with the given path length in tiles.
    #[must_use]
    pub fn price_of(&self, path_len: usize) -> (f64, f64) {
        #[allow(clippy::cast_precision_loss)]
        let tiles = path_len as f64;
        let food = self.food.base + self.food.per_tile * tiles;
        let gold = self.gold.base + self.gold.per_tile * tiles;
        (food, gold)
    }
}

/// Population-growth shape tuning (§4.10 step 2, "grow population").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthConfig {
    /// Base per-tick growth rate, scaled by `(1 - population/maxPopulation)`.
    #[serde(default = "default_growth_base_rate")]
    pub growth_base_rate: f64,
    /// `k` in `maxPopulation = k * |territory|^0.6 + townBonus*townCount + floor`.
    /// `townBonus` itself is `StructureConfig::town_population_bonus` (§6,
    /// "town.populationBonus"), not duplicated here.
    #[serde(default = "default_territory_population_k")]
    pub territory_population_k: f64,
    /// Flat additive floor under every nation's population cap.
    #[serde(default = "default_population_floor")]
    pub population_floor: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            growth_base_rate: default_growth_base_rate(),
            territory_population_k: default_territory_population_k(),
            population_floor: default_population_floor(),
        }
    }
}

/// Tick cadence and world-level tuning not owned by any lower crate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    /// Nominal wall-clock interval between ticks (§4.10, "nominal 200 ms").
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Ticks between connectivity audits (§4.4).
    #[serde(default = "default_connectivity_check_interval_ticks")]
    pub connectivity_check_interval_ticks: u32,

    /// Territory-share threshold at which a nation wins (§4.10, "win
    /// condition").
    #[serde(default = "default_win_condition_percentage")]
    pub win_condition_percentage: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            connectivity_check_interval_ticks: default_connectivity_check_interval_ticks(),
            win_condition_percentage: default_win_condition_percentage(),
        }
    }
}

/// Structured-logging verbosity, mirroring the ambient logging layer
/// every crate in this workspace emits through (§7, failure logging).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing`/`tracing-subscriber` filter directive, e.g. `"info"` or
    /// `"territory_core=debug,territory_nations=warn"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

/// The complete, strongly-typed room configuration bundle (§6).
///
/// Constructed by the map/lobby layer at room start and read-only
/// thereafter (§5, "Configuration is read-only after room startup").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Tick cadence, connectivity interval, win threshold.
    #[serde(default)]
    pub world: WorldConfig,
    /// Population-growth shape tuning.
    #[serde(default)]
    pub growth: GrowthConfig,
    /// Arrow pressure-budget and candidate-generation tuning (C5).
    #[serde(default)]
    pub arrow: ArrowConfig,
    /// Per-tile troop-conversion cost tuning (§4.5).
    #[serde(default)]
    pub cost: CostConfig,
    /// Defense-post tiers and town population bonus (C6).
    #[serde(default)]
    pub structure: StructureConfig,
    /// Player-facing arrow-drawing price (§6).
    #[serde(default)]
    pub arrow_pricing: ArrowPricingConfig,
    /// Resource-node claim and bonus tuning (C7).
    #[serde(default)]
    pub resource: ResourceConfig,
    /// Bot Director cadence and targeting tuning (C8).
    #[serde(default)]
    pub bot: BotConfig,
    /// Structured-logging verbosity.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Parse a (possibly partial) YAML document into a full configuration,
    /// falling back to defaults for every key left unspecified.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_yml` error if the document is not
    /// valid YAML or a field present in it has the wrong shape.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(yaml)
    }
}

const fn default_growth_base_rate() -> f64 {
    2.0
}
const fn default_territory_population_k() -> f64 {
    15.0
}
const fn default_population_floor() -> f64 {
    10.0
}
const fn default_tick_rate_ms() -> u64 {
    200
}
const fn default_connectivity_check_interval_ticks() -> u32 {
    3
}
const fn default_win_condition_percentage() -> f64 {
    50.0
}
const fn default_price_base() -> f64 {
    0.0
}
const fn default_price_per_tile() -> f64 {
    0.0
}
const fn default_first_arrow_free() -> bool {
    true
}
const fn default_player_attack_percent() -> f64 {
    0.3
}
fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let cfg = SimulationConfig::default();
        let yaml = serde_yml::to_string(&cfg).expect("serialize");
        let restored = SimulationConfig::from_yaml_str(&yaml).expect("parse");
        assert_eq!(cfg, restored);
    }

    #[test]
    fn parse_partial_config_falls_back_to_defaults() {
        let yaml = "world:\n  tickRateMs: 250\n";
        let cfg = SimulationConfig::from_yaml_str(yaml).expect("parse");
        assert_eq!(cfg.world.tick_rate_ms, 250);
        assert_eq!(cfg.world.connectivity_check_interval_ticks, 3);
        assert!(cfg.arrow_pricing.first_arrow_free);
    }

    #[test]
    fn arrow_pricing_scales_with_path_length() {
        let cfg = ArrowPricingConfig {
            food: ArrowPriceTier { base: 5.0, per_tile: 1.0 },
            gold: ArrowPriceTier { base: 0.0, per_tile: 0.5 },
            first_arrow_free: false,
            player_attack_percent: 0.3,
        };
        let (food, gold) = cfg.price_of(10);
        assert!((food - 15.0).abs() < f64::EPSILON);
        assert!((gold - 5.0).abs() < f64::EPSILON);
    }
}
