//! Resource tuning: capture rate, per-level multipliers, and per-resource
//! bonus effects feeding §4.5 and the population-growth formula (§6,
//! "resourceCaptureTicks, resourceNodeLevelMultipliers, resourceEffects").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use territory_types::Resource;

/// Per-resource bonus effect a confirmed claim of that resource type
/// confers, before the node's level multiplier is applied (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEffect {
    /// Added to [`territory_types::BonusBundle::expansion_bonus`].
    pub expansion_power: f64,
    /// Added to [`territory_types::BonusBundle::attack_bonus`].
    pub attack_power: f64,
    /// Added to [`territory_types::BonusBundle::defense_bonus`].
    pub defense_power: f64,
    /// Added to [`territory_types::BonusBundle::production`].
    pub production: f64,
    /// Added to [`territory_types::BonusBundle::gold_income`].
    pub gold_income: f64,
}

impl ResourceEffect {
    /// No bonus contribution at all.
    #[must_use]
    pub const fn zero() -> Self {
        Self { expansion_power: 0.0, attack_power: 0.0, defense_power: 0.0, production: 0.0, gold_income: 0.0 }
    }
}

/// Resource-node claim and bonus tuning (C7).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    /// Consecutive ticks of continuous ownership required to confirm a claim.
    #[serde(default = "default_capture_ticks")]
    pub capture_ticks: u32,

    /// Multiplier applied per node level (index `level - 1`; levels `1..=5`).
    #[serde(default = "default_resource_node_level_multipliers")]
    pub resource_node_level_multipliers: Vec<f64>,

    /// Per-resource bonus effect, applied once per confirmed claim of that
    /// resource and scaled by the node's level multiplier.
    #[serde(default = "default_resource_effects")]
    pub resource_effects: BTreeMap<Resource, ResourceEffect>,
}

impl ResourceConfig {
    /// The level multiplier for a node of the given `level` (`1`-based),
    /// clamped to the last configured tier if `level` exceeds the table.
    #[must_use]
    pub fn level_multiplier(&self, level: u8) -> f64 {
        let index = usize::from(level.saturating_sub(1));
        self.resource_node_level_multipliers
            .get(index)
            .or_else(|| self.resource_node_level_multipliers.last())
            .copied()
            .unwrap_or(1.0)
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            capture_ticks: default_capture_ticks(),
            resource_node_level_multipliers: default_resource_node_level_multipliers(),
            resource_effects: default_resource_effects(),
        }
    }
}

const fn default_capture_ticks() -> u32 {
    20
}

fn default_resource_node_level_multipliers() -> Vec<f64> {
    vec![1.0, 1.5, 2.0, 2.5, 3.0]
}

fn default_resource_effects() -> BTreeMap<Resource, ResourceEffect> {
    let mut map = BTreeMap::new();
    map.insert(Resource::Food, ResourceEffect { expansion_power: 0.05, ..ResourceEffect::zero() });
    map.insert(Resource::Wood, ResourceEffect { production: 1.0, ..ResourceEffect::zero() });
    map.insert(Resource::Stone, ResourceEffect { defense_power: 0.1, ..ResourceEffect::zero() });
    map.insert(Resource::Iron, ResourceEffect { attack_power: 0.1, ..ResourceEffect::zero() });
    map.insert(Resource::Gold, ResourceEffect { gold_income: 1.0, ..ResourceEffect::zero() });
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_multiplier_clamps_above_table_length() {
        let config = ResourceConfig::default();
        assert!((config.level_multiplier(1) - 1.0).abs() < f64::EPSILON);
        assert!((config.level_multiplier(100) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_effects_cover_every_resource() {
        let config = ResourceConfig::default();
        for resource in Resource::ALL {
            assert!(config.resource_effects.contains_key(&resource));
        }
    }

    #[test]
    fn parse_partial_resource_config_yaml() {
        let yaml = "captureTicks: 30\n";
        let config: ResourceConfig = serde_yml::from_str(yaml).unwrap_or_else(|_| ResourceConfig::default());
        assert_eq!(config.capture_ticks, 30);
        assert_eq!(config.resource_node_level_multipliers.len(), 5);
    }
}
