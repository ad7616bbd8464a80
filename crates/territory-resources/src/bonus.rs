//! Per-nation passive bonus aggregation from confirmed resource-node
//! claims (§4.7, last sentence).

use territory_types::{BonusBundle, ClaimMap, NationIdx, ResourceNodeClaim};
use territory_world::Map;

use crate::config::ResourceConfig;

/// Recompute `nation`'s [`BonusBundle`] as the sum of `effect(type) *
/// nodeLevelMultiplier(level)` over every claim it owns.
///
/// `claims` carries no node level by itself (that lives on the map
/// cell), so this walks `claims` alongside `map` to look the level back
/// up per coordinate.
#[must_use]
pub fn compute_bonus(claims: &ClaimMap, map: &Map, nation: NationIdx, config: &ResourceConfig) -> BonusBundle {
    let mut bundle = BonusBundle::neutral();
    for (&coord, claim) in claims {
        if claim.owner != Some(nation.get()) {
            continue;
        }
        let Ok(cell) = map.cell(coord.x, coord.y) else { continue };
        let Some(node) = cell.resource_node else { continue };
        let level_mult = config.level_multiplier(node.level);
        let Some(effect) = config.resource_effects.get(&claim.resource) else { continue };
        bundle.expansion_bonus += effect.expansion_power * level_mult;
        bundle.attack_bonus += effect.attack_power * level_mult;
        bundle.defense_bonus += effect.defense_power * level_mult;
        bundle.production += effect.production * level_mult;
        bundle.gold_income += effect.gold_income * level_mult;
    }
    bundle
}

/// Recompute every nation's [`BonusBundle`] in one pass over `claims`,
/// indexed by [`NationIdx`] for direct use as the `bonuses` slice
/// `territory-nations::arrow` expects.
#[must_use]
pub fn compute_all_bonuses(
    claims: &ClaimMap,
    map: &Map,
    nation_count: usize,
    config: &ResourceConfig,
) -> Vec<BonusBundle> {
    let mut bundles = vec![BonusBundle::neutral(); nation_count];
    for (&coord, claim) in claims {
        let Some(owner_raw) = claim.owner else { continue };
        let Some(bundle) = bundles.get_mut(usize::from(owner_raw)) else { continue };
        let Ok(cell) = map.cell(coord.x, coord.y) else { continue };
        let Some(node) = cell.resource_node else { continue };
        let level_mult = config.level_multiplier(node.level);
        let Some(effect) = config.resource_effects.get(&claim.resource) else { continue };
        bundle.expansion_bonus += effect.expansion_power * level_mult;
        bundle.attack_bonus += effect.attack_power * level_mult;
        bundle.defense_bonus += effect.defense_power * level_mult;
        bundle.production += effect.production * level_mult;
        bundle.gold_income += effect.gold_income * level_mult;
    }
    bundles
}

/// Whether `claim` is currently confirmed (owned) by anyone.
#[must_use]
pub const fn is_confirmed(claim: &ResourceNodeClaim) -> bool {
    claim.owner.is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{Cell, Coord, Resource, ResourceNode};
    use territory_world::uniform_grassland_map;

    fn map_with_gold_node(at: Coord) -> Map {
        let base = uniform_grassland_map(5, 5);
        let cells = (0..base.len())
            .map(|i| {
                let (x, y) = base.coord_of(i).unwrap();
                if Coord::new(x, y) == at {
                    Cell {
                        biome: territory_types::Biome::Grassland,
                        is_river: false,
                        resource_node: Some(ResourceNode { resource: Resource::Gold, level: 2 }),
                        region_id: 0,
                    }
                } else {
                    *base.cell(x, y).unwrap()
                }
            })
            .collect::<Vec<_>>();
        Map::new(5, 5, cells).unwrap()
    }

    #[test]
    fn confirmed_claim_contributes_to_owner_bonus_only() {
        let at = Coord::new(2, 2);
        let map = map_with_gold_node(at);
        let config = ResourceConfig::default();
        let mut claims = ClaimMap::new();
        let mut claim = ResourceNodeClaim::new(Resource::Gold);
        claim.owner = Some(0);
        claims.insert(at, claim);

        let bonus_owner = compute_bonus(&claims, &map, NationIdx::new(0), &config);
        let bonus_other = compute_bonus(&claims, &map, NationIdx::new(1), &config);
        assert!(bonus_owner.gold_income > 0.0);
        assert!((bonus_other.gold_income - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn in_progress_claim_contributes_nothing() {
        let at = Coord::new(2, 2);
        let map = map_with_gold_node(at);
        let config = ResourceConfig::default();
        let mut claims = ClaimMap::new();
        let mut claim = ResourceNodeClaim::new(Resource::Gold);
        claim.progress_owner = Some(0);
        claim.progress = 5;
        claims.insert(at, claim);

        let bonus = compute_bonus(&claims, &map, NationIdx::new(0), &config);
        assert!((bonus.gold_income - 0.0).abs() < f64::EPSILON);
    }
}
