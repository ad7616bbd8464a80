//! Resource-Node Claim System (C7, §4.7).
//!
//! Each tick, every owned cell carrying a resource node advances its
//! claim's progress counter; once `progress >= captureTicks` the claim's
//! confirmed owner flips to the nation that has held the cell
//! continuously for that long.

use territory_types::{ClaimMap, Coord, NationIdx, ResourceNodeClaim};
use territory_world::{Map, OwnershipMatrix};
use tracing::debug;

use crate::config::ResourceConfig;

/// Advance every resource-node claim by one tick (§4.7).
///
/// For each cell that carries a resource node and is currently owned:
/// look up (or create) its claim; if the current owner differs from
/// `progressOwner`, progress resets to the new owner, otherwise it
/// increments. Claims reaching `captureTicks` confirm ownership.
pub fn advance_claims(claims: &mut ClaimMap, matrix: &OwnershipMatrix, map: &Map, config: &ResourceConfig) {
    for y in 0..map.height() {
        for x in 0..map.width() {
            let coord = Coord::new(x, y);
            let Ok(cell) = map.cell(x, y) else { continue };
            let Some(node) = cell.resource_node else { continue };
            let Some(current_owner) = matrix.get(x, y) else {
                continue;
            };
            let claim = claims
                .entry(coord)
                .or_insert_with(|| ResourceNodeClaim::new(node.resource));
            if claim.progress_owner != Some(current_owner.get()) {
                claim.progress_owner = Some(current_owner.get());
                claim.progress = 1;
            } else {
                claim.progress = claim.progress.saturating_add(1);
            }
            if claim.progress >= config.capture_ticks && claim.owner != claim.progress_owner {
                claim.owner = claim.progress_owner;
                debug!(x, y, resource = ?claim.resource, owner = ?claim.owner, "resource node claim confirmed");
            }
        }
    }
}

/// Drop every claim on a cell no longer owned by anyone, called after a
/// nation loses territory so stale in-progress claims do not linger
/// forever on abandoned nodes. Confirmed claims (`owner.is_some()`) are
/// retained even if the cell is currently unowned, matching §4.7's
/// silence on confirmed-claim expiry -- once captured, a node's bonus
/// keeps accruing to its confirmed owner regardless of later contest.
pub fn prune_unowned_in_progress(claims: &mut ClaimMap, matrix: &OwnershipMatrix) {
    claims.retain(|&coord, claim| claim.owner.is_some() || matrix.get(coord.x, coord.y).is_some());
}

/// Every claim currently confirmed for `nation`.
pub fn claims_owned_by(claims: &ClaimMap, nation: NationIdx) -> impl Iterator<Item = &ResourceNodeClaim> {
    claims.values().filter(move |c| c.owner == Some(nation.get()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{Cell, Resource, ResourceNode};
    use territory_world::uniform_grassland_map;

    fn map_with_gold_node(width: u32, height: u32, at: Coord) -> Map {
        let base = uniform_grassland_map(width, height);
        let mut cells = (0..base.len())
            .map(|i| {
                let (x, y) = base.coord_of(i).unwrap();
                if Coord::new(x, y) == at {
                    Cell {
                        biome: territory_types::Biome::Grassland,
                        is_river: false,
                        resource_node: Some(ResourceNode { resource: Resource::Gold, level: 1 }),
                        region_id: 0,
                    }
                } else {
                    *base.cell(x, y).unwrap()
                }
            })
            .collect::<Vec<_>>();
        cells.truncate(base.len());
        Map::new(width, height, cells).unwrap()
    }

    #[test]
    fn claim_confirms_ownership_after_capture_ticks() {
        let at = Coord::new(2, 2);
        let map = map_with_gold_node(5, 5, at);
        let mut matrix = OwnershipMatrix::new(&map);
        matrix.set(at.x, at.y, NationIdx::new(0)).unwrap();
        let config = ResourceConfig { capture_ticks: 3, ..ResourceConfig::default() };
        let mut claims = ClaimMap::new();

        for _ in 0..3 {
            advance_claims(&mut claims, &matrix, &map, &config);
        }
        let claim = claims.get(&at).unwrap();
        assert_eq!(claim.owner, Some(0));
    }

    #[test]
    fn ownership_change_resets_progress() {
        let at = Coord::new(2, 2);
        let map = map_with_gold_node(5, 5, at);
        let mut matrix = OwnershipMatrix::new(&map);
        matrix.set(at.x, at.y, NationIdx::new(0)).unwrap();
        let config = ResourceConfig { capture_ticks: 5, ..ResourceConfig::default() };
        let mut claims = ClaimMap::new();
        advance_claims(&mut claims, &matrix, &map, &config);
        advance_claims(&mut claims, &matrix, &map, &config);
        matrix.set(at.x, at.y, NationIdx::new(1)).unwrap();
        advance_claims(&mut claims, &matrix, &map, &config);
        let claim = claims.get(&at).unwrap();
        assert_eq!(claim.progress, 1);
        assert_eq!(claim.progress_owner, Some(1));
    }
}
