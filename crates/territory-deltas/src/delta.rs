//! Delta Encoder (C9, §4.9).
//!
//! Runs at the end of every tick, after territory mutation and the
//! connectivity audit have settled the ownership matrix for this tick.
//! Diffs `current` against `previous` cell by cell and appends each
//! changed coordinate onto the relevant nation's outbound delta. A
//! defeated nation's full prior territory is not special-cased here: by
//! the time this runs, [`territory_nations::NationRegistry::erase_territory`]
//! has already cleared its cells in the matrix, so every one of them
//! already appears as an ordinary `sub` in the diff below.
//!
//! Callers are expected to clear each nation's
//! [`territory_types::TerritoryDelta`] immediately after publishing the
//! outbound tick message; this module only ever appends.

use territory_nations::NationRegistry;
use territory_types::{Coord, FullTerritoryView, NationIdx};
use territory_world::{Map, OwnershipMatrix};

/// Diff `matrix.current` against `matrix.previous` and append every
/// changed cell onto the owning/losing nation's outbound delta, then
/// recompute every nation's `territoryPercentage`.
///
/// `matrix` must already have been advanced to reflect this tick's final
/// ownership state; `matrix.previous` is expected to still hold the
/// state as of the end of the prior tick (i.e. [`OwnershipMatrix::snapshot`]
/// has not yet been called for this tick).
pub fn encode_deltas(registry: &mut NationRegistry, matrix: &OwnershipMatrix, map: &Map) {
    for (key, current) in matrix.iter_current() {
        let previous = matrix.raw_previous(key);
        if previous == current {
            continue;
        }
        let Some((x, y)) = map.coord_of(key) else { continue };
        let coord = Coord::new(x, y);
        if previous != NationIdx::UNOWNED {
            if let Some(nation) = registry.get_mut(NationIdx::new(previous)) {
                nation.territory_delta_outbound.sub.push(coord);
            }
        }
        if current != NationIdx::UNOWNED {
            if let Some(nation) = registry.get_mut(NationIdx::new(current)) {
                nation.territory_delta_outbound.add.push(coord);
            }
        }
    }
    recompute_territory_percentages(registry, map);
}

/// Derive a [`FullTerritoryView`] of `idx`'s entire current territory,
/// sent instead of a delta on new client connect (§4.9, §6) rather than
/// accumulated incrementally like `territory_delta_outbound`.
#[must_use]
pub fn full_territory_view(registry: &NationRegistry, idx: NationIdx) -> Option<FullTerritoryView> {
    let nation = registry.get(idx)?;
    let territory = registry.territory_of(idx).into_iter().flatten().copied().collect();
    Some(FullTerritoryView { owner: nation.owner.clone(), territory })
}

/// Recompute every nation's `territoryPercentage` as
/// `100 * |territory| / totalClaimableCells` (§4.9).
pub fn recompute_territory_percentages(registry: &mut NationRegistry, map: &Map) {
    #[allow(clippy::cast_precision_loss)]
    let total = f64::from(map.claimable_cell_count()).max(1.0);
    let percentages: Vec<(NationIdx, f64)> = registry
        .iter()
        .map(|(idx, _)| {
            let owned = registry.territory_of(idx).map_or(0, std::collections::BTreeSet::len);
            #[allow(clippy::cast_precision_loss)]
            let pct = (owned as f64 / total) * 100.0;
            (idx, pct)
        })
        .collect();
    for (idx, pct) in percentages {
        if let Some(nation) = registry.get_mut(idx) {
            nation.territory_percentage = pct;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::ResourceBundle;
    use territory_world::uniform_grassland_map;

    #[test]
    fn add_cell_appears_in_new_owners_add_stream() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("alice".to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, a, Coord::new(0, 0)).unwrap();

        encode_deltas(&mut registry, &matrix, &map);

        let nation = registry.get(a).unwrap();
        assert_eq!(nation.territory_delta_outbound.add, vec![Coord::new(0, 0)]);
        assert!(nation.territory_delta_outbound.sub.is_empty());
    }

    #[test]
    fn lost_cell_appears_in_previous_owners_sub_stream() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("alice".to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, a, Coord::new(0, 0)).unwrap();
        matrix.snapshot();
        registry.remove_cell(&mut matrix, &map, a, Coord::new(0, 0)).unwrap();

        encode_deltas(&mut registry, &matrix, &map);

        let nation = registry.get(a).unwrap();
        assert_eq!(nation.territory_delta_outbound.sub, vec![Coord::new(0, 0)]);
    }

    #[test]
    fn unchanged_cells_produce_no_delta() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("alice".to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, a, Coord::new(0, 0)).unwrap();
        matrix.snapshot();

        encode_deltas(&mut registry, &matrix, &map);

        let nation = registry.get(a).unwrap();
        assert!(nation.territory_delta_outbound.is_empty());
    }

    #[test]
    fn full_territory_view_lists_every_owned_cell() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("alice".to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        registry.add_cell(&mut matrix, &map, a, Coord::new(0, 0)).unwrap();
        registry.add_cell(&mut matrix, &map, a, Coord::new(1, 0)).unwrap();

        let view = full_territory_view(&registry, a).unwrap();
        assert_eq!(view.owner, "alice");
        assert_eq!(view.territory.len(), 2);
        assert!(view.territory.contains(&Coord::new(0, 0)));
        assert!(view.territory.contains(&Coord::new(1, 0)));
    }

    #[test]
    fn full_territory_view_is_none_for_unknown_nation() {
        let registry = NationRegistry::new();
        assert!(full_territory_view(&registry, NationIdx::new(0)).is_none());
    }

    #[test]
    fn territory_percentage_reflects_share_of_claimable_cells() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("alice".to_owned(), Coord::new(0, 0), false, 100.0, ResourceBundle::zero());
        for x in 0..4 {
            registry.add_cell(&mut matrix, &map, a, Coord::new(x, 0)).unwrap();
        }

        encode_deltas(&mut registry, &matrix, &map);

        let nation = registry.get(a).unwrap();
        assert!((nation.territory_percentage - 25.0).abs() < f64::EPSILON);
    }
}
