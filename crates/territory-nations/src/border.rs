//! Frontier & Border Cache maintenance rules (C3, §4.3).
//!
//! Pure helper functions consulted by [`crate::registry::NationRegistry`]'s
//! `add_cell`/`remove_cell` primitives, kept separate from the registry so
//! the incremental-update rule and the full-rebuild fallback can each be
//! tested in isolation.

use std::collections::BTreeSet;

use territory_types::{Coord, NationIdx};
use territory_world::OwnershipMatrix;

/// Whether `coord` (owned by `nation`) has at least one 4-neighbor not
/// owned by `nation` -- the definition of a border cell.
#[must_use]
pub fn is_border_cell(
    matrix: &OwnershipMatrix,
    width: u32,
    height: u32,
    nation: NationIdx,
    coord: Coord,
) -> bool {
    coord
        .von_neumann_neighbors(width, height)
        .iter()
        .any(|&nb| matrix.get(nb.x, nb.y) != Some(nation))
}

/// Incrementally update `border` after `nation` gains ownership of
/// `coord` (§4.3, "On addCell").
pub fn on_add_cell(
    matrix: &OwnershipMatrix,
    width: u32,
    height: u32,
    nation: NationIdx,
    coord: Coord,
    border: &mut BTreeSet<Coord>,
) {
    if is_border_cell(matrix, width, height, nation, coord) {
        border.insert(coord);
    }
    for neighbor in coord.von_neumann_neighbors(width, height) {
        if border.contains(&neighbor) && !is_border_cell(matrix, width, height, nation, neighbor) {
            border.remove(&neighbor);
        }
    }
}

/// Incrementally update `border` after `nation` loses ownership of
/// `coord` (§4.3, "On removeCell").
pub fn on_remove_cell(
    matrix: &OwnershipMatrix,
    width: u32,
    height: u32,
    nation: NationIdx,
    coord: Coord,
    border: &mut BTreeSet<Coord>,
) {
    border.remove(&coord);
    for neighbor in coord.von_neumann_neighbors(width, height) {
        if matrix.get(neighbor.x, neighbor.y) == Some(nation) {
            border.insert(neighbor);
        }
    }
}

/// Fully rebuild a nation's border set from its territory set, costing
/// `O(|territory|)`. Used as the fallback when an invariant check finds
/// the incremental cache has drifted (§7, "Internal invariant violation").
#[must_use]
pub fn rebuild(
    matrix: &OwnershipMatrix,
    width: u32,
    height: u32,
    nation: NationIdx,
    territory: &BTreeSet<Coord>,
) -> BTreeSet<Coord> {
    territory
        .iter()
        .copied()
        .filter(|&c| is_border_cell(matrix, width, height, nation, c))
        .collect()
}

/// Check the correctness invariant from §8 item 2: `border == { c in
/// territory | c has a non-owned 4-neighbor }`.
#[must_use]
pub fn is_consistent(
    matrix: &OwnershipMatrix,
    width: u32,
    height: u32,
    nation: NationIdx,
    territory: &BTreeSet<Coord>,
    border: &BTreeSet<Coord>,
) -> bool {
    *border == rebuild(matrix, width, height, nation, territory)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_world::uniform_grassland_map;

    fn setup(width: u32, height: u32) -> (OwnershipMatrix, territory_world::Map) {
        let map = uniform_grassland_map(width, height);
        (OwnershipMatrix::new(&map), map)
    }

    #[test]
    fn single_cell_is_its_own_border() {
        let (mut matrix, map) = setup(5, 5);
        let n = NationIdx::new(0);
        let c = Coord::new(2, 2);
        matrix.set(c.x, c.y, n).unwrap();
        let mut border = BTreeSet::new();
        on_add_cell(&matrix, map.width(), map.height(), n, c, &mut border);
        assert!(border.contains(&c));
    }

    #[test]
    fn interior_cell_stops_being_border_once_surrounded() {
        let (mut matrix, map) = setup(5, 5);
        let n = NationIdx::new(0);
        let mut border = BTreeSet::new();
        let mut territory = BTreeSet::new();
        let center = Coord::new(2, 2);
        for coord in [center, Coord::new(1, 2), Coord::new(3, 2), Coord::new(2, 1), Coord::new(2, 3)]
        {
            matrix.set(coord.x, coord.y, n).unwrap();
            territory.insert(coord);
            on_add_cell(&matrix, map.width(), map.height(), n, coord, &mut border);
        }
        assert!(!border.contains(&center), "center should no longer be a border cell");
        assert!(border.contains(&Coord::new(1, 2)));
    }

    #[test]
    fn remove_cell_exposes_former_interior_neighbors() {
        let (mut matrix, map) = setup(5, 5);
        let n = NationIdx::new(0);
        let mut border = BTreeSet::new();
        let center = Coord::new(2, 2);
        let neighbors =
            [Coord::new(1, 2), Coord::new(3, 2), Coord::new(2, 1), Coord::new(2, 3)];
        for coord in std::iter::once(center).chain(neighbors) {
            matrix.set(coord.x, coord.y, n).unwrap();
        }
        for coord in std::iter::once(center).chain(neighbors) {
            on_add_cell(&matrix, map.width(), map.height(), n, coord, &mut border);
        }
        assert!(!border.contains(&center));
        matrix.clear(center.x, center.y).unwrap();
        on_remove_cell(&matrix, map.width(), map.height(), n, center, &mut border);
        for neighbor in neighbors {
            assert!(border.contains(&neighbor));
        }
    }

    #[test]
    fn rebuild_matches_incremental_result() {
        let (mut matrix, map) = setup(6, 6);
        let n = NationIdx::new(0);
        let mut border = BTreeSet::new();
        let mut territory = BTreeSet::new();
        for y in 1..4 {
            for x in 1..4 {
                let c = Coord::new(x, y);
                matrix.set(c.x, c.y, n).unwrap();
                territory.insert(c);
                on_add_cell(&matrix, map.width(), map.height(), n, c, &mut border);
            }
        }
        let rebuilt = rebuild(&matrix, map.width(), map.height(), n, &territory);
        assert_eq!(border, rebuilt);
        assert!(is_consistent(&matrix, map.width(), map.height(), n, &territory, &border));
    }
}
