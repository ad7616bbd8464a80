//! The immutable map: dimensions and per-cell terrain data (§3 "Map", §4.1).
//!
//! Supplied wholesale by the out-of-scope map-generation layer at room
//! start and never mutated afterward. Storage is a single row-major
//! `Vec<Cell>`, the same flat-array-plus-`y*W+x` indexing idiom the
//! ownership matrix uses (§4.1), so both share one coordinate convention.

use territory_types::{Biome, Cell};

use crate::error::WorldError;

/// A rectangular map of immutable terrain cells.
#[derive(Debug, Clone)]
pub struct Map {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    /// Count of non-OCEAN cells, cached once at construction for the
    /// delta encoder's `territoryPercentage` computation (§4.9).
    claimable_cell_count: u32,
}

impl Map {
    /// Build a map from a row-major cell list. `cells.len()` must equal
    /// `width * height`.
    pub fn new(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, WorldError> {
        let expected = usize::try_from(width)
            .ok()
            .and_then(|w| usize::try_from(height).ok().map(|h| w.saturating_mul(h)));
        if width == 0 || height == 0 || expected != Some(cells.len()) {
            return Err(WorldError::InvalidDimensions {
                width,
                height,
                reason: format!(
                    "expected {width}x{height} = {:?} cells, got {}",
                    expected,
                    cells.len()
                ),
            });
        }
        let claimable_cell_count = u32::try_from(
            cells.iter().filter(|c| c.biome.is_claimable()).count(),
        )
        .unwrap_or(u32::MAX);
        Ok(Self { width, height, cells, claimable_cell_count })
    }

    /// Map width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count (`width * height`).
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Whether the map has any cells (always true for a validly constructed map).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Count of non-OCEAN cells, cached at construction.
    #[must_use]
    pub const fn claimable_cell_count(&self) -> u32 {
        self.claimable_cell_count
    }

    /// Flatten `(x, y)` into a row-major index, bounds-checked.
    #[must_use]
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let col = usize::try_from(x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width).and_then(|r| r.checked_add(col))
    }

    /// Read terrain data at `(x, y)`.
    pub fn cell(&self, x: u32, y: u32) -> Result<&Cell, WorldError> {
        let idx = self.index_of(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.cells
            .get(idx)
            .ok_or(WorldError::OutOfBounds { x, y, width: self.width, height: self.height })
    }

    /// Whether `(x, y)` lies within bounds and is a claimable (non-OCEAN) biome.
    #[must_use]
    pub fn is_claimable(&self, x: u32, y: u32) -> bool {
        self.cell(x, y).is_ok_and(|c| c.biome.is_claimable())
    }

    /// Whether `(x, y)` lies within bounds.
    #[must_use]
    pub const fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Decode a row-major index back into `(x, y)`. Inverse of
    /// [`Map::index_of`].
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<(u32, u32)> {
        let width = usize::try_from(self.width).ok()?;
        if width == 0 {
            return None;
        }
        let y = index.checked_div(width)?;
        let x = index.checked_rem(width)?;
        Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }
}

/// Build an all-[`Biome::Grassland`] map with no rivers or resource nodes,
/// useful for deterministic tests (see §8 scenarios S1, S4, S5). `width`
/// and `height` are clamped to at least 1 so the result is always valid.
#[must_use]
pub fn uniform_grassland_map(width: u32, height: u32) -> Map {
    let width = width.max(1);
    let height = height.max(1);
    let count = (width as usize).saturating_mul(height as usize);
    let cells = vec![
        Cell { biome: Biome::Grassland, is_river: false, resource_node: None, region_id: 0 };
        count
    ];
    Map::new(width, height, cells).map_or_else(
        |_| Map {
            width: 1,
            height: 1,
            cells: vec![Cell {
                biome: Biome::Grassland,
                is_river: false,
                resource_node: None,
                region_id: 0,
            }],
            claimable_cell_count: 1,
        },
        |map| map,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grass_cell() -> Cell {
        Cell { biome: Biome::Grassland, is_river: false, resource_node: None, region_id: 0 }
    }

    #[test]
    fn new_rejects_mismatched_cell_count() {
        let result = Map::new(2, 2, vec![grass_cell(); 3]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_zero_dimension() {
        assert!(Map::new(0, 5, Vec::new()).is_err());
    }

    #[test]
    fn index_of_is_row_major() {
        let map = Map::new(3, 2, vec![grass_cell(); 6]).expect("valid map");
        assert_eq!(map.index_of(0, 0), Some(0));
        assert_eq!(map.index_of(2, 0), Some(2));
        assert_eq!(map.index_of(0, 1), Some(3));
        assert_eq!(map.index_of(3, 0), None);
        assert_eq!(map.index_of(0, 2), None);
    }

    #[test]
    fn coord_of_inverts_index_of() {
        let map = Map::new(4, 3, vec![grass_cell(); 12]).expect("valid map");
        for y in 0..3 {
            for x in 0..4 {
                let idx = map.index_of(x, y).expect("in bounds");
                assert_eq!(map.coord_of(idx), Some((x, y)));
            }
        }
    }

    #[test]
    fn claimable_cell_count_excludes_ocean() {
        let mut cells = vec![grass_cell(); 4];
        if let Some(cell) = cells.get_mut(0) {
            cell.biome = Biome::Ocean;
        }
        let map = Map::new(2, 2, cells).expect("valid map");
        assert_eq!(map.claimable_cell_count(), 3);
    }

    #[test]
    fn uniform_grassland_map_is_claimable_everywhere() {
        let map = uniform_grassland_map(5, 5);
        assert_eq!(map.claimable_cell_count(), 25);
    }
}
