//! The ownership matrix: single source of truth for "who owns what" (C1, §4.1).

use territory_types::NationIdx;

use crate::error::WorldError;
use crate::grid::Map;

/// Two dense `u16` arrays sized to the map: `current` and `previous`
/// (§3). `UNOWNED` (`0xFFFF`) marks an unclaimed cell; any other value
/// indexes into the nation registry.
#[derive(Debug, Clone)]
pub struct OwnershipMatrix {
    width: u32,
    height: u32,
    current: Vec<u16>,
    previous: Vec<u16>,
}

impl OwnershipMatrix {
    /// Build an all-`UNOWNED` matrix sized to `map`.
    #[must_use]
    pub fn new(map: &Map) -> Self {
        let len = map.len();
        Self {
            width: map.width(),
            height: map.height(),
            current: vec![NationIdx::UNOWNED; len],
            previous: vec![NationIdx::UNOWNED; len],
        }
    }

    /// Map width this matrix was sized for.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height this matrix was sized for.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let col = usize::try_from(x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width).and_then(|r| r.checked_add(col))
    }

    /// Flatten `(x, y)` into the row-major key used by [`OwnershipMatrix::owner_of`].
    #[must_use]
    pub fn key_of(&self, x: u32, y: u32) -> Option<usize> {
        self.index_of(x, y)
    }

    /// Decode a row-major key back into `(x, y)`.
    #[must_use]
    pub fn coord_of(&self, key: usize) -> Option<(u32, u32)> {
        let width = usize::try_from(self.width).ok()?;
        if width == 0 {
            return None;
        }
        let y = key.checked_div(width)?;
        let x = key.checked_rem(width)?;
        Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }

    /// Current owner of `(x, y)`, or `None` if unowned or out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<NationIdx> {
        let idx = self.index_of(x, y)?;
        self.current.get(idx).copied().filter(|&v| v != NationIdx::UNOWNED).map(NationIdx::new)
    }

    /// Owner at a pre-flattened key, as produced by [`OwnershipMatrix::key_of`].
    #[must_use]
    pub fn owner_of(&self, key: usize) -> Option<NationIdx> {
        self.current.get(key).copied().filter(|&v| v != NationIdx::UNOWNED).map(NationIdx::new)
    }

    /// The owner recorded in the previous tick's snapshot, at a
    /// pre-flattened key.
    #[must_use]
    pub fn previous_owner_of(&self, key: usize) -> Option<NationIdx> {
        self.previous.get(key).copied().filter(|&v| v != NationIdx::UNOWNED).map(NationIdx::new)
    }

    /// Set the owner of `(x, y)`. `O(1)`.
    pub fn set(&mut self, x: u32, y: u32, nation: NationIdx) -> Result<(), WorldError> {
        let idx = self.index_of(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        let slot = self
            .current
            .get_mut(idx)
            .ok_or(WorldError::OutOfBounds { x, y, width: self.width, height: self.height })?;
        *slot = nation.get();
        Ok(())
    }

    /// Clear `(x, y)` back to `UNOWNED`.
    pub fn clear(&mut self, x: u32, y: u32) -> Result<(), WorldError> {
        let idx = self.index_of(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        let slot = self
            .current
            .get_mut(idx)
            .ok_or(WorldError::OutOfBounds { x, y, width: self.width, height: self.height })?;
        *slot = NationIdx::UNOWNED;
        Ok(())
    }

    /// Copy `current` into `previous` ahead of the next tick's diff
    /// (§4.1). `O(W*H)`; executes once per tick.
    pub fn snapshot(&mut self) {
        self.previous.clone_from(&self.current);
    }

    /// Total number of cells this matrix covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether this matrix covers zero cells (never true for a matrix
    /// built from a valid [`Map`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Iterate `(key, current_owner)` for every cell, in row-major order.
    pub fn iter_current(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        self.current.iter().copied().enumerate()
    }

    /// Raw current-owner slot at `key`, `UNOWNED` included.
    #[must_use]
    pub fn raw_current(&self, key: usize) -> u16 {
        self.current.get(key).copied().unwrap_or(NationIdx::UNOWNED)
    }

    /// Raw previous-owner slot at `key`, `UNOWNED` included.
    #[must_use]
    pub fn raw_previous(&self, key: usize) -> u16 {
        self.previous.get(key).copied().unwrap_or(NationIdx::UNOWNED)
    }

    /// Export the current row-major ownership array, for persistence
    /// (see `territory-types::snapshot::RoomSnapshot`).
    #[must_use]
    pub fn current_slice(&self) -> &[u16] {
        &self.current
    }

    /// Restore both `current` and `previous` from a persisted array
    /// (used when loading a [`crate::Map`]-compatible snapshot back into
    /// a fresh matrix).
    pub fn restore_current(&mut self, values: Vec<u16>) {
        self.previous.clone_from(&values);
        self.current = values;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::uniform_grassland_map;

    #[test]
    fn new_matrix_is_all_unowned() {
        let map = uniform_grassland_map(3, 3);
        let matrix = OwnershipMatrix::new(&map);
        assert_eq!(matrix.get(1, 1), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let map = uniform_grassland_map(3, 3);
        let mut matrix = OwnershipMatrix::new(&map);
        matrix.set(1, 1, NationIdx::new(0)).unwrap();
        assert_eq!(matrix.get(1, 1), Some(NationIdx::new(0)));
    }

    #[test]
    fn clear_restores_unowned() {
        let map = uniform_grassland_map(3, 3);
        let mut matrix = OwnershipMatrix::new(&map);
        matrix.set(1, 1, NationIdx::new(0)).unwrap();
        matrix.clear(1, 1).unwrap();
        assert_eq!(matrix.get(1, 1), None);
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let map = uniform_grassland_map(3, 3);
        let mut matrix = OwnershipMatrix::new(&map);
        assert!(matrix.set(10, 10, NationIdx::new(0)).is_err());
    }

    #[test]
    fn snapshot_copies_current_into_previous() {
        let map = uniform_grassland_map(2, 2);
        let mut matrix = OwnershipMatrix::new(&map);
        matrix.set(0, 0, NationIdx::new(0)).unwrap();
        matrix.snapshot();
        let key = matrix.key_of(0, 0).unwrap();
        assert_eq!(matrix.previous_owner_of(key), Some(NationIdx::new(0)));
        matrix.clear(0, 0).unwrap();
        // previous still reflects the pre-clear snapshot.
        assert_eq!(matrix.previous_owner_of(key), Some(NationIdx::new(0)));
        assert_eq!(matrix.owner_of(key), None);
    }

    #[test]
    fn key_of_and_coord_of_are_inverses() {
        let map = uniform_grassland_map(5, 4);
        let matrix = OwnershipMatrix::new(&map);
        for y in 0..4 {
            for x in 0..5 {
                let key = matrix.key_of(x, y).unwrap();
                assert_eq!(matrix.coord_of(key), Some((x, y)));
            }
        }
    }
}
