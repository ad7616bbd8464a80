//! Nation Registry (C2, §4.2).
//!
//! Owns every [`Nation`] exclusively. All territorial mutation flows
//! through [`NationRegistry::add_cell`]/[`NationRegistry::remove_cell`],
//! which keep the ownership matrix, each nation's territory set, and its
//! border cache in lockstep (§9, "Shared mutable references to nation
//! structures").

use std::collections::{BTreeMap, BTreeSet};

use territory_types::{
    ArrowOrders, City, CityType, Coord, Nation, NationIdx, NationStatus, ResourceBundle,
};
use territory_world::{Map, OwnershipMatrix};

use crate::border;
use crate::error::NationError;

/// Assigns stable nation indices and tracks every nation's state,
/// territory set, and border cache.
#[derive(Debug, Default)]
pub struct NationRegistry {
    owner_to_idx: BTreeMap<String, NationIdx>,
    nations: Vec<Nation>,
    territory: Vec<BTreeSet<Coord>>,
    border: Vec<BTreeSet<Coord>>,
}

impl NationRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nations ever registered (including defeated ones, which
    /// keep their slot).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nations.len()
    }

    /// Whether no nation has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nations.is_empty()
    }

    /// The internal index for an already-registered external owner id.
    #[must_use]
    pub fn idx_of(&self, owner: &str) -> Option<NationIdx> {
        self.owner_to_idx.get(owner).copied()
    }

    /// Read one nation by index.
    #[must_use]
    pub fn get(&self, idx: NationIdx) -> Option<&Nation> {
        self.nations.get(usize::from(idx.get()))
    }

    /// Mutably read one nation by index.
    #[must_use]
    pub fn get_mut(&mut self, idx: NationIdx) -> Option<&mut Nation> {
        self.nations.get_mut(usize::from(idx.get()))
    }

    /// This nation's current territory set.
    #[must_use]
    pub fn territory_of(&self, idx: NationIdx) -> Option<&BTreeSet<Coord>> {
        self.territory.get(usize::from(idx.get()))
    }

    /// This nation's current border set (C3).
    #[must_use]
    pub fn border_of(&self, idx: NationIdx) -> Option<&BTreeSet<Coord>> {
        self.border.get(usize::from(idx.get()))
    }

    /// Iterate every registered nation with its index, in registration
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (NationIdx, &Nation)> {
        self.nations.iter().enumerate().map(|(i, n)| {
            #[allow(clippy::cast_possible_truncation)]
            let idx = NationIdx::new(i as u16);
            (idx, n)
        })
    }

    /// Register a new nation founded at `capital` with starting
    /// `population` and `resources`. Does not touch the ownership matrix
    /// or territory set -- the caller must follow up with
    /// [`NationRegistry::add_cell`] for the capital cell.
    pub fn register(
        &mut self,
        owner: String,
        capital: Coord,
        is_bot: bool,
        population: f64,
        resources: ResourceBundle,
    ) -> NationIdx {
        #[allow(clippy::cast_possible_truncation)]
        let idx = NationIdx::new(self.nations.len() as u16);
        let nation = Nation {
            owner: owner.clone(),
            status: NationStatus::Active,
            is_bot,
            capital_cell: Some(capital),
            cities: vec![City { at: capital, kind: CityType::Capital, name: None }],
            population,
            max_population: population.max(1.0),
            resources,
            arrow_orders: ArrowOrders::default(),
            territory_delta_outbound: territory_types::TerritoryDelta::empty(),
            territory_percentage: 0.0,
        };
        self.nations.push(nation);
        self.territory.push(BTreeSet::new());
        self.border.push(BTreeSet::new());
        self.owner_to_idx.insert(owner, idx);
        idx
    }

    /// Give `nation` ownership of `(x, y)`, updating the matrix, its
    /// territory set, and its border cache together (C2, C3).
    ///
    /// No-op if `nation` already owns the cell.
    pub fn add_cell(
        &mut self,
        matrix: &mut OwnershipMatrix,
        map: &Map,
        nation: NationIdx,
        coord: Coord,
    ) -> Result<(), NationError> {
        let territory = self
            .territory
            .get_mut(usize::from(nation.get()))
            .ok_or(NationError::UnknownNation(nation))?;
        if territory.contains(&coord) {
            return Ok(());
        }
        matrix
            .set(coord.x, coord.y, nation)
            .map_err(|_| NationError::UnknownNation(nation))?;
        territory.insert(coord);
        if let Some(border) = self.border.get_mut(usize::from(nation.get())) {
            border::on_add_cell(matrix, map.width(), map.height(), nation, coord, border);
        }
        Ok(())
    }

    /// Strip `nation`'s ownership of `(x, y)`, updating the matrix, its
    /// territory set, and its border cache together (C2, C3).
    ///
    /// No-op if `nation` does not own the cell.
    pub fn remove_cell(
        &mut self,
        matrix: &mut OwnershipMatrix,
        map: &Map,
        nation: NationIdx,
        coord: Coord,
    ) -> Result<(), NationError> {
        let territory = self
            .territory
            .get_mut(usize::from(nation.get()))
            .ok_or(NationError::UnknownNation(nation))?;
        if !territory.remove(&coord) {
            return Ok(());
        }
        matrix.clear(coord.x, coord.y).map_err(|_| NationError::UnknownNation(nation))?;
        if let Some(border) = self.border.get_mut(usize::from(nation.get())) {
            border::on_remove_cell(matrix, map.width(), map.height(), nation, coord, border);
        }
        Ok(())
    }

    /// Check the border-cache invariant (§8 item 2) for `nation`; if it
    /// has drifted, force a full rebuild and return `true` (a
    /// desync was found and corrected).
    pub fn verify_or_rebuild_border(
        &mut self,
        matrix: &OwnershipMatrix,
        map: &Map,
        nation: NationIdx,
    ) -> bool {
        let Some(territory) = self.territory.get(usize::from(nation.get())) else {
            return false;
        };
        let Some(border) = self.border.get(usize::from(nation.get())) else {
            return false;
        };
        if border::is_consistent(matrix, map.width(), map.height(), nation, territory, border) {
            return false;
        }
        let rebuilt = border::rebuild(matrix, map.width(), map.height(), nation, territory);
        if let Some(slot) = self.border.get_mut(usize::from(nation.get())) {
            *slot = rebuilt;
        }
        true
    }

    /// Erase all of `nation`'s territory (used on defeat), returning the
    /// erased coordinates for the delta encoder's defeat-sub emission
    /// (§4.9).
    pub fn erase_territory(
        &mut self,
        matrix: &mut OwnershipMatrix,
        nation: NationIdx,
    ) -> Vec<Coord> {
        let Some(territory) = self.territory.get_mut(usize::from(nation.get())) else {
            return Vec::new();
        };
        let erased: Vec<Coord> = territory.iter().copied().collect();
        for &coord in &erased {
            let _ = matrix.clear(coord.x, coord.y);
        }
        territory.clear();
        if let Some(border) = self.border.get_mut(usize::from(nation.get())) {
            border.clear();
        }
        erased
    }
}
