//! Core entity structs shared across the territory engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ArrowStatus, ArrowType, Biome, CityType, NationStatus, Resource};
use crate::ids::ArrowId;

/// Integer map coordinate. `x` runs `[0, W)`, `y` runs `[0, H)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Coord {
    /// Build a coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.saturating_add(dy)
    }

    /// Euclidean distance to another coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn euclidean_distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x.abs_diff(other.x));
        let dy = f64::from(self.y.abs_diff(other.y));
        dx.hypot(dy)
    }

    /// The four orthogonal neighbors of this cell, each only if it lies
    /// within `[0, width) x [0, height)`.
    #[must_use]
    pub fn von_neumann_neighbors(self, width: u32, height: u32) -> Vec<Self> {
        let mut out = Vec::with_capacity(4);
        if self.x > 0 {
            out.push(Self::new(self.x - 1, self.y));
        }
        if self.x + 1 < width {
            out.push(Self::new(self.x + 1, self.y));
        }
        if self.y > 0 {
            out.push(Self::new(self.x, self.y - 1));
        }
        if self.y + 1 < height {
            out.push(Self::new(self.x, self.y + 1));
        }
        out
    }
}

/// A resource feature embedded in a cell (gold vein, fertile soil, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceNode {
    /// Which resource this node produces once claimed.
    pub resource: Resource,
    /// Node tier; scales the claim's bonus via `nodeLevelMultiplier`.
    pub level: u8,
}

/// Read-only terrain data for a single map cell, supplied by the
/// out-of-scope map-generation layer at room start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Terrain type.
    pub biome: Biome,
    /// Whether this cell is part of a river course (distinct from the
    /// `River` biome itself; a non-river biome cell can still be flagged as
    /// river-adjacent by the map generator for crossing-cost purposes).
    pub is_river: bool,
    /// Embedded resource feature, if any.
    pub resource_node: Option<ResourceNode>,
    /// Map-generator region id, opaque to the engine.
    pub region_id: u16,
}

/// A city built by a nation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct City {
    /// Cell the city occupies.
    pub at: Coord,
    /// City kind.
    pub kind: CityType,
    /// Optional player-assigned display name.
    pub name: Option<String>,
}

/// A non-negative quantity of every tracked [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceBundle {
    /// Food stockpile.
    pub food: f64,
    /// Wood stockpile.
    pub wood: f64,
    /// Stone stockpile.
    pub stone: f64,
    /// Iron stockpile.
    pub iron: f64,
    /// Gold stockpile.
    pub gold: f64,
}

impl ResourceBundle {
    /// A bundle with every resource at zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self { food: 0.0, wood: 0.0, stone: 0.0, iron: 0.0, gold: 0.0 }
    }

    /// Read one resource by tag.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
            Resource::Iron => self.iron,
            Resource::Gold => self.gold,
        }
    }

    /// Add a (possibly negative) amount to one resource, floored at zero.
    pub fn add(&mut self, resource: Resource, amount: f64) {
        let slot = match resource {
            Resource::Food => &mut self.food,
            Resource::Wood => &mut self.wood,
            Resource::Stone => &mut self.stone,
            Resource::Iron => &mut self.iron,
            Resource::Gold => &mut self.gold,
        };
        *slot = (*slot + amount).max(0.0);
    }

    /// Whether `self` can afford `cost` resource-for-resource.
    #[must_use]
    pub fn can_afford(&self, cost: &Self) -> bool {
        self.food >= cost.food
            && self.wood >= cost.wood
            && self.stone >= cost.stone
            && self.iron >= cost.iron
            && self.gold >= cost.gold
    }
}

impl Default for ResourceBundle {
    fn default() -> Self {
        Self::zero()
    }
}

/// The passive bonus bundle a nation's resource-node claims confer (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BonusBundle {
    /// Divides into unowned-cell expansion cost (§4.5).
    pub expansion_bonus: f64,
    /// Divides into enemy-cell attack cost (§4.5).
    pub attack_bonus: f64,
    /// Multiplies a defender's effective defense (§4.5).
    pub defense_bonus: f64,
    /// Added to per-tick raw-material production.
    pub production: f64,
    /// Added to per-tick gold income.
    pub gold_income: f64,
}

impl BonusBundle {
    /// A bundle with every multiplier neutral (1.0) and every additive
    /// term zero -- the state of a nation with no resource-node claims.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            expansion_bonus: 1.0,
            attack_bonus: 1.0,
            defense_bonus: 1.0,
            production: 0.0,
            gold_income: 0.0,
        }
    }
}

impl Default for BonusBundle {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A live attack or defend order (§3, "the central runtime entity").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Arrow {
    /// Stable identifier, used for logging and client reconciliation.
    pub id: ArrowId,
    /// Attack or defend.
    pub kind: ArrowType,
    /// Polyline the issuer drew, length >= 2. `path[0]` was owned by the
    /// issuer at creation time.
    pub path: Vec<Coord>,
    /// Index into `path` of the current target waypoint; starts at 1 and
    /// never decreases.
    pub current_index: usize,
    /// Power committed at creation; never changes.
    pub initial_power: f64,
    /// Power remaining to spend; monotonically non-increasing.
    pub remaining_power: f64,
    /// Tick at which the arrow was created, for expiry accounting.
    pub created_at_tick: u64,
    /// Consecutive ticks with zero spend.
    pub stalled_ticks: u32,
    /// Fraction of the issuing nation's population committed at creation,
    /// `(0, 1]`. Retained for display; does not affect post-creation math.
    pub troop_commitment: f64,
    /// Derived visual hint, recomputed every tick this arrow is processed.
    pub status: ArrowStatus,
}

impl Arrow {
    /// The arrow's current target waypoint.
    #[must_use]
    pub fn current_waypoint(&self) -> Option<Coord> {
        self.path.get(self.current_index).copied()
    }

    /// Whether the waypoint index is at the final point of the path.
    #[must_use]
    pub fn at_final_waypoint(&self) -> bool {
        self.current_index.saturating_add(1) >= self.path.len()
    }
}

/// Arrow orders a nation currently has in flight: at most one attack and
/// one defend arrow simultaneously (§3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ArrowOrders {
    /// The live attack arrow, if any.
    pub attack: Option<Arrow>,
    /// The live defend arrow, if any.
    pub defend: Option<Arrow>,
}

/// The per-owner outbound territory delta, cleared after each publish
/// (§3, §4.9).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TerritoryDelta {
    /// Cells newly owned by this nation this tick.
    pub add: Vec<Coord>,
    /// Cells newly lost by this nation this tick.
    pub sub: Vec<Coord>,
}

impl TerritoryDelta {
    /// An empty delta.
    #[must_use]
    pub const fn empty() -> Self {
        Self { add: Vec::new(), sub: Vec::new() }
    }

    /// Whether this delta carries no change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.sub.is_empty()
    }
}

/// One player's nation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Nation {
    /// External (player/account) owner id; stable across reconnects.
    pub owner: String,
    /// Lifecycle state.
    pub status: NationStatus,
    /// Whether this nation is controlled by the Bot Director (C8).
    pub is_bot: bool,
    /// Current capital cell. `None` only in the brief `Founding` state
    /// before the founding command completes.
    pub capital_cell: Option<Coord>,
    /// All cities, in construction order. At most one `Capital` (invariant).
    pub cities: Vec<City>,
    /// Current population.
    pub population: f64,
    /// Current population cap, recomputed each tick from territory size.
    pub max_population: f64,
    /// Treasury.
    pub resources: ResourceBundle,
    /// Live attack/defend orders.
    pub arrow_orders: ArrowOrders,
    /// Outbound delta for this tick; cleared immediately after publish.
    pub territory_delta_outbound: TerritoryDelta,
    /// Share of claimable map cells this nation owns, recomputed by the
    /// delta encoder (C9) every tick.
    pub territory_percentage: f64,
}

impl Nation {
    /// Whether this nation currently has a live capital city recorded.
    #[must_use]
    pub fn capital_city(&self) -> Option<&City> {
        self.cities.iter().find(|c| c.kind == CityType::Capital)
    }
}

/// Per-cell state tracking progressive capture of a resource node (§3, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceNodeClaim {
    /// The node's resource type (mirrors the cell's `ResourceNode.resource`).
    pub resource: Resource,
    /// Confirmed owner, once `progress >= captureTicks`.
    pub owner: Option<u16>,
    /// Nation currently accruing progress toward ownership.
    pub progress_owner: Option<u16>,
    /// Consecutive ticks of continuous ownership by `progress_owner`.
    pub progress: u32,
}

impl ResourceNodeClaim {
    /// A fresh, unclaimed claim for a node of the given resource type.
    #[must_use]
    pub const fn new(resource: Resource) -> Self {
        Self { resource, owner: None, progress_owner: None, progress: 0 }
    }
}

/// Resource-node claims keyed by the cell they occupy.
pub type ClaimMap = BTreeMap<Coord, ResourceNodeClaim>;
