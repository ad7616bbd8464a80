//! Enumeration types shared across the territory engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Terrain type of a single map cell.
///
/// Ocean cells are never claimable (see [`Biome::is_claimable`]); every
/// other biome can be owned, though each carries its own expansion-cost
/// and terrain-similarity weight (see `territory-nations::biome`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Biome {
    /// Open water. Never claimable.
    Ocean,
    /// Shallow water bordering land.
    Coastal,
    /// Inland river tile.
    River,
    /// High-elevation rock.
    Mountain,
    /// Arid sand terrain.
    Desert,
    /// Dry grass plains.
    Savanna,
    /// Warm broadleaf forest.
    TropicalForest,
    /// Dense wet forest.
    Rainforest,
    /// Frozen open plain.
    Tundra,
    /// Cold coniferous forest.
    Taiga,
    /// Temperate open plain.
    Grassland,
    /// Mixed temperate forest/clearing.
    Woodland,
    /// Dense temperate forest.
    Forest,
}

impl Biome {
    /// Ocean cells can never be owned by any nation.
    #[must_use]
    pub const fn is_claimable(self) -> bool {
        !matches!(self, Self::Ocean)
    }

    /// Coarse biome family used as a fallback tier in the similarity table.
    ///
    /// Grouping mirrors §4.5's "identical ≈ 1.0; adjacent biome groups ≈
    /// 0.6-0.8; unrelated ≈ 0.3" description: open plains, dense forest,
    /// and harsh/extreme terrain each form one family.
    #[must_use]
    pub const fn family(self) -> BiomeFamily {
        match self {
            Self::Ocean | Self::Coastal | Self::River => BiomeFamily::Water,
            Self::Mountain | Self::Desert | Self::Tundra => BiomeFamily::Harsh,
            Self::Savanna | Self::Grassland => BiomeFamily::OpenPlain,
            Self::TropicalForest | Self::Rainforest | Self::Taiga | Self::Woodland | Self::Forest => {
                BiomeFamily::DenseForest
            }
        }
    }
}

/// Coarse grouping of [`Biome`] used when an exact same-biome match fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BiomeFamily {
    /// Ocean, coastal, river.
    Water,
    /// Mountain, desert, tundra -- terrain that slows most crossings.
    Harsh,
    /// Savanna, grassland -- open, easy to traverse.
    OpenPlain,
    /// Tropical forest, rainforest, taiga, woodland, forest.
    DenseForest,
}

/// Resource carried by a nation's treasury and produced by resource nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Resource {
    /// Feeds population growth.
    Food,
    /// Construction material.
    Wood,
    /// Construction material.
    Stone,
    /// Advanced construction/military material.
    Iron,
    /// Spent on arrow pricing (§6).
    Gold,
}

impl Resource {
    /// All resource variants, in the fixed order used for iteration and
    /// serialization of resource bundles.
    pub const ALL: [Self; 5] = [Self::Food, Self::Wood, Self::Stone, Self::Iron, Self::Gold];
}

/// Lifecycle state of a nation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NationStatus {
    /// Registered but has not yet placed a capital (transient; a founding
    /// command establishes both in one step, so this state is momentary).
    Founding,
    /// Alive and playable.
    Active,
    /// Eliminated: no territory, no capital.
    Defeated,
    /// Has met the win condition; the room is over for this nation's
    /// perspective.
    Winner,
}

/// Kind of city a nation has built on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CityType {
    /// The nation's anchor. Exactly one per active nation (invariant).
    Capital,
    /// Succession candidate; radiates a weaker defense post than a tower.
    Town,
    /// Strongest, largest-radius defense post.
    Tower,
    /// Production structure (no defense radius).
    Farm,
    /// Production structure (no defense radius).
    Mine,
    /// Production structure (no defense radius).
    Stable,
    /// Production structure (no defense radius).
    LumberMill,
    /// Production structure (no defense radius).
    Workshop,
    /// Production structure (no defense radius).
    Fort,
}

impl CityType {
    /// Whether this city type participates in the Structure Defense Model
    /// (C6). Only towers and town-tier structures (town, capital) radiate a
    /// defense post; production buildings do not.
    #[must_use]
    pub const fn is_defense_post(self) -> bool {
        matches!(self, Self::Capital | Self::Town | Self::Tower)
    }
}

/// Discriminator for a live arrow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ArrowType {
    /// Expands/attacks along the drawn path.
    Attack,
    /// Advisory-only; returns power to population over time (§4.5).
    Defend,
}

/// Derived, per-tick visual hint describing an arrow's recent behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ArrowStatus {
    /// `currentIndex` progressed this tick.
    Advancing,
    /// Budget was spent but the waypoint did not advance.
    Consolidating,
    /// `stalledTicks > 0`.
    Stalled,
    /// Reserved; never produced by this engine (see §4.5).
    Retreating,
}

/// Reason a per-command validation step rejected an inbound command.
///
/// Rejections are data, not errors: an invalid command is an expected,
/// routine outcome (§7), not a crate-level fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// `(x, y)` is outside `[0, W) x [0, H)`.
    OutOfBounds,
    /// The command's `owner` has no registered nation.
    UnknownOwner,
    /// `foundNation` targeted an ocean cell.
    CannotFoundOnOcean,
    /// `foundNation` targeted a cell already owned by another nation.
    CellAlreadyOwned,
    /// `buildStructure` targeted a cell outside the owner's territory.
    NotInTerritory,
    /// `drawArrow`'s path did not start on a cell owned by the issuer.
    ArrowStartNotOwned,
    /// `drawArrow`'s path had fewer than two points.
    ArrowPathTooShort,
    /// The issuer already has a live arrow of that type.
    ArrowSlotOccupied,
    /// The issuer's treasury could not cover the arrow's price (§6).
    InsufficientResources,
    /// The nation is not in a state that can issue commands.
    NationNotActive,
}
