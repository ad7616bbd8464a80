//! Outbound payload types published at the end of each tick (§6).
//!
//! These are the DTOs the transport adapter hands to clients and the
//! `RoomStore` adapter persists; the simulation core never reads them back.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ArrowType, NationStatus};
use crate::ids::{ArrowId, RoomId};
use crate::structs::{City, ResourceBundle, TerritoryDelta};

/// A sanitized view of one of a nation's live arrow orders, safe to send
/// to every client (no internal scoring state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ArrowOrderView {
    /// Stable id.
    pub id: ArrowId,
    /// Attack or defend.
    pub kind: ArrowType,
    /// Full drawn path.
    pub path: Vec<crate::structs::Coord>,
    /// Current waypoint index.
    pub current_index: usize,
    /// Power remaining, rounded for display.
    pub remaining_power: f64,
}

/// Per-nation outbound payload for one tick (§6, "Per-tick outbound
/// snapshot").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NationSnapshot {
    /// External owner id.
    pub owner: String,
    /// Lifecycle state.
    pub status: NationStatus,
    /// Current population.
    pub population: f64,
    /// Current population cap.
    pub max_population: f64,
    /// Treasury.
    pub resources: ResourceBundle,
    /// Built cities.
    pub cities: Vec<City>,
    /// Sanitized live arrow orders.
    pub arrow_orders: Vec<ArrowOrderView>,
    /// This tick's territory delta; empty if nothing changed hands.
    pub territory_delta: TerritoryDelta,
    /// Share of claimable cells owned, in `[0, 100]`.
    pub territory_percentage: f64,
}

/// A full-territory view of one nation, sent instead of a delta on new
/// client connect (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FullTerritoryView {
    /// External owner id.
    pub owner: String,
    /// Every cell currently owned by this nation.
    pub territory: Vec<crate::structs::Coord>,
}

/// The complete outbound payload for one tick: every nation's snapshot,
/// keyed by the tick number it was produced on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OutboundTick {
    /// Room this payload belongs to.
    pub room_id: RoomId,
    /// Tick number this payload was produced on.
    pub tick: u64,
    /// Per-nation snapshots, in registry order.
    pub nations: Vec<NationSnapshot>,
}
