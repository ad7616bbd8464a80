//! Persisted room snapshot DTO, the serializable form of a room's full
//! state that crosses the `RoomStore` seam (§6, "Persisted state layout").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::RoomId;
use crate::structs::{Arrow, ClaimMap, Nation};

/// A serializable snapshot of everything needed to reconstruct a room.
///
/// Opaque to the engine in the sense that the engine never inspects a
/// snapshot's internal layout beyond constructing and consuming one
/// wholesale -- the store adapter is free to lay this out as JSON columns,
/// a single blob, or normalized tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoomSnapshot {
    /// Room identity.
    pub room_id: RoomId,
    /// Map width, for reconstructing the ownership matrix shape.
    pub width: u32,
    /// Map height, for reconstructing the ownership matrix shape.
    pub height: u32,
    /// Row-major ownership matrix, one nation index (or
    /// [`crate::ids::NationIdx::UNOWNED`]) per cell.
    pub ownership: Vec<u16>,
    /// Every registered nation, in registry order (index == position).
    pub nations: Vec<Nation>,
    /// Every live arrow across every nation.
    pub arrows: Vec<Arrow>,
    /// Resource-node claims.
    pub claims: ClaimMap,
    /// Ticks elapsed since room creation.
    pub tick: u64,
    /// Wall-clock time this snapshot was produced.
    pub last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn room_snapshot_serializes_round_trip() {
        let snapshot = RoomSnapshot {
            room_id: RoomId::new(),
            width: 4,
            height: 4,
            ownership: vec![u16::MAX; 16],
            nations: Vec::new(),
            arrows: Vec::new(),
            claims: BTreeMap::new(),
            tick: 0,
            last_modified: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let restored: RoomSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.width, 4);
        assert_eq!(restored.ownership.len(), 16);
    }
}
