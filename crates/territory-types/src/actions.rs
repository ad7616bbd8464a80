//! Inbound command types and per-command outcomes (§6).
//!
//! The transport/lobby layer (out of scope) enqueues these onto a room's
//! inbound channel; the tick driver drains the queue once at the start of
//! each tick (§5) and resolves each command to either a mutation or a
//! [`RejectionReason`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ArrowType, CityType, RejectionReason};
use crate::structs::Coord;

/// A command submitted by a player (or room operator) for the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type")]
pub enum Command {
    /// Establish a new nation with its capital at `(x, y)`.
    #[serde(rename = "foundNation")]
    FoundNation {
        /// External owner id.
        owner: String,
        /// Target cell's column.
        x: u32,
        /// Target cell's row.
        y: u32,
    },
    /// Build a structure at `(x, y)`, which must already be owned by
    /// `owner`.
    #[serde(rename = "buildStructure")]
    BuildStructure {
        /// External owner id.
        owner: String,
        /// Target cell's column.
        x: u32,
        /// Target cell's row.
        y: u32,
        /// Structure kind to build.
        kind: CityType,
    },
    /// Issue a new attack or defend order.
    #[serde(rename = "drawArrow")]
    DrawArrow {
        /// External owner id.
        owner: String,
        /// Attack or defend.
        kind: ArrowType,
        /// The drawn polyline, length >= 2, starting on owned territory.
        path: Vec<Coord>,
    },
}

impl Command {
    /// The owner id this command acts on behalf of.
    #[must_use]
    pub fn owner(&self) -> &str {
        match self {
            Self::FoundNation { owner, .. }
            | Self::BuildStructure { owner, .. }
            | Self::DrawArrow { owner, .. } => owner,
        }
    }
}

/// The resolution of one drained command: either it mutated room state, or
/// it was rejected without effect (§7, "Invalid command").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CommandOutcome {
    /// The command was applied.
    Accepted,
    /// The command was rejected; state is unchanged.
    Rejected(RejectionReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_owner_extracts_for_every_variant() {
        let found = Command::FoundNation { owner: "alice".to_owned(), x: 1, y: 1 };
        let build = Command::BuildStructure {
            owner: "bob".to_owned(),
            x: 2,
            y: 2,
            kind: CityType::Farm,
        };
        let arrow = Command::DrawArrow {
            owner: "carol".to_owned(),
            kind: ArrowType::Attack,
            path: vec![Coord::new(0, 0), Coord::new(1, 0)],
        };
        assert_eq!(found.owner(), "alice");
        assert_eq!(build.owner(), "bob");
        assert_eq!(arrow.owner(), "carol");
    }

    #[test]
    fn command_serializes_with_tag() {
        let cmd = Command::FoundNation { owner: "alice".to_owned(), x: 1, y: 1 };
        let json = serde_json::to_string(&cmd).expect("serialize");
        assert!(json.contains("\"type\":\"foundNation\""));
    }
}
