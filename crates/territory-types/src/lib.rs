//! Shared type definitions for the territory engine.
//!
//! This crate is the single source of truth for all types used across the
//! territory engine workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for a reference observer dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers ([`ids::RoomId`], [`ids::ArrowId`], [`ids::NationIdx`])
//! - [`enums`] -- Enumeration types (biome, resource, city/arrow kind, rejection reason)
//! - [`structs`] -- Core entity structs (cell, nation, arrow, resource-node claim)
//! - [`actions`] -- Inbound command tagged union and per-command outcomes
//! - [`outbound`] -- Per-tick outbound snapshot DTOs
//! - [`snapshot`] -- Persisted room snapshot DTO for the `RoomStore` seam

pub mod actions;
pub mod enums;
pub mod ids;
pub mod outbound;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{Command, CommandOutcome};
pub use enums::{
    ArrowStatus, ArrowType, Biome, BiomeFamily, CityType, NationStatus, RejectionReason, Resource,
};
pub use ids::{ArrowId, NationIdx, RoomId};
pub use outbound::{ArrowOrderView, FullTerritoryView, NationSnapshot, OutboundTick};
pub use snapshot::RoomSnapshot;
pub use structs::{
    Arrow, ArrowOrders, BonusBundle, Cell, City, ClaimMap, Coord, Nation, ResourceBundle,
    ResourceNode, ResourceNodeClaim, TerritoryDelta,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::RoomId::export_all();
        let _ = crate::ids::ArrowId::export_all();
        let _ = crate::ids::NationIdx::export_all();

        // Enums
        let _ = crate::enums::Biome::export_all();
        let _ = crate::enums::BiomeFamily::export_all();
        let _ = crate::enums::Resource::export_all();
        let _ = crate::enums::NationStatus::export_all();
        let _ = crate::enums::CityType::export_all();
        let _ = crate::enums::ArrowType::export_all();
        let _ = crate::enums::ArrowStatus::export_all();
        let _ = crate::enums::RejectionReason::export_all();

        // Structs
        let _ = crate::structs::Coord::export_all();
        let _ = crate::structs::ResourceNode::export_all();
        let _ = crate::structs::Cell::export_all();
        let _ = crate::structs::City::export_all();
        let _ = crate::structs::ResourceBundle::export_all();
        let _ = crate::structs::BonusBundle::export_all();
        let _ = crate::structs::Arrow::export_all();
        let _ = crate::structs::ArrowOrders::export_all();
        let _ = crate::structs::TerritoryDelta::export_all();
        let _ = crate::structs::Nation::export_all();
        let _ = crate::structs::ResourceNodeClaim::export_all();

        // Actions
        let _ = crate::actions::Command::export_all();
        let _ = crate::actions::CommandOutcome::export_all();

        // Outbound
        let _ = crate::outbound::ArrowOrderView::export_all();
        let _ = crate::outbound::NationSnapshot::export_all();
        let _ = crate::outbound::FullTerritoryView::export_all();
        let _ = crate::outbound::OutboundTick::export_all();

        // Snapshot
        let _ = crate::snapshot::RoomSnapshot::export_all();
    }
}
