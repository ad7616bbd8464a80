//! Type-safe identifier wrappers.
//!
//! Rooms and arrows carry a UUID v7 (time-ordered) identity so that log
//! lines and persisted snapshots can reference them stably across ticks.
//! Nations are the exception: a nation's identity inside a room is a dense
//! `u16` index (see [`NationIdx`]), not a UUID, because the ownership
//! matrix indexes nations by that small integer directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a game room.
    RoomId
}

define_id! {
    /// Unique identifier for an arrow order.
    ArrowId
}

/// Stable, dense index of a nation within a room.
///
/// Assigned in registration order and never reused, even after a nation is
/// defeated -- the ownership matrix stores these directly, so a reused index
/// would let a new nation inherit a dead one's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NationIdx(pub u16);

impl NationIdx {
    /// Sentinel stored in the ownership matrix for an unclaimed cell.
    pub const UNOWNED: u16 = 0xFFFF;

    /// Wrap a raw index.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Return the raw index.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for NationIdx {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let room = RoomId::new();
        let arrow = ArrowId::new();
        assert_ne!(room.into_inner(), Uuid::nil());
        assert_ne!(arrow.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = ArrowId::new();
        let json = serde_json::to_string(&original).expect("serialize");
        let restored: ArrowId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(original, restored);
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = RoomId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn nation_idx_sentinel_is_max_u16() {
        assert_eq!(NationIdx::UNOWNED, u16::MAX);
    }

    #[test]
    fn nation_idx_roundtrips_raw_value() {
        let idx = NationIdx::new(42);
        assert_eq!(idx.get(), 42);
    }
}
