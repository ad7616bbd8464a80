//! The `RoomStore` persistence seam and a `PostgreSQL` reference adapter.
//!
//! A room snapshot is opaque to the engine: the store adapter decides how
//! to lay it out at rest. This adapter keeps it simple and serializes the
//! whole [`RoomSnapshot`] into a single `JSONB` column, upserted by
//! `room_id`, mirroring the teacher's `SnapshotStore` upsert-by-key pattern.

use std::future::Future;

use territory_types::{RoomId, RoomSnapshot};

use crate::error::DbError;
use crate::postgres::PostgresPool;

/// Durable persistence for room snapshots.
///
/// Implementors decide how a snapshot is laid out at rest; callers only
/// ever construct and consume a [`RoomSnapshot`] wholesale.
pub trait RoomStore: Send + Sync {
    /// The error type returned by this store's operations.
    type Error: std::error::Error;

    /// Persist a room's current state, replacing any prior snapshot for
    /// the same room.
    fn save_snapshot(&self, snapshot: &RoomSnapshot) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Load the most recently persisted snapshot for a room, if one exists.
    fn load_snapshot(&self, room_id: RoomId) -> impl Future<Output = Result<Option<RoomSnapshot>, Self::Error>> + Send;
}

/// `PostgreSQL`-backed [`RoomStore`].
///
/// Stores one row per room in `room_snapshots`, keyed by `room_id`, with
/// the full snapshot serialized into a `payload` `JSONB` column.
pub struct PostgresRoomStore {
    pool: PostgresPool,
}

impl PostgresRoomStore {
    /// Bind a room store to an already-connected pool.
    #[must_use]
    pub const fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

impl RoomStore for PostgresRoomStore {
    type Error = DbError;

    async fn save_snapshot(&self, snapshot: &RoomSnapshot) -> Result<(), DbError> {
        let payload = serde_json::to_value(snapshot)?;
        let tick = i64::try_from(snapshot.tick).unwrap_or(i64::MAX);

        sqlx::query(
            "INSERT INTO room_snapshots (room_id, tick, payload, last_modified)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (room_id) DO UPDATE SET
                 tick = EXCLUDED.tick,
                 payload = EXCLUDED.payload,
                 last_modified = EXCLUDED.last_modified",
        )
        .bind(snapshot.room_id.into_inner())
        .bind(tick)
        .bind(payload)
        .bind(snapshot.last_modified)
        .execute(self.pool.pool())
        .await?;

        tracing::debug!(room_id = %snapshot.room_id, tick = snapshot.tick, "saved room snapshot");
        Ok(())
    }

    async fn load_snapshot(&self, room_id: RoomId) -> Result<Option<RoomSnapshot>, DbError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT payload FROM room_snapshots WHERE room_id = $1")
                .bind(room_id.into_inner())
                .fetch_optional(self.pool.pool())
                .await?;

        row.map(|(payload,)| serde_json::from_value(payload).map_err(DbError::from)).transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use territory_types::RoomId;

    use super::*;

    fn sample_snapshot() -> RoomSnapshot {
        RoomSnapshot {
            room_id: RoomId::new(),
            width: 4,
            height: 4,
            ownership: vec![u16::MAX; 16],
            nations: Vec::new(),
            arrows: Vec::new(),
            claims: BTreeMap::new(),
            tick: 7,
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn snapshot_round_trips_through_json_the_way_the_payload_column_would_store_it() {
        let snapshot = sample_snapshot();
        let payload = serde_json::to_value(&snapshot).unwrap();
        let restored: RoomSnapshot = serde_json::from_value(payload).unwrap();
        assert_eq!(restored.room_id, snapshot.room_id);
        assert_eq!(restored.tick, snapshot.tick);
        assert_eq!(restored.ownership.len(), 16);
    }
}
