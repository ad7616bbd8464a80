//! Persistence seam for the territory engine.
//!
//! The engine treats a room snapshot as opaque: it only ever constructs
//! and consumes one wholesale through the [`store::RoomStore`] trait. This
//! crate provides that trait plus one reference adapter,
//! [`store::PostgresRoomStore`], built on [`sqlx`].
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`store`] -- The `RoomStore` trait and its `PostgreSQL` adapter
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod store;

pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::{PostgresRoomStore, RoomStore};
