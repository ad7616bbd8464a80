//! Transport seam for the territory engine.
//!
//! The tick driver hands each outbound tick to a `TransportAdapter` at
//! tick end; this crate provides that trait plus one reference
//! implementation, [`adapter::WsBroadcastAdapter`], built on `axum` and
//! [`tokio::sync::broadcast`].
//!
//! # Modules
//!
//! - [`adapter`] -- The `TransportAdapter` trait and the `WebSocket` broadcast adapter
//! - [`ws`] -- The `WebSocket` upgrade handler that subscribes to the adapter
//! - [`router`] -- Axum route assembly
//! - [`server`] -- Server lifecycle (bind + serve)
//! - [`handlers`] -- The status-page HTTP handler
//! - [`error`] -- Shared error types

pub mod adapter;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod ws;

pub use adapter::{TransportAdapter, WsBroadcastAdapter};
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
