//! Axum router construction for the Observer transport seam.
//!
//! Assembles the status page and `WebSocket` route into a single
//! [`Router`] with CORS middleware enabled for cross-origin dashboard
//! access.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapter::WsBroadcastAdapter;
use crate::handlers;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/room` -- `WebSocket` outbound-tick stream
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(adapter: Arc<WsBroadcastAdapter>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/room", get(ws::ws_room))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(adapter)
}
