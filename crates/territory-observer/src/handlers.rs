//! HTTP handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/ws/room` | `WebSocket` outbound-tick stream |

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::adapter::WsBroadcastAdapter;

/// Serve a minimal HTML status page linking to the `WebSocket` stream.
///
/// This is the reference dashboard; a full graphics client is an
/// external collaborator.
pub async fn index(State(_adapter): State<Arc<WsBroadcastAdapter>>) -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Territory Observer</title>
    <style>
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }
        h1 { color: #58a6ff; margin-bottom: 0.25rem; }
        .subtitle { color: #8b949e; margin-top: 0; }
        a { color: #58a6ff; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .status { color: #3fb950; font-weight: bold; }
        hr { border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }
    </style>
</head>
<body>
    <h1>Territory Observer</h1>
    <p class="subtitle">Transport adapter status page</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <hr>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/room</code> -- live outbound-tick stream</li>
    </ul>
</body>
</html>"#,
    )
}
