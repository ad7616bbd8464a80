//! Tick-loop binary for the territory engine.
//!
//! Wires together room configuration, the starting map, the tick
//! driver, the transport seam, and (optionally) the persistence seam
//! into one running room. Lobby/matchmaking, multi-room hosting, and
//! real map generation live above this binary; this process drives a
//! single room from an in-process starting map.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load room configuration from `territory-config.yaml`
//! 3. Load infrastructure configuration (host, port, database)
//! 4. Build the starting map and an empty room
//! 5. Create the inbound command queue
//! 6. Start the transport adapter's `WebSocket` server
//! 7. Connect the persistence adapter, if configured
//! 8. Run the tick loop until a winner emerges

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use territory_core::config::SimulationConfig;
use territory_core::tick::{Room, run_tick};
use territory_db::{DbError, PostgresPool, PostgresRoomStore, RoomStore};
use territory_observer::{ServerConfig, TransportAdapter, WsBroadcastAdapter};
use territory_types::{Command, RoomId, RoomSnapshot};
use territory_world::uniform_grassland_map;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Host, port, starting map size, and optional persistence URL -- the
/// settings this binary owns that [`SimulationConfig`] does not (§6
/// covers room tunables only, not process wiring).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfrastructureConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_observer_port")]
    observer_port: u16,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default = "default_map_width")]
    map_width: u32,
    #[serde(default = "default_map_height")]
    map_height: u32,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            observer_port: default_observer_port(),
            database_url: None,
            map_width: default_map_width(),
            map_height: default_map_height(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}
const fn default_observer_port() -> u16 {
    8080
}
const fn default_map_width() -> u32 {
    100
}
const fn default_map_height() -> u32 {
    100
}

/// Application entry point for the territory engine.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the persistence
/// adapter cannot connect, or the tick loop itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 2. Load room configuration (ahead of logging init, which reads its level).
    let config = load_config()?;

    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("territory-engine starting");
    info!(
        tick_rate_ms = config.world.tick_rate_ms,
        win_condition_percentage = config.world.win_condition_percentage,
        "Room configuration loaded"
    );

    // 3. Load infrastructure configuration.
    let infra = load_infrastructure_config()?;
    info!(
        host = infra.host,
        observer_port = infra.observer_port,
        map_width = infra.map_width,
        map_height = infra.map_height,
        persistence = infra.database_url.is_some(),
        "Infrastructure configuration loaded"
    );

    // 4. Build the starting map and an empty room.
    let map = uniform_grassland_map(infra.map_width, infra.map_height);
    let mut room = Room::new(RoomId::new(), map, config);
    info!(room_id = %room.room_id, "Room created");

    // 5. Create the inbound command queue. An out-of-scope lobby or API
    //    layer would clone `command_tx` to submit `FoundNation`,
    //    `BuildStructure`, and `DrawArrow` commands into this room.
    let (_command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();

    // 6. Start the transport adapter.
    let adapter = Arc::new(WsBroadcastAdapter::new());
    let server_config = ServerConfig { host: infra.host, port: infra.observer_port };
    let observer_adapter = Arc::clone(&adapter);
    tokio::spawn(async move {
        if let Err(error) = territory_observer::start_server(&server_config, observer_adapter).await {
            warn!(%error, "observer server exited");
        }
    });
    info!(port = infra.observer_port, "Observer transport started");

    // 7. Connect the persistence adapter, if configured.
    let store = match infra.database_url {
        Some(url) => {
            let pool = PostgresPool::connect_url(&url).await?;
            pool.run_migrations().await?;
            info!("Persistence adapter connected");
            Some(PostgresRoomStore::new(pool))
        }
        None => {
            info!("No database_url configured, running without persistence");
            None
        }
    };

    // 8. Run the tick loop.
    run_tick_loop(&mut room, &adapter, store.as_ref(), &mut command_rx).await?;

    info!("territory-engine shutdown complete");
    Ok(())
}

/// Load the room configuration from `territory-config.yaml`, falling
/// back to defaults if the file is absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new("territory-config.yaml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)?;
        Ok(SimulationConfig::from_yaml_str(&contents)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load the `infrastructure` section of `territory-config.yaml`, the
/// same sub-key-extraction pattern every other per-subsystem config in
/// this workspace uses to share one YAML document.
fn load_infrastructure_config() -> Result<InfrastructureConfig, EngineError> {
    let config_path = Path::new("territory-config.yaml");
    if !config_path.exists() {
        return Ok(InfrastructureConfig::default());
    }
    let contents = std::fs::read_to_string(config_path)?;
    let raw: serde_yml::Value = serde_yml::from_str(&contents)?;
    match raw.get("infrastructure") {
        Some(value) => Ok(serde_yml::from_value(value.clone())?),
        None => Ok(InfrastructureConfig::default()),
    }
}

/// Drive ticks at `room.config.world.tick_rate_ms` cadence until a
/// winner emerges, draining the inbound command queue and publishing
/// (and optionally persisting) every tick's outbound payload.
async fn run_tick_loop(
    room: &mut Room,
    adapter: &WsBroadcastAdapter,
    store: Option<&PostgresRoomStore>,
    command_rx: &mut mpsc::UnboundedReceiver<Command>,
) -> Result<(), EngineError> {
    let mut interval = tokio::time::interval(Duration::from_millis(room.config.world.tick_rate_ms));
    let mut rng = rand::rng();

    loop {
        interval.tick().await;
        let commands = drain_commands(command_rx);
        let report = run_tick(room, commands, &mut rng)?;

        if let Err(error) = adapter.publish(&report.outbound) {
            warn!(%error, tick = report.tick, "failed to publish outbound tick");
        }

        if let Some(store) = store {
            let snapshot = build_snapshot(room, report.tick);
            if let Err(error) = save_snapshot(store, &snapshot).await {
                warn!(%error, tick = report.tick, "failed to persist room snapshot");
            }
        }

        if let Some(winner) = report.winner {
            info!(tick = report.tick, winner = winner.get(), "room has a winner, stopping tick loop");
            break;
        }
    }
    Ok(())
}

/// Drain every command currently queued, without blocking (§5, "drain
/// commands" is the tick driver's first phase).
fn drain_commands(rx: &mut mpsc::UnboundedReceiver<Command>) -> Vec<Command> {
    let mut commands = Vec::new();
    while let Ok(command) = rx.try_recv() {
        commands.push(command);
    }
    commands
}

async fn save_snapshot(store: &PostgresRoomStore, snapshot: &RoomSnapshot) -> Result<(), DbError> {
    store.save_snapshot(snapshot).await
}

/// Assemble a [`RoomSnapshot`] from `room`'s current state, as of `tick`.
fn build_snapshot(room: &Room, tick: u64) -> RoomSnapshot {
    let arrows = room
        .registry
        .iter()
        .flat_map(|(_, nation)| {
            [nation.arrow_orders.attack.clone(), nation.arrow_orders.defend.clone()]
        })
        .flatten()
        .collect();
    let nations = room.registry.iter().map(|(_, nation)| nation.clone()).collect();

    RoomSnapshot {
        room_id: room.room_id,
        width: room.map.width(),
        height: room.map.height(),
        ownership: room.matrix.current_slice().to_vec(),
        nations,
        arrows,
        claims: room.claims.clone(),
        tick,
        last_modified: chrono::Utc::now(),
    }
}
