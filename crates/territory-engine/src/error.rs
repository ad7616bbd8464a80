//! Error types for the territory engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the tick loop.

/// Top-level error for the territory engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {0}")]
    Config(#[from] serde_yml::Error),

    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The persistence store failed to connect, migrate, or save.
    #[error("persistence error: {0}")]
    Db(#[from] territory_db::DbError),

    /// The tick driver could not advance the room's clock.
    #[error("tick error: {0}")]
    Tick(#[from] territory_core::TickError),
}
