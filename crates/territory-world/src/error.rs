//! Error types for the `territory-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur during map or ownership-matrix operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A coordinate lay outside `[0, width) x [0, height)`.
    #[error("coordinate ({x}, {y}) is out of bounds for a {width}x{height} map")]
    OutOfBounds {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },

    /// A room was asked to start with a degenerate or mismatched map.
    #[error("invalid map dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// What made the dimensions invalid.
        reason: String,
    },
}
