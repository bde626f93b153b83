//! Error types for iso_rs operations.

use iso_core::IsoCoreError;
use thiserror::Error;

/// Errors that can occur while building or rebuilding an isosurface.
///
/// A rejected request never touches the previously committed mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsoError {
    /// Lattice parameters were rejected before anything was allocated.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Which parameter was out of range.
        reason: IsoCoreError,
    },

    /// The threshold is NaN or infinite.
    #[error("invalid threshold {value}: must be finite")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f32,
    },

    /// A builder was finished without a scalar field.
    #[error("no scalar field configured")]
    NoField,

    /// A lattice coordinate was out of range, from the checked index helpers.
    #[error("core error: {0}")]
    Core(#[from] IsoCoreError),
}

/// Result type alias for iso_rs operations.
pub type Result<T> = core::result::Result<T, IsoError>;
