//! Error types for iso_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during iso_core operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsoCoreError {
    /// The lattice cell edge length is not a positive finite number.
    InvalidCellSize {
        /// The rejected cell size.
        value: f32,
    },
    /// The lattice origin has a NaN or infinite component.
    NonFiniteOrigin,
    /// A per-axis cell count is zero.
    InvalidResolution {
        /// Axis name (`'x'`, `'y'` or `'z'`).
        axis: char,
        /// The rejected cell count.
        value: u32,
    },
    /// The lattice has more vertices (or edge slots) than a `u32` index can address.
    LatticeTooLarge {
        /// Number of vertices the lattice would have.
        vertices: u64,
    },
    /// A vertex coordinate lies outside `[0, n]` on some axis.
    VertexOutOfBounds {
        /// The coordinate component that was out of bounds.
        coord: u32,
        /// The maximum valid value (n).
        max: u32,
    },
    /// A cell coordinate lies outside `[0, n)` on some axis.
    CellOutOfBounds {
        /// The coordinate component that was out of bounds.
        coord: u32,
        /// The maximum valid value (n - 1).
        max: u32,
    },
}

impl fmt::Display for IsoCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsoCoreError::InvalidCellSize { value } => {
                write!(f, "cell size {} must be positive and finite", value)
            }
            IsoCoreError::NonFiniteOrigin => write!(f, "lattice origin must be finite"),
            IsoCoreError::InvalidResolution { axis, value } => {
                write!(f, "resolution along {} must be at least 1, got {}", axis, value)
            }
            IsoCoreError::LatticeTooLarge { vertices } => {
                write!(f, "lattice with {} vertices exceeds u32 indexing", vertices)
            }
            IsoCoreError::VertexOutOfBounds { coord, max } => {
                write!(f, "vertex coordinate {} exceeds maximum {}", coord, max)
            }
            IsoCoreError::CellOutOfBounds { coord, max } => {
                write!(f, "cell coordinate {} exceeds maximum {}", coord, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IsoCoreError {}
