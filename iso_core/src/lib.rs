//! # iso_core
//!
//! Pure algorithms for extracting isosurfaces from scalar fields sampled on a
//! regular 3D lattice.
//!
//! This crate holds the parts of the pipeline that need no storage of their own:
//! lattice index arithmetic, per-cell marching cubes classification, linear edge
//! interpolation and the constant lookup tables. The `iso_rs` crate builds the
//! sampler, triangulator, normal estimator and rebuild controller on top.
//!
//! ## Features
//!
//! - **no_std compatible**: Works in embedded environments with the `alloc` feature
//! - **Pure algorithms**: No storage implementation, just math
//! - **Marching cubes**: Zero-runtime-cost lookup tables
//! - **Shared edge addressing**: Every lattice edge has one global slot, so cells
//!   sharing a face agree on their crossing points bit for bit
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables standard library support
//! - `alloc`: Enables heap allocation (Vec, etc.) without full std
//! - `serde`: Serialize/Deserialize for [`Point3`]
//!
//! ## Modules
//!
//! - [`types`]: Core data types (Point3, Axis, VertexCoord, CellCoord)
//! - [`coords`]: Lattice dimensions and index mappings
//! - [`traits`]: The `ScalarField` capability and the `LatticeProvider` storage seam
//! - [`interpolation`]: Edge crossing interpolation
//! - [`marching_cubes`]: Tables and per-cell extraction
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use iso_core::prelude::*;
//!
//! let dims = LatticeDims::new(8, 8, 8)?;
//! let cell = CellCoord::new(3, 4, 5);
//! let code = classify_cell(&lattice, cell, 1.0);
//! for [e0, e1, e2] in triangle_edges(code) {
//!     // ...
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Conditional std/alloc support
#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

// Internal alloc prelude for conditional compilation
#[cfg(feature = "std")]
mod alloc_prelude {
    pub use std::vec::Vec;
}

#[cfg(all(feature = "alloc", not(feature = "std")))]
mod alloc_prelude {
    pub use alloc::vec::Vec;
}

pub mod coords;
pub mod error;
pub mod interpolation;
pub mod marching_cubes;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// Provides the most commonly used types and functions.
pub mod prelude {
    pub use crate::coords::{cell_diagonal, vertex_position, LatticeDims};
    pub use crate::error::IsoCoreError;
    pub use crate::interpolation::{interpolate_edge, DEGENERATE_EPSILON};
    pub use crate::marching_cubes::{
        classify_cell, cube_index, edge_mask, edge_point, edge_slot, process_cell_no_alloc,
        triangle_edges,
    };
    pub use crate::traits::{LatticeProvider, ScalarField};
    pub use crate::types::{Axis, CellCoord, Point3, VertexCoord};

    #[cfg(any(feature = "std", feature = "alloc"))]
    pub use crate::marching_cubes::process_cell;
}

// Re-export everything at crate root for convenience
pub use coords::{cell_diagonal, vertex_position, LatticeDims};
pub use error::IsoCoreError;
pub use interpolation::{interpolate_edge, DEGENERATE_EPSILON};
pub use traits::{LatticeProvider, ScalarField};
pub use types::{Axis, CellCoord, Point3, VertexCoord};
