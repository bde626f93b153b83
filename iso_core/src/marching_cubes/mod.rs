//! Marching Cubes cell processing.
//!
//! This module provides the marching cubes algorithm for extracting triangles
//! from a sampled lattice. It includes:
//!
//! - The canonical 256-entry edge and triangle tables, plus the corner/edge topology
//! - Per-cell classification and edge interpolation
//! - Both allocating and no-alloc variants of per-cell triangle extraction
//!
//! # Example
//!
//! ```ignore
//! use iso_core::marching_cubes::{classify_cell, edge_mask, process_cell_no_alloc};
//! use iso_core::types::CellCoord;
//!
//! let code = classify_cell(&lattice, CellCoord::new(2, 3, 1), 0.5);
//! let crossed = edge_mask(code).count_ones();
//! let (triangles, count) = process_cell_no_alloc(&lattice, CellCoord::new(2, 3, 1), 0.5);
//! ```

mod algorithm;
mod tables;

pub use algorithm::{
    classify_cell, corner_indices, corner_values, cube_index, edge_endpoints, edge_mask,
    edge_point, edge_points, edge_slot, process_cell_no_alloc, triangle_count, triangle_edges,
    TriangleEdges,
};
pub use tables::{
    CORNER_OFFSETS, EDGE_SLOTS, EDGE_TABLE, EDGE_VERTICES, MAX_TRIANGLES_PER_CELL, TRI_SENTINEL,
    TRI_TABLE,
};

#[cfg(any(feature = "std", feature = "alloc"))]
pub use algorithm::process_cell;
