//! # iso_rs
//!
//! Interactive isosurface runtime: samples a scalar field on a regular lattice,
//! extracts the threshold level set with marching cubes and keeps the mesh in
//! sync as the threshold, the lattice or the field change.
//!
//! The per-cell algorithms live in `iso_core`; this crate owns the storage and
//! the pipeline around them:
//!
//! - **Sampling**: [`Lattice`] caches one position and one value per vertex
//! - **Classification**: [`Classification`] holds the 8-bit code of every cell
//! - **Triangulation**: [`triangulate`] turns codes into an indexed [`SurfaceMesh`]
//! - **Normals**: area-weighted or field-gradient vertex normals
//! - **Control**: [`IsoSurface`] reruns only the stages a change invalidates
//!
//! ## Quick Start
//!
//! ```ignore
//! use iso_rs::{fields, IsoSurfaceBuilder, Point3};
//!
//! let mut surface = IsoSurfaceBuilder::new()
//!     .field(fields::radial_squared(Point3::ZERO))
//!     .origin(Point3::splat(-2.0))
//!     .cell_size(0.5)
//!     .resolution(8, 8, 8)
//!     .threshold(1.0)
//!     .build()?;
//!
//! println!("value range: {:?}", surface.value_range());
//!
//! // Moving the threshold reuses the cached samples
//! let report = surface.on_threshold_changed(2.0)?;
//! println!("{} triangles", report.triangle_count);
//!
//! // Hand the mesh to a renderer
//! let buffers = surface.take_buffers();
//! ```
//!
//! ## Pipeline
//!
//! Stages always run in the order Sample, Classify, Triangulate, Normals, and
//! each finishes before the next starts. Sampling and classification touch
//! disjoint vertices and cells, so with the `parallel` feature they fan out over
//! rayon and join before triangulation; the results are identical to the serial
//! path.
//!
//! ## Feature Flags
//!
//! - `parallel` (default): rayon-parallel sampling, classification and
//!   gradient normals
//! - `serde`: Serialize/Deserialize for the configuration types

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod builder;
mod classify;
mod config;
mod controller;
mod error;
mod lattice;
mod mesh;
mod normals;
mod triangulate;

pub mod fields;

pub use builder::IsoSurfaceBuilder;
pub use classify::Classification;
pub use config::{GeometryConfig, IndexingStrategy, MeshingConfig, NormalMode};
pub use controller::{
    BoxedField, IsoSurface, ParameterEvent, RebuildReport, RebuildState, RebuildTrigger,
    Wireframe,
};
pub use error::{IsoError, Result};
pub use lattice::{Lattice, ValueRange};
pub use mesh::{MeshBuffers, MeshStats, SurfaceMesh, Triangle};
pub use normals::{
    area_weighted_normals, field_gradient, gradient_normals, GRADIENT_STEP_FACTOR, MIN_STEP_ULPS,
};
pub use triangulate::triangulate;

// Re-export iso_core types for convenience
pub use iso_core::{
    cell_diagonal, Axis, CellCoord, IsoCoreError, LatticeDims, LatticeProvider, Point3,
    ScalarField, VertexCoord,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use iso_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::IsoSurfaceBuilder;
    pub use crate::config::{GeometryConfig, IndexingStrategy, MeshingConfig, NormalMode};
    pub use crate::controller::{IsoSurface, ParameterEvent, RebuildReport, RebuildState};
    pub use crate::error::{IsoError, Result};
    pub use crate::mesh::{MeshBuffers, SurfaceMesh};

    pub use iso_core::{LatticeProvider, Point3, ScalarField};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() {
        let mut surface = IsoSurfaceBuilder::new()
            .field(fields::radial_squared(Point3::ZERO))
            .geometry(GeometryConfig::centered(0.5, 8, 8, 8))
            .threshold(1.0)
            .build()
            .unwrap();

        let first = surface.mesh().triangle_count();
        assert!(first > 0);

        // A larger sphere crosses more cells
        let report = surface.on_threshold_changed(2.5).unwrap();
        assert!(report.triangle_count > first);

        let buffers = surface.take_buffers();
        assert_eq!(buffers.triangle_count(), report.triangle_count);
    }

    #[test]
    fn test_pipeline_by_hand() {
        let geometry = GeometryConfig::centered(0.5, 8, 8, 8);
        let lattice = Lattice::sample(geometry, &fields::radial_squared(Point3::ZERO)).unwrap();
        let classification = Classification::classify(&lattice, 1.0);
        let mut mesh = triangulate(&lattice, &classification, IndexingStrategy::SharedEdges);
        mesh.normals = area_weighted_normals(&mesh.positions, &mesh.indices);

        let stats = mesh.stats();
        assert_eq!(stats.triangle_count, classification.triangle_count());
        // Inscribed in the unit sphere, so a little under its area
        assert!(stats.surface_area > 10.0);
        assert!(stats.surface_area < 4.0 * core::f32::consts::PI);
    }

    #[test]
    fn test_value_range_diagnostic() {
        let surface = IsoSurfaceBuilder::new()
            .field(fields::plane_x(0.0))
            .geometry(GeometryConfig::new(Point3::new(-1.0, 0.0, 0.0), 0.5, 4, 1, 1))
            .build()
            .unwrap();

        let range = surface.value_range();
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 1.0);
    }
}
