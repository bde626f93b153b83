//! Lattice geometry and meshing options.

use iso_core::{cell_diagonal, IsoCoreError, LatticeDims, Point3};

use crate::error::{IsoError, Result};

/// Placement and resolution of the sampling lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryConfig {
    /// World position of lattice vertex (0, 0, 0).
    pub origin: Point3,
    /// Edge length of every cell.
    pub cell_size: f32,
    /// Cell counts along x, y and z.
    pub resolution: [u32; 3],
}

impl GeometryConfig {
    /// Create a geometry from its raw parameters. Nothing is validated here.
    ///
    /// # Arguments
    /// * `origin` - World position of the first lattice vertex
    /// * `cell_size` - Edge length of every cell
    /// * `nx`, `ny`, `nz` - Cell counts per axis
    #[inline]
    pub const fn new(origin: Point3, cell_size: f32, nx: u32, ny: u32, nz: u32) -> Self {
        Self {
            origin,
            cell_size,
            resolution: [nx, ny, nz],
        }
    }

    /// Create a geometry whose lattice is centred on the world origin.
    pub fn centered(cell_size: f32, nx: u32, ny: u32, nz: u32) -> Self {
        let half = -0.5 * cell_size;
        let origin = Point3::new(half * nx as f32, half * ny as f32, half * nz as f32);
        Self::new(origin, cell_size, nx, ny, nz)
    }

    /// Check every parameter without allocating.
    ///
    /// # Errors
    /// `InvalidGeometry` if the cell size is not positive and finite, the
    /// origin is not finite, any resolution is zero, or the lattice is too
    /// large for `u32` indices.
    pub fn validate(&self) -> Result<()> {
        self.dims().map(|_| ())
    }

    /// Validated lattice dimensions.
    pub fn dims(&self) -> Result<LatticeDims> {
        let invalid = |reason| IsoError::InvalidGeometry { reason };

        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid(IsoCoreError::InvalidCellSize {
                value: self.cell_size,
            }));
        }
        if !self.origin.is_finite() {
            return Err(invalid(IsoCoreError::NonFiniteOrigin));
        }

        let [nx, ny, nz] = self.resolution;
        LatticeDims::new(nx, ny, nz).map_err(invalid)
    }

    /// Length of a cell's space diagonal.
    #[inline]
    pub fn cell_diagonal(&self) -> f32 {
        cell_diagonal(self.cell_size)
    }

    /// World position of the last lattice vertex.
    pub fn far_corner(&self) -> Point3 {
        let [nx, ny, nz] = self.resolution;
        self.origin + Point3::new(nx as f32, ny as f32, nz as f32) * self.cell_size
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::centered(0.1, 20, 20, 20)
    }
}

/// How triangle corners are mapped onto output positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexingStrategy {
    /// One position per crossed lattice edge; neighbouring cells share it.
    #[default]
    SharedEdges,
    /// One position per crossed edge of each cell; no sharing across cells.
    PerCell,
}

/// Which estimator produces per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalMode {
    /// Area-weighted sum of adjacent face normals.
    #[default]
    AreaWeighted,
    /// Normalised central-difference gradient of the field at each position.
    FieldGradient,
}

/// Options for turning a classified lattice into a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshingConfig {
    /// Vertex indexing strategy.
    pub strategy: IndexingStrategy,
    /// Normal estimator.
    pub normals: NormalMode,
}

impl MeshingConfig {
    /// Create meshing options.
    #[inline]
    pub const fn new(strategy: IndexingStrategy, normals: NormalMode) -> Self {
        Self { strategy, normals }
    }
}
