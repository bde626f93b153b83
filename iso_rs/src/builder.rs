//! IsoSurfaceBuilder pattern for constructing IsoSurface.
//!
//! Provides a fluent API for configuring a controller before its first build.

use iso_core::{Point3, ScalarField};

use crate::config::{GeometryConfig, IndexingStrategy, MeshingConfig, NormalMode};
use crate::controller::{BoxedField, IsoSurface};
use crate::error::{IsoError, Result};

/// Builder for constructing [`IsoSurface`] instances.
///
/// Everything except the field has a default: a centred 20³ lattice with
/// 0.1 cells, threshold 0, shared-edge indexing and area-weighted normals.
///
/// # Example
///
/// ```ignore
/// use iso_rs::{fields, IsoSurfaceBuilder};
///
/// let surface = IsoSurfaceBuilder::new()
///     .field(fields::radial_squared(Point3::ZERO))
///     .origin(Point3::splat(-2.0))
///     .cell_size(0.5)
///     .resolution(8, 8, 8)
///     .threshold(1.0)
///     .build()?;
/// ```
pub struct IsoSurfaceBuilder {
    field: Option<BoxedField>,
    geometry: GeometryConfig,
    threshold: f32,
    meshing: MeshingConfig,
    wireframe_visible: bool,
}

impl IsoSurfaceBuilder {
    /// Create a builder with default parameters and no field.
    pub fn new() -> Self {
        Self {
            field: None,
            geometry: GeometryConfig::default(),
            threshold: 0.0,
            meshing: MeshingConfig::default(),
            wireframe_visible: false,
        }
    }

    /// Set the scalar field to contour.
    ///
    /// Any `Fn(Point3) -> f32` closure that is `Send + Sync` works.
    pub fn field<F>(mut self, field: F) -> Self
    where
        F: ScalarField + Send + Sync + 'static,
    {
        self.field = Some(Box::new(field));
        self
    }

    /// Set an already boxed scalar field.
    pub fn boxed_field(mut self, field: BoxedField) -> Self {
        self.field = Some(field);
        self
    }

    /// Replace the whole lattice geometry.
    pub fn geometry(mut self, geometry: GeometryConfig) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the world position of lattice vertex (0, 0, 0).
    pub fn origin(mut self, origin: Point3) -> Self {
        self.geometry.origin = origin;
        self
    }

    /// Set the cell edge length.
    pub fn cell_size(mut self, cell_size: f32) -> Self {
        self.geometry.cell_size = cell_size;
        self
    }

    /// Set the cell counts per axis.
    pub fn resolution(mut self, nx: u32, ny: u32, nz: u32) -> Self {
        self.geometry.resolution = [nx, ny, nz];
        self
    }

    /// Centre the lattice on the world origin using the current cell size and
    /// resolution.
    pub fn centered(mut self) -> Self {
        let [nx, ny, nz] = self.geometry.resolution;
        self.geometry = GeometryConfig::centered(self.geometry.cell_size, nx, ny, nz);
        self
    }

    /// Set the threshold.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the vertex indexing strategy.
    pub fn strategy(mut self, strategy: IndexingStrategy) -> Self {
        self.meshing.strategy = strategy;
        self
    }

    /// Set the normal estimator.
    pub fn normals(mut self, normals: NormalMode) -> Self {
        self.meshing.normals = normals;
        self
    }

    /// Show the lattice wireframe from the start.
    pub fn wireframe_visible(mut self, visible: bool) -> Self {
        self.wireframe_visible = visible;
        self
    }

    /// Current geometry, as it would be built.
    pub fn current_geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Build the controller and run its initial full rebuild.
    ///
    /// # Errors
    /// - `NoField` if no field was set
    /// - `InvalidGeometry` if the lattice parameters are out of range
    /// - `InvalidThreshold` if the threshold is not finite
    pub fn build(self) -> Result<IsoSurface> {
        let field = self.field.ok_or(IsoError::NoField)?;
        let mut surface = IsoSurface::new(field, self.geometry, self.threshold, self.meshing)?;
        surface.set_wireframe_visible(self.wireframe_visible);
        Ok(surface)
    }
}

impl Default for IsoSurfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
