//! Sampled lattice storage.
//!
//! A [`Lattice`] owns one position and one cached field value per lattice
//! vertex, in `(i, j, k)` row-major order. It is rebuilt in full whenever the
//! geometry or the field changes and is read by every later pipeline stage
//! through [`LatticeProvider`].

use iso_core::{
    vertex_position, Axis, LatticeDims, LatticeProvider, Point3, ScalarField, VertexCoord,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::GeometryConfig;
use crate::error::Result;

/// Observed range of the finite sampled values.
///
/// Both ends are `+inf` when no sample was finite.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    /// Smallest finite sample.
    pub min: f32,
    /// Largest finite sample.
    pub max: f32,
}

impl ValueRange {
    /// Range of the finite entries of `values`.
    pub fn of(values: &[f32]) -> Self {
        let mut range = Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        };
        for &v in values.iter().filter(|v| v.is_finite()) {
            range.min = range.min.min(v);
            range.max = range.max.max(v);
        }
        if range.max == f32::NEG_INFINITY {
            range.max = f32::INFINITY;
        }
        range
    }

    /// True when at least one sample was finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Positions and cached field values of every lattice vertex.
#[derive(Debug, Clone)]
pub struct Lattice {
    geometry: GeometryConfig,
    dims: LatticeDims,
    positions: Vec<Point3>,
    values: Vec<f32>,
    range: ValueRange,
    non_finite: usize,
}

impl Lattice {
    /// Sample `field` at every vertex of the lattice described by `geometry`.
    ///
    /// Non-finite field results are stored as `+inf`, so the vertex reads as
    /// outside for every threshold, and counted in [`Lattice::non_finite_count`].
    ///
    /// # Errors
    /// `InvalidGeometry` if `geometry` fails validation. Nothing is allocated
    /// in that case.
    pub fn sample<F>(geometry: GeometryConfig, field: &F) -> Result<Self>
    where
        F: ScalarField + Sync + ?Sized,
    {
        let dims = geometry.dims()?;

        let positions: Vec<Point3> = dims
            .vertices()
            .map(|v| vertex_position(geometry.origin, geometry.cell_size, v))
            .collect();

        let mut lattice = Self {
            geometry,
            dims,
            values: Vec::new(),
            positions,
            range: ValueRange::of(&[]),
            non_finite: 0,
        };
        lattice.resample(field);
        Ok(lattice)
    }

    /// Re-evaluate `field` at the existing vertex positions.
    pub fn resample<F>(&mut self, field: &F)
    where
        F: ScalarField + Sync + ?Sized,
    {
        #[cfg(feature = "parallel")]
        let mut values: Vec<f32> = self
            .positions
            .par_iter()
            .map(|&p| field.evaluate(p))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let mut values: Vec<f32> = self.positions.iter().map(|&p| field.evaluate(p)).collect();

        let mut non_finite = 0;
        for v in values.iter_mut().filter(|v| !v.is_finite()) {
            *v = f32::INFINITY;
            non_finite += 1;
        }
        if non_finite > 0 {
            log::warn!(
                "{} of {} samples were not finite and are treated as outside",
                non_finite,
                values.len()
            );
        }

        self.range = ValueRange::of(&values);
        self.values = values;
        self.non_finite = non_finite;

        log::debug!(
            "sampled {} vertices, value range [{}, {}]",
            self.values.len(),
            self.range.min,
            self.range.max
        );
    }

    /// Geometry this lattice was sampled with.
    #[inline]
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Vertex positions in storage order.
    #[inline]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Cached field values in storage order.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Range of the finite samples.
    #[inline]
    pub fn value_range(&self) -> ValueRange {
        self.range
    }

    /// Number of samples that came back NaN or infinite.
    #[inline]
    pub fn non_finite_count(&self) -> usize {
        self.non_finite
    }

    /// Number of lattice vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.values.len()
    }

    /// Position and cached value of the vertex at `v`.
    ///
    /// # Errors
    /// `Core(VertexOutOfBounds)` if any coordinate exceeds the lattice.
    pub fn vertex_sample(&self, v: VertexCoord) -> Result<(Point3, f32)> {
        let index = self.dims.checked_vertex_index(v)?;
        Ok((self.positions[index], self.values[index]))
    }

    /// Line-list indices drawing every lattice edge, two indices per edge.
    ///
    /// Indices refer to [`Lattice::positions`]. Edges are emitted per vertex in
    /// storage order, toward +x, then +y, then +z.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let dims = self.dims;
        let [nx, ny, nz] = dims.as_array().map(|n| n as usize);
        let edge_count =
            nx * (ny + 1) * (nz + 1) + (nx + 1) * ny * (nz + 1) + (nx + 1) * (ny + 1) * nz;

        let mut indices = Vec::with_capacity(edge_count * 2);
        for v in dims.vertices() {
            let from = dims.vertex_index(v) as u32;
            for axis in Axis::ALL {
                if dims.has_edge(v, axis) {
                    indices.push(from);
                    indices.push(dims.vertex_index(v.step(axis)) as u32);
                }
            }
        }
        indices
    }
}

impl LatticeProvider for Lattice {
    #[inline]
    fn dims(&self) -> LatticeDims {
        self.dims
    }

    #[inline]
    fn origin(&self) -> Point3 {
        self.geometry.origin
    }

    #[inline]
    fn cell_size(&self) -> f32 {
        self.geometry.cell_size
    }

    #[inline]
    fn value_at(&self, index: usize) -> f32 {
        self.values[index]
    }

    #[inline]
    fn position_at(&self, index: usize) -> Point3 {
        self.positions[index]
    }
}
