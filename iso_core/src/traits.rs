//! Traits separating the extraction algorithms from field and storage types.
//!
//! - [`ScalarField`] is the `point -> scalar` oracle being contoured. Any closure
//!   `Fn(Point3) -> f32` already is one.
//! - [`LatticeProvider`] gives the marching cubes routines read access to sampled
//!   lattice data, so the runtime crate can own its own storage.

use crate::coords::{vertex_position, LatticeDims};
use crate::types::{Point3, VertexCoord};

/// A continuous scalar field evaluated at world-space points.
///
/// The field may be arbitrarily expensive or even non-deterministic; callers that
/// resample a random field get different results, and that is the field's
/// business. Implementations should return a finite value; non-finite results
/// are treated as "far outside" by the sampler.
pub trait ScalarField {
    /// Evaluate the field at `p`.
    fn evaluate(&self, p: Point3) -> f32;
}

impl<F> ScalarField for F
where
    F: Fn(Point3) -> f32,
{
    #[inline]
    fn evaluate(&self, p: Point3) -> f32 {
        self(p)
    }
}

/// Read access to a sampled lattice.
///
/// Implementors store one position and one cached scalar value per lattice
/// vertex, addressed by [`LatticeDims::vertex_index`].
pub trait LatticeProvider {
    /// Per-axis cell counts.
    fn dims(&self) -> LatticeDims;

    /// World-space position of the lattice origin (vertex `(0, 0, 0)`).
    fn origin(&self) -> Point3;

    /// Uniform cell edge length.
    fn cell_size(&self) -> f32;

    /// Cached scalar value at a vertex, by flat index.
    fn value_at(&self, index: usize) -> f32;

    /// World-space position of a vertex, by flat index.
    ///
    /// Default implementation recomputes `origin + cell_size * (i, j, k)`.
    #[inline]
    fn position_at(&self, index: usize) -> Point3 {
        let v = self.dims().vertex_coord(index);
        vertex_position(self.origin(), self.cell_size(), v)
    }

    /// Cached scalar value at a vertex coordinate.
    #[inline]
    fn value(&self, v: VertexCoord) -> f32 {
        self.value_at(self.dims().vertex_index(v))
    }

    /// World-space position of a vertex coordinate.
    #[inline]
    fn position(&self, v: VertexCoord) -> Point3 {
        vertex_position(self.origin(), self.cell_size(), v)
    }
}
