//! Coordinate mathematics for the regular sampling lattice.
//!
//! A lattice of `nx * ny * nz` cells has `(nx+1)(ny+1)(nz+1)` vertices. Both
//! vertices and cells are stored in row-major `(i, j, k)` order with `k`
//! varying fastest:
//!
//! - vertex `(i, j, k) -> i*(ny+1)*(nz+1) + j*(nz+1) + k`
//! - cell `(i, j, k) -> i*ny*nz + j*nz + k`
//!
//! Every lattice edge is owned by its lower endpoint and addressed by the
//! global slot `3 * vertex_index + axis`.

use crate::error::IsoCoreError;
use crate::types::{Axis, CellCoord, Point3, VertexCoord};

/// Per-axis cell counts of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatticeDims {
    /// Cells along x.
    pub nx: u32,
    /// Cells along y.
    pub ny: u32,
    /// Cells along z.
    pub nz: u32,
}

impl LatticeDims {
    /// Create validated lattice dimensions.
    ///
    /// # Errors
    /// * `InvalidResolution` if any axis has zero cells
    /// * `LatticeTooLarge` if the edge slots (`3 * vertex_count`) overflow `u32`
    pub fn new(nx: u32, ny: u32, nz: u32) -> Result<Self, IsoCoreError> {
        for (axis, value) in [('x', nx), ('y', ny), ('z', nz)] {
            if value == 0 {
                return Err(IsoCoreError::InvalidResolution { axis, value });
            }
        }

        let vertices = (nx as u64 + 1) * (ny as u64 + 1) * (nz as u64 + 1);
        if vertices * 3 > u32::MAX as u64 {
            return Err(IsoCoreError::LatticeTooLarge { vertices });
        }

        Ok(Self { nx, ny, nz })
    }

    /// Cell counts as an array.
    #[inline]
    pub const fn as_array(&self) -> [u32; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Number of lattice vertices, `(nx+1)(ny+1)(nz+1)`.
    #[inline]
    pub const fn vertex_count(&self) -> usize {
        (self.nx as usize + 1) * (self.ny as usize + 1) * (self.nz as usize + 1)
    }

    /// Number of lattice cells, `nx * ny * nz`.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    /// Number of global edge slots (three per vertex, including the unused
    /// slots that would point past the far faces).
    #[inline]
    pub const fn edge_slot_count(&self) -> usize {
        self.vertex_count() * 3
    }

    /// Flat index of a vertex. The coordinate must be in range.
    #[inline]
    pub const fn vertex_index(&self, v: VertexCoord) -> usize {
        let sy = self.nz as usize + 1;
        let sx = (self.ny as usize + 1) * sy;
        v.i as usize * sx + v.j as usize * sy + v.k as usize
    }

    /// Inverse of [`vertex_index`](Self::vertex_index).
    #[inline]
    pub const fn vertex_coord(&self, index: usize) -> VertexCoord {
        let sy = self.nz as usize + 1;
        let sx = (self.ny as usize + 1) * sy;
        VertexCoord::new(
            (index / sx) as u32,
            ((index % sx) / sy) as u32,
            (index % sy) as u32,
        )
    }

    /// Flat index of a vertex, checking bounds.
    pub fn checked_vertex_index(&self, v: VertexCoord) -> Result<usize, IsoCoreError> {
        for (coord, max) in [(v.i, self.nx), (v.j, self.ny), (v.k, self.nz)] {
            if coord > max {
                return Err(IsoCoreError::VertexOutOfBounds { coord, max });
            }
        }
        Ok(self.vertex_index(v))
    }

    /// Flat index of a cell. The coordinate must be in range.
    #[inline]
    pub const fn cell_index(&self, c: CellCoord) -> usize {
        let sy = self.nz as usize;
        let sx = self.ny as usize * sy;
        c.i as usize * sx + c.j as usize * sy + c.k as usize
    }

    /// Inverse of [`cell_index`](Self::cell_index).
    #[inline]
    pub const fn cell_coord(&self, index: usize) -> CellCoord {
        let sy = self.nz as usize;
        let sx = self.ny as usize * sy;
        CellCoord::new(
            (index / sx) as u32,
            ((index % sx) / sy) as u32,
            (index % sy) as u32,
        )
    }

    /// Flat index of a cell, checking bounds.
    pub fn checked_cell_index(&self, c: CellCoord) -> Result<usize, IsoCoreError> {
        for (coord, n) in [(c.i, self.nx), (c.j, self.ny), (c.k, self.nz)] {
            if coord >= n {
                return Err(IsoCoreError::CellOutOfBounds { coord, max: n - 1 });
            }
        }
        Ok(self.cell_index(c))
    }

    /// Global slot of the lattice edge leaving `v` toward `+axis`.
    #[inline]
    pub const fn edge_slot(&self, v: VertexCoord, axis: Axis) -> usize {
        3 * self.vertex_index(v) + axis.index()
    }

    /// True if the edge leaving `v` toward `+axis` stays inside the lattice.
    #[inline]
    pub const fn has_edge(&self, v: VertexCoord, axis: Axis) -> bool {
        match axis {
            Axis::X => v.i < self.nx,
            Axis::Y => v.j < self.ny,
            Axis::Z => v.k < self.nz,
        }
    }

    /// Iterate over all vertex coordinates in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexCoord> + '_ {
        (0..self.vertex_count()).map(move |idx| self.vertex_coord(idx))
    }

    /// Iterate over all cell coordinates in storage order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.cell_count()).map(move |idx| self.cell_coord(idx))
    }
}

/// World-space position of a lattice vertex: `origin + cell_size * (i, j, k)`.
#[inline]
pub fn vertex_position(origin: Point3, cell_size: f32, v: VertexCoord) -> Point3 {
    origin + Point3::new(v.i as f32, v.j as f32, v.k as f32) * cell_size
}

/// Length of a cell's space diagonal.
#[inline]
pub fn cell_diagonal(cell_size: f32) -> f32 {
    cell_size * libm::sqrtf(3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_resolution() {
        assert_eq!(
            LatticeDims::new(0, 4, 4),
            Err(IsoCoreError::InvalidResolution { axis: 'x', value: 0 })
        );
        assert_eq!(
            LatticeDims::new(4, 4, 0),
            Err(IsoCoreError::InvalidResolution { axis: 'z', value: 0 })
        );
    }

    #[test]
    fn test_rejects_oversized_lattice() {
        let err = LatticeDims::new(2000, 2000, 2000).unwrap_err();
        assert!(matches!(err, IsoCoreError::LatticeTooLarge { .. }));
    }

    #[test]
    fn test_counts() {
        let dims = LatticeDims::new(2, 3, 4).unwrap();
        assert_eq!(dims.vertex_count(), 3 * 4 * 5);
        assert_eq!(dims.cell_count(), 2 * 3 * 4);
        assert_eq!(dims.edge_slot_count(), 3 * 60);
    }

    #[test]
    fn test_vertex_index_layout() {
        let dims = LatticeDims::new(2, 3, 4).unwrap();

        assert_eq!(dims.vertex_index(VertexCoord::new(0, 0, 0)), 0);
        assert_eq!(dims.vertex_index(VertexCoord::new(0, 0, 1)), 1);
        assert_eq!(dims.vertex_index(VertexCoord::new(0, 1, 0)), 5);
        assert_eq!(dims.vertex_index(VertexCoord::new(1, 0, 0)), 20);
        assert_eq!(dims.vertex_index(VertexCoord::new(2, 3, 4)), 59);
    }

    #[test]
    fn test_vertex_index_bijective() {
        let dims = LatticeDims::new(3, 2, 5).unwrap();
        let mut seen = [false; 4 * 3 * 6];

        for i in 0..=dims.nx {
            for j in 0..=dims.ny {
                for k in 0..=dims.nz {
                    let v = VertexCoord::new(i, j, k);
                    let idx = dims.vertex_index(v);
                    assert!(!seen[idx], "index {} produced twice", idx);
                    seen[idx] = true;
                    assert_eq!(dims.vertex_coord(idx), v);
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_cell_index_bijective() {
        let dims = LatticeDims::new(3, 2, 5).unwrap();
        for (expected, cell) in dims.cells().enumerate() {
            assert_eq!(dims.cell_index(cell), expected);
        }
        assert_eq!(dims.cell_index(CellCoord::new(1, 0, 0)), 10);
        assert_eq!(dims.cell_index(CellCoord::new(0, 1, 0)), 5);
    }

    #[test]
    fn test_checked_indices() {
        let dims = LatticeDims::new(2, 2, 2).unwrap();
        assert_eq!(dims.checked_vertex_index(VertexCoord::new(2, 2, 2)), Ok(26));
        assert_eq!(
            dims.checked_vertex_index(VertexCoord::new(3, 0, 0)),
            Err(IsoCoreError::VertexOutOfBounds { coord: 3, max: 2 })
        );
        assert_eq!(
            dims.checked_cell_index(CellCoord::new(0, 2, 0)),
            Err(IsoCoreError::CellOutOfBounds { coord: 2, max: 1 })
        );
    }

    #[test]
    fn test_edge_slots() {
        let dims = LatticeDims::new(2, 2, 2).unwrap();
        let v = VertexCoord::new(1, 1, 1);
        let base = dims.vertex_index(v) * 3;

        assert_eq!(dims.edge_slot(v, Axis::X), base);
        assert_eq!(dims.edge_slot(v, Axis::Y), base + 1);
        assert_eq!(dims.edge_slot(v, Axis::Z), base + 2);

        assert!(dims.has_edge(v, Axis::X));
        assert!(!dims.has_edge(VertexCoord::new(2, 0, 0), Axis::X));
        assert!(dims.has_edge(VertexCoord::new(2, 0, 0), Axis::Y));
    }

    #[test]
    fn test_vertex_position() {
        let origin = Point3::new(-2.0, -2.0, -2.0);
        let p = vertex_position(origin, 0.5, VertexCoord::new(4, 2, 8));
        assert_eq!(p, Point3::new(0.0, -1.0, 2.0));
    }

    #[test]
    fn test_cell_diagonal() {
        assert!((cell_diagonal(1.0) - 1.732_050_8).abs() < 1e-6);
    }
}
