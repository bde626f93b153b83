//! Per-cell marching cubes: classification, edge points and triangle emission.
//!
//! Every routine here reads the lattice through [`LatticeProvider`] and works on a
//! single cell, so callers are free to visit cells in any order (or in parallel).

use crate::interpolation::interpolate_edge;
use crate::traits::LatticeProvider;
use crate::types::{Axis, CellCoord, Point3};

use super::tables::{
    CORNER_OFFSETS, EDGE_SLOTS, EDGE_TABLE, MAX_TRIANGLES_PER_CELL, TRI_SENTINEL, TRI_TABLE,
};

/// Compute the cube configuration from the 8 corner values.
///
/// Bit `c` is set iff corner `c` lies strictly below `iso_value`.
/// NaN never compares below, so it classifies as outside.
#[inline]
pub fn cube_index(corner_values: &[f32; 8], iso_value: f32) -> u8 {
    let mut index = 0u8;
    for (i, &val) in corner_values.iter().enumerate() {
        if val < iso_value {
            index |= 1 << i;
        }
    }
    index
}

/// 12-bit mask of the cell edges crossed by the surface for a configuration.
#[inline]
pub fn edge_mask(code: u8) -> u16 {
    EDGE_TABLE[code as usize]
}

/// Iterator over the triangles of a configuration, as local edge triples.
#[derive(Debug, Clone)]
pub struct TriangleEdges {
    row: &'static [i8; 16],
    pos: usize,
}

impl Iterator for TriangleEdges {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + 2 >= self.row.len() || self.row[self.pos] == TRI_SENTINEL {
            return None;
        }
        let tri = [
            self.row[self.pos] as usize,
            self.row[self.pos + 1] as usize,
            self.row[self.pos + 2] as usize,
        ];
        self.pos += 3;
        Some(tri)
    }
}

/// Walk the triangle-table row for a configuration.
#[inline]
pub fn triangle_edges(code: u8) -> TriangleEdges {
    TriangleEdges {
        row: &TRI_TABLE[code as usize],
        pos: 0,
    }
}

/// Number of triangles a configuration produces.
#[inline]
pub fn triangle_count(code: u8) -> usize {
    triangle_edges(code).count()
}

/// Flat vertex indices of a cell's 8 corners, in local corner order.
#[inline]
pub fn corner_indices<P: LatticeProvider + ?Sized>(provider: &P, cell: CellCoord) -> [usize; 8] {
    let dims = provider.dims();
    let mut indices = [0usize; 8];
    for (slot, &offset) in indices.iter_mut().zip(CORNER_OFFSETS.iter()) {
        *slot = dims.vertex_index(cell.corner_vertex(offset));
    }
    indices
}

/// Cached field values at a cell's 8 corners, in local corner order.
#[inline]
pub fn corner_values<P: LatticeProvider + ?Sized>(provider: &P, cell: CellCoord) -> [f32; 8] {
    corner_indices(provider, cell).map(|idx| provider.value_at(idx))
}

/// Classify a cell against `iso_value`.
#[inline]
pub fn classify_cell<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    iso_value: f32,
) -> u8 {
    cube_index(&corner_values(provider, cell), iso_value)
}

/// The lattice edge behind a local cell edge.
///
/// Returns `(low, high, axis)` where `low` and `high` are flat vertex indices and
/// `high` is `low`'s neighbour along `+axis`.
#[inline]
pub fn edge_endpoints<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    edge: usize,
) -> (usize, usize, Axis) {
    let dims = provider.dims();
    let (offset, axis) = EDGE_SLOTS[edge];
    let low = cell.corner_vertex(offset);
    (dims.vertex_index(low), dims.vertex_index(low.step(axis)), axis)
}

/// Global slot (`3 * vertex_index + axis`) of a local cell edge.
#[inline]
pub fn edge_slot<P: LatticeProvider + ?Sized>(provider: &P, cell: CellCoord, edge: usize) -> usize {
    let (low, _, axis) = edge_endpoints(provider, cell, edge);
    3 * low + axis.index()
}

/// Interpolate the surface crossing on a local cell edge.
///
/// The edge is always walked from its lower lattice vertex toward `+axis`, so
/// adjacent cells sharing the edge compute bit-identical points.
#[inline]
pub fn edge_point<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    edge: usize,
    iso_value: f32,
) -> Point3 {
    let (low, high, _) = edge_endpoints(provider, cell, edge);
    interpolate_edge(
        provider.position_at(low),
        provider.value_at(low),
        provider.position_at(high),
        provider.value_at(high),
        iso_value,
    )
}

/// Interpolated points for every edge set in `mask`; other slots stay at zero.
#[inline]
pub fn edge_points<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    mask: u16,
    iso_value: f32,
) -> [Point3; 12] {
    let mut points = [Point3::ZERO; 12];
    for (edge, point) in points.iter_mut().enumerate() {
        if mask & (1 << edge) != 0 {
            *point = edge_point(provider, cell, edge, iso_value);
        }
    }
    points
}

/// Process a single cell and extract triangles using marching cubes.
///
/// # Arguments
/// * `provider` - Sampled lattice
/// * `cell` - The cell to process (must be in range)
/// * `iso_value` - The threshold being contoured
///
/// # Returns
/// A vector of triangles, where each triangle is an array of 3 vertices.
#[cfg(any(feature = "std", feature = "alloc"))]
pub fn process_cell<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    iso_value: f32,
) -> crate::alloc_prelude::Vec<[Point3; 3]> {
    let (triangles, count) = process_cell_no_alloc(provider, cell, iso_value);
    triangles[..count].to_vec()
}

/// Process a single cell without dynamic allocation.
///
/// Returns a fixed-size array that can hold up to 5 triangles (the maximum
/// for any marching cubes configuration) and the number of valid entries.
pub fn process_cell_no_alloc<P: LatticeProvider + ?Sized>(
    provider: &P,
    cell: CellCoord,
    iso_value: f32,
) -> ([[Point3; 3]; MAX_TRIANGLES_PER_CELL], usize) {
    let mut triangles = [[Point3::ZERO; 3]; MAX_TRIANGLES_PER_CELL];

    let code = classify_cell(provider, cell, iso_value);
    let mask = edge_mask(code);
    if mask == 0 {
        return (triangles, 0);
    }

    let points = edge_points(provider, cell, mask, iso_value);

    let mut count = 0;
    for (slot, [e0, e1, e2]) in triangles.iter_mut().zip(triangle_edges(code)) {
        *slot = [points[e0], points[e1], points[e2]];
        count += 1;
    }

    (triangles, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::LatticeDims;
    use crate::marching_cubes::tables::EDGE_VERTICES;

    /// One-cell lattice with explicit corner values, stored by flat vertex index.
    struct UnitCell {
        values: [f32; 8],
    }

    impl UnitCell {
        /// Build from values given in local corner order.
        fn from_corners(corner_values: [f32; 8]) -> Self {
            let dims = LatticeDims::new(1, 1, 1).unwrap();
            let mut values = [0.0; 8];
            for (corner, &offset) in CORNER_OFFSETS.iter().enumerate() {
                let idx = dims.vertex_index(CellCoord::default().corner_vertex(offset));
                values[idx] = corner_values[corner];
            }
            Self { values }
        }
    }

    impl LatticeProvider for UnitCell {
        fn dims(&self) -> LatticeDims {
            LatticeDims { nx: 1, ny: 1, nz: 1 }
        }

        fn origin(&self) -> Point3 {
            Point3::ZERO
        }

        fn cell_size(&self) -> f32 {
            1.0
        }

        fn value_at(&self, index: usize) -> f32 {
            self.values[index]
        }
    }

    #[test]
    fn test_cube_index() {
        assert_eq!(cube_index(&[1.0; 8], 0.0), 0);
        assert_eq!(cube_index(&[-1.0; 8], 0.0), 255);

        let mut values = [1.0; 8];
        values[0] = -1.0;
        assert_eq!(cube_index(&values, 0.0), 1);
        values[1] = -1.0;
        assert_eq!(cube_index(&values, 0.0), 3);

        // Equal to the threshold is not below it
        assert_eq!(cube_index(&[0.0; 8], 0.0), 0);
        // NaN never classifies as inside
        assert_eq!(cube_index(&[f32::NAN; 8], 0.0), 0);
    }

    #[test]
    fn test_triangle_edges_walk() {
        assert_eq!(triangle_edges(0).count(), 0);
        assert_eq!(triangle_count(1), 1);
        assert_eq!(triangle_edges(1).next(), Some([0, 8, 3]));
        assert_eq!(triangle_count(3), 2);
    }

    #[test]
    fn test_corner_values_follow_local_order() {
        let cell = UnitCell::from_corners([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(
            corner_values(&cell, CellCoord::default()),
            [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]
        );
    }

    #[test]
    fn test_edge_endpoints_match_corner_pairs() {
        let cell = UnitCell::from_corners([0.0; 8]);
        let corners = corner_indices(&cell, CellCoord::default());

        for (edge, &(a, b)) in EDGE_VERTICES.iter().enumerate() {
            let (low, high, _) = edge_endpoints(&cell, CellCoord::default(), edge);
            let mut expected = [corners[a], corners[b]];
            expected.sort_unstable();
            assert_eq!([low, high], expected, "edge {}", edge);
        }
    }

    #[test]
    fn test_single_inside_corner() {
        // Corner 0 inside, crossing halfway along each of its three edges
        let cell = UnitCell::from_corners([-1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let (triangles, count) = process_cell_no_alloc(&cell, CellCoord::default(), 0.0);

        assert_eq!(count, 1);
        let tri = triangles[0];
        assert_eq!(tri[0], Point3::new(0.0, 0.0, 0.5)); // edge 0, along z
        assert_eq!(tri[1], Point3::new(0.5, 0.0, 0.0)); // edge 8, along x
        assert_eq!(tri[2], Point3::new(0.0, 0.5, 0.0)); // edge 3, along y

        // Face normal points away from the inside corner
        let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
        assert!(normal.x > 0.0 && normal.y > 0.0 && normal.z > 0.0);
    }

    #[test]
    fn test_uniform_cells_are_empty() {
        let outside = UnitCell::from_corners([2.0; 8]);
        assert_eq!(process_cell_no_alloc(&outside, CellCoord::default(), 1.0).1, 0);

        let inside = UnitCell::from_corners([0.0; 8]);
        assert_eq!(process_cell_no_alloc(&inside, CellCoord::default(), 1.0).1, 0);
    }

    #[test]
    #[cfg(any(feature = "std", feature = "alloc"))]
    fn test_alloc_and_no_alloc_match() {
        let cell = UnitCell::from_corners([-1.0, 0.5, 2.0, -0.3, 1.0, -2.0, 0.7, 0.2]);

        let alloc_triangles = process_cell(&cell, CellCoord::default(), 0.0);
        let (no_alloc_triangles, count) = process_cell_no_alloc(&cell, CellCoord::default(), 0.0);

        assert_eq!(alloc_triangles.len(), count);
        assert!(count > 0);
        for (a, b) in alloc_triangles.iter().zip(no_alloc_triangles.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_points_stay_inside_cell() {
        let cell = UnitCell::from_corners([-1.0, 0.5, 2.0, -0.3, 1.0, -2.0, 0.7, 0.2]);
        let (triangles, count) = process_cell_no_alloc(&cell, CellCoord::default(), 0.0);

        for tri in &triangles[..count] {
            for v in tri {
                for c in v.as_array() {
                    assert!((0.0..=1.0).contains(&c), "{:?} escapes the cell", v);
                }
            }
        }
    }
}
