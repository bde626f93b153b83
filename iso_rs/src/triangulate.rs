//! Surface triangulation from a classified lattice.
//!
//! Both indexing strategies visit cells in index order, walk the same
//! triangle-table rows and interpolate each lattice edge in the same direction,
//! so they emit identical triangle geometry. They differ only in whether a
//! crossing point is reused by neighbouring cells.

use iso_core::marching_cubes::{edge_point, edge_slot, triangle_edges};
use iso_core::{CellCoord, LatticeProvider};

use crate::classify::Classification;
use crate::config::IndexingStrategy;
use crate::mesh::SurfaceMesh;

/// Marker for an edge slot that has no position yet.
const UNASSIGNED: u32 = u32::MAX;

/// Build the triangle mesh for a classified lattice. Normals are left empty.
///
/// Only positions referenced by at least one triangle are emitted, in order of
/// first use.
pub fn triangulate<P>(
    lattice: &P,
    classification: &Classification,
    strategy: IndexingStrategy,
) -> SurfaceMesh
where
    P: LatticeProvider + ?Sized,
{
    let mesh = match strategy {
        IndexingStrategy::SharedEdges => triangulate_shared(lattice, classification),
        IndexingStrategy::PerCell => triangulate_per_cell(lattice, classification),
    };

    log::debug!(
        "triangulated {} triangles over {} positions ({:?})",
        mesh.triangle_count(),
        mesh.vertex_count(),
        strategy
    );
    mesh
}

/// Active cells in index order, with their coordinates and codes.
fn active_cells<'a, P>(
    lattice: &'a P,
    classification: &'a Classification,
) -> impl Iterator<Item = (CellCoord, u8)> + 'a
where
    P: LatticeProvider + ?Sized,
{
    let dims = lattice.dims();
    classification
        .edge_masks()
        .iter()
        .enumerate()
        .filter(|&(_, &mask)| mask != 0)
        .map(move |(idx, _)| (dims.cell_coord(idx), classification.code(idx)))
}

/// One position per crossed lattice edge, keyed by its global slot.
fn triangulate_shared<P>(lattice: &P, classification: &Classification) -> SurfaceMesh
where
    P: LatticeProvider + ?Sized,
{
    let iso_value = classification.iso_value();
    let triangles = classification.triangle_count();
    let mut mesh = SurfaceMesh::with_capacity(triangles, triangles);
    let mut slot_to_vertex = vec![UNASSIGNED; lattice.dims().edge_slot_count()];

    for (cell, code) in active_cells(lattice, classification) {
        for tri in triangle_edges(code) {
            for edge in tri {
                let slot = edge_slot(lattice, cell, edge);
                if slot_to_vertex[slot] == UNASSIGNED {
                    slot_to_vertex[slot] = mesh.positions.len() as u32;
                    mesh.positions.push(edge_point(lattice, cell, edge, iso_value));
                }
                mesh.indices.push(slot_to_vertex[slot]);
            }
        }
    }

    mesh
}

/// One position per crossed edge of each cell; neighbours never share.
fn triangulate_per_cell<P>(lattice: &P, classification: &Classification) -> SurfaceMesh
where
    P: LatticeProvider + ?Sized,
{
    let iso_value = classification.iso_value();
    let triangles = classification.triangle_count();
    let mut mesh = SurfaceMesh::with_capacity(triangles * 3, triangles);

    for (cell, code) in active_cells(lattice, classification) {
        let mut local = [UNASSIGNED; 12];
        for tri in triangle_edges(code) {
            for edge in tri {
                if local[edge] == UNASSIGNED {
                    local[edge] = mesh.positions.len() as u32;
                    mesh.positions.push(edge_point(lattice, cell, edge, iso_value));
                }
                mesh.indices.push(local[edge]);
            }
        }
    }

    mesh
}
