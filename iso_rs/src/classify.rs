//! Per-cell inside/outside classification.

use iso_core::marching_cubes::{classify_cell, edge_mask, triangle_count};
use iso_core::LatticeProvider;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Classification codes and edge masks for every cell of a lattice.
///
/// Codes are stored in cell index order. Bit `c` of a code is set iff local
/// corner `c` is strictly below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    iso_value: f32,
    codes: Vec<u8>,
    edge_masks: Vec<u16>,
    active_cells: usize,
    inside_vertices: usize,
}

impl Classification {
    /// Classify every cell of `lattice` against `iso_value`.
    pub fn classify<P>(lattice: &P, iso_value: f32) -> Self
    where
        P: LatticeProvider + Sync + ?Sized,
    {
        let dims = lattice.dims();

        #[cfg(feature = "parallel")]
        let codes: Vec<u8> = (0..dims.cell_count())
            .into_par_iter()
            .map(|idx| classify_cell(lattice, dims.cell_coord(idx), iso_value))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let codes: Vec<u8> = dims
            .cells()
            .map(|cell| classify_cell(lattice, cell, iso_value))
            .collect();

        let edge_masks: Vec<u16> = codes.iter().map(|&code| edge_mask(code)).collect();
        let active_cells = edge_masks.iter().filter(|&&mask| mask != 0).count();
        let inside_vertices = (0..dims.vertex_count())
            .filter(|&idx| lattice.value_at(idx) < iso_value)
            .count();

        log::debug!(
            "classified {} cells at {}: {} active, {} vertices inside",
            codes.len(),
            iso_value,
            active_cells,
            inside_vertices
        );

        Self {
            iso_value,
            codes,
            edge_masks,
            active_cells,
            inside_vertices,
        }
    }

    /// Threshold the codes were computed against.
    #[inline]
    pub fn iso_value(&self) -> f32 {
        self.iso_value
    }

    /// Classification code of a cell, by flat cell index.
    #[inline]
    pub fn code(&self, cell_index: usize) -> u8 {
        self.codes[cell_index]
    }

    /// Crossed-edge mask of a cell, by flat cell index.
    #[inline]
    pub fn edge_mask(&self, cell_index: usize) -> u16 {
        self.edge_masks[cell_index]
    }

    /// All classification codes in cell order.
    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// All edge masks in cell order.
    #[inline]
    pub fn edge_masks(&self) -> &[u16] {
        &self.edge_masks
    }

    /// Number of classified cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.codes.len()
    }

    /// Number of cells the surface passes through.
    #[inline]
    pub fn active_cell_count(&self) -> usize {
        self.active_cells
    }

    /// Number of lattice vertices strictly below the threshold.
    #[inline]
    pub fn inside_vertex_count(&self) -> usize {
        self.inside_vertices
    }

    /// Exact number of triangles triangulation will emit.
    pub fn triangle_count(&self) -> usize {
        self.codes.iter().map(|&code| triangle_count(code)).sum()
    }
}
