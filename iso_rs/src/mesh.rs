//! Indexed triangle meshes and their statistics.

use iso_core::Point3;

/// A triangle represented by three vertices.
pub type Triangle = [Point3; 3];

/// Indexed triangle mesh produced by one rebuild.
///
/// `indices` holds three entries per triangle, each a 0-based offset into
/// `positions`. `normals` is index-aligned with `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Surface point positions.
    pub positions: Vec<Point3>,
    /// Triangle corner indices, three per triangle.
    pub indices: Vec<u32>,
    /// Per-vertex unit normals, or zero for unreferenced vertices.
    pub normals: Vec<Point3>,
}

impl SurfaceMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for `vertices` positions and `triangles`
    /// triangles.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of positions.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// `true` if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        [
            self.positions[self.indices[base] as usize],
            self.positions[self.indices[base + 1] as usize],
            self.positions[self.indices[base + 2] as usize],
        ]
    }

    /// Summary statistics of the mesh.
    pub fn stats(&self) -> MeshStats {
        MeshStats::from_mesh(self)
    }

    /// Flatten into plain float arrays for a renderer.
    pub fn into_buffers(self) -> MeshBuffers {
        MeshBuffers {
            positions: self.positions.into_iter().map(<[f32; 3]>::from).collect(),
            indices: self.indices,
            normals: self.normals.into_iter().map(<[f32; 3]>::from).collect(),
        }
    }
}

/// Render-ready copy of a [`SurfaceMesh`], owned by whoever took it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Positions, three floats each.
    pub positions: Vec<[f32; 3]>,
    /// Triangle corner indices, three per triangle.
    pub indices: Vec<u32>,
    /// Normals, index-aligned with `positions`.
    pub normals: Vec<[f32; 3]>,
}

impl MeshBuffers {
    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Statistics about an extracted mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    /// Number of triangles.
    pub triangle_count: usize,
    /// Number of distinct positions.
    pub vertex_count: usize,
    /// Total surface area.
    pub surface_area: f32,
    /// Bounding box minimum.
    pub bbox_min: Point3,
    /// Bounding box maximum.
    pub bbox_max: Point3,
}

impl MeshStats {
    /// Compute statistics from a mesh.
    ///
    /// The bounding box of an empty mesh is inverted (`min > max`).
    pub fn from_mesh(mesh: &SurfaceMesh) -> Self {
        let mut bbox_min = Point3::splat(f32::MAX);
        let mut bbox_max = Point3::splat(f32::MIN);
        for &p in &mesh.positions {
            bbox_min = bbox_min.min(p);
            bbox_max = bbox_max.max(p);
        }

        let surface_area = (0..mesh.triangle_count())
            .map(|t| {
                let [a, b, c] = mesh.triangle(t);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum();

        Self {
            triangle_count: mesh.triangle_count(),
            vertex_count: mesh.vertex_count(),
            surface_area,
            bbox_min,
            bbox_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> SurfaceMesh {
        SurfaceMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            normals: vec![Point3::ZERO; 4],
        }
    }

    #[test]
    fn test_counts() {
        let mesh = two_triangles();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(!mesh.is_empty());
        assert!(SurfaceMesh::new().is_empty());
    }

    #[test]
    fn test_triangle_lookup() {
        let mesh = two_triangles();
        let tris: Vec<[u32; 3]> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.triangle(1)[2], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_mesh_stats() {
        let stats = two_triangles().stats();

        assert_eq!(stats.triangle_count, 2);
        assert_eq!(stats.vertex_count, 4);
        assert!((stats.surface_area - 1.0).abs() < 1e-6);

        // Bounding box should cover [0,1]³
        assert_eq!(stats.bbox_min, Point3::ZERO);
        assert_eq!(stats.bbox_max, Point3::splat(1.0));
    }

    #[test]
    fn test_into_buffers() {
        let buffers = two_triangles().into_buffers();
        assert_eq!(buffers.positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(buffers.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(buffers.normals.len(), 4);
        assert_eq!(buffers.triangle_count(), 2);
    }
}
