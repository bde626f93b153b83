//! Integration tests for end-to-end scenarios.

use std::collections::HashMap;

use iso_core::marching_cubes::process_cell;
use iso_rs::{
    fields, GeometryConfig, IndexingStrategy, IsoError, IsoSurface, IsoSurfaceBuilder,
    LatticeProvider, MeshBuffers, NormalMode, ParameterEvent, Point3, RebuildState, SurfaceMesh,
};

/// The unit sphere scenario: |p|² = 1 on an 8³ lattice of 0.5 cells from -2.
fn unit_sphere(strategy: IndexingStrategy, normals: NormalMode) -> IsoSurface {
    IsoSurfaceBuilder::new()
        .field(fields::radial_squared(Point3::ZERO))
        .origin(Point3::splat(-2.0))
        .cell_size(0.5)
        .resolution(8, 8, 8)
        .threshold(1.0)
        .strategy(strategy)
        .normals(normals)
        .build()
        .unwrap()
}

fn angle_degrees(a: Point3, b: Point3) -> f32 {
    let cos = a.dot(b) / (a.length() * b.length());
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

fn bit_pattern(buffers: &MeshBuffers) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
    let bits = |v: &[[f32; 3]]| -> Vec<u32> { v.iter().flatten().map(|f| f.to_bits()).collect() };
    (
        bits(&buffers.positions[..]),
        buffers.indices.clone(),
        bits(&buffers.normals[..]),
    )
}

/// Count how often each undirected edge appears, and each directed edge.
fn edge_usage(mesh: &SurfaceMesh) -> (HashMap<(u32, u32), usize>, HashMap<(u32, u32), usize>) {
    let mut undirected = HashMap::new();
    let mut directed = HashMap::new();
    for [a, b, c] in mesh.triangles() {
        for (x, y) in [(a, b), (b, c), (c, a)] {
            *undirected.entry((x.min(y), x.max(y))).or_insert(0) += 1;
            *directed.entry((x, y)).or_insert(0) += 1;
        }
    }
    (undirected, directed)
}

// =============================================================================
// Unit sphere scenario
// =============================================================================

#[test]
fn sphere_positions_lie_near_the_surface() {
    for strategy in [IndexingStrategy::SharedEdges, IndexingStrategy::PerCell] {
        let surface = unit_sphere(strategy, NormalMode::AreaWeighted);
        let mesh = surface.mesh();
        let tolerance = surface.geometry().cell_diagonal() / 2.0;

        assert!(mesh.triangle_count() > 0);
        for p in &mesh.positions {
            let distance = (p.length() - 1.0).abs();
            assert!(distance <= tolerance, "{:?} is {} from the sphere", p, distance);
        }
    }
}

#[test]
fn sphere_normals_follow_the_radial_direction() {
    for strategy in [IndexingStrategy::SharedEdges, IndexingStrategy::PerCell] {
        for mode in [NormalMode::AreaWeighted, NormalMode::FieldGradient] {
            let surface = unit_sphere(strategy, mode);
            let mesh = surface.mesh();
            assert_eq!(mesh.normals.len(), mesh.positions.len());

            for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
                assert!((n.length() - 1.0).abs() < 1e-4, "normal {:?} at {:?}", n, p);
                let angle = angle_degrees(*n, *p);
                assert!(
                    angle < 30.0,
                    "{:?}/{:?}: normal at {:?} is {} degrees off radial",
                    strategy,
                    mode,
                    p,
                    angle
                );
            }
        }
    }
}

#[test]
fn sphere_faces_point_outward() {
    let surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let mesh = surface.mesh();

    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        let face = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        assert!(face.dot(centroid) > 0.0, "triangle {} faces inward", t);
    }
}

#[test]
fn shared_sphere_is_closed_and_consistently_wound() {
    let surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let mesh = surface.mesh();
    let (undirected, directed) = edge_usage(mesh);

    assert!(undirected.values().all(|&n| n == 2), "open or non-manifold edge");
    assert!(directed.values().all(|&n| n == 1), "inconsistent winding");

    // Euler characteristic of a sphere
    let (v, e, f) = (mesh.vertex_count(), undirected.len(), mesh.triangle_count());
    assert_eq!(v as i64 - e as i64 + f as i64, 2);
}

#[test]
fn strategies_agree_on_geometry() {
    let shared = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let per_cell = unit_sphere(IndexingStrategy::PerCell, NormalMode::AreaWeighted);

    assert_eq!(shared.mesh().triangle_count(), per_cell.mesh().triangle_count());
    assert!(shared.mesh().vertex_count() < per_cell.mesh().vertex_count());
    for t in 0..shared.mesh().triangle_count() {
        assert_eq!(shared.mesh().triangle(t), per_cell.mesh().triangle(t));
    }
}

#[test]
fn per_cell_extractor_matches_indexed_mesh() {
    let surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let lattice = surface.lattice();
    let dims = lattice.dims();

    let soup: Vec<_> = dims
        .cells()
        .flat_map(|cell| process_cell(lattice, cell, surface.threshold()))
        .collect();

    let mesh = surface.mesh();
    assert_eq!(soup.len(), mesh.triangle_count());
    for (t, triangle) in soup.iter().enumerate() {
        assert_eq!(&mesh.triangle(t), triangle, "triangle {}", t);
    }
}

// =============================================================================
// World scale
// =============================================================================

/// The unit sphere scenario with every length multiplied by `scale`.
fn scaled_sphere(scale: f32, strategy: IndexingStrategy, normals: NormalMode) -> IsoSurface {
    IsoSurfaceBuilder::new()
        .field(move |p: Point3| p.length_squared() / (scale * scale))
        .origin(Point3::splat(-2.0 * scale))
        .cell_size(0.5 * scale)
        .resolution(8, 8, 8)
        .threshold(1.0)
        .strategy(strategy)
        .normals(normals)
        .build()
        .unwrap()
}

#[test]
fn area_weighted_normals_survive_extreme_scales() {
    for scale in [1e-6f32, 1.0, 1e5, 1e6] {
        for strategy in [IndexingStrategy::SharedEdges, IndexingStrategy::PerCell] {
            let surface = scaled_sphere(scale, strategy, NormalMode::AreaWeighted);
            let mesh = surface.mesh();
            assert!(mesh.triangle_count() > 0);

            for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
                assert!(
                    (n.length() - 1.0).abs() < 1e-3,
                    "scale {} {:?}: normal {:?} at {:?}",
                    scale,
                    strategy,
                    n,
                    p
                );
                assert!(angle_degrees(*n, *p) < 30.0);
            }
        }
    }
}

#[test]
fn gradient_normals_far_from_the_origin() {
    let center = Point3::new(1.0e4, 0.0, 0.0);
    let surface = IsoSurfaceBuilder::new()
        .field(fields::radial_squared(center))
        .origin(center - Point3::splat(2.0))
        .cell_size(0.5)
        .resolution(8, 8, 8)
        .threshold(1.0)
        .normals(NormalMode::FieldGradient)
        .build()
        .unwrap();
    let mesh = surface.mesh();
    assert!(mesh.triangle_count() > 0);

    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
        assert!((n.length() - 1.0).abs() < 1e-3, "normal {:?} at {:?}", n, p);
        assert!(angle_degrees(*n, *p - center) < 5.0, "normal {:?} at {:?}", n, p);
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn rebuilding_with_unchanged_parameters_is_bit_identical() {
    let mut surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let first = bit_pattern(&surface.take_buffers());

    let geometry = *surface.geometry();
    surface.on_geometry_changed(geometry).unwrap();
    let second = bit_pattern(&surface.take_buffers());

    surface.on_threshold_changed(1.0).unwrap();
    let third = bit_pattern(&surface.take_buffers());

    let other = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted).take_buffers();

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(first, bit_pattern(&other));
}

// =============================================================================
// Threshold behaviour
// =============================================================================

#[test]
fn inside_count_grows_with_threshold() {
    let mut surface = IsoSurfaceBuilder::new()
        .field(fields::radial_squared(Point3::ZERO))
        .geometry(GeometryConfig::centered(0.25, 12, 12, 12))
        .threshold(0.0)
        .build()
        .unwrap();

    let mut previous = surface.classification().inside_vertex_count();
    assert_eq!(previous, 0);

    for step in 1..=40 {
        surface.on_threshold_changed(step as f32 * 0.1).unwrap();
        let inside = surface.classification().inside_vertex_count();
        assert!(inside >= previous, "inside count fell at step {}", step);
        previous = inside;
    }
    assert!(previous > 0);
}

#[test]
fn empty_surface_outside_the_value_range() {
    for strategy in [IndexingStrategy::SharedEdges, IndexingStrategy::PerCell] {
        let mut surface = unit_sphere(strategy, NormalMode::AreaWeighted);
        let range = surface.value_range();

        for threshold in [range.min - 1.0, range.max + 1.0] {
            let report = surface.on_threshold_changed(threshold).unwrap();
            assert_eq!(report.triangle_count, 0);
            assert_eq!(report.vertex_count, 0);

            let buffers = surface.take_buffers();
            assert!(buffers.positions.is_empty());
            assert!(buffers.indices.is_empty());
            assert!(buffers.normals.is_empty());
        }
    }
}

#[test]
fn linear_field_crossings_are_exact() {
    let mut surface = IsoSurfaceBuilder::new()
        .field(|p: Point3| p.x)
        .geometry(GeometryConfig::new(Point3::splat(-1.0), 0.25, 8, 4, 4))
        .threshold(0.1)
        .build()
        .unwrap();

    for threshold in [0.1f32, -0.63, 0.9, 0.37] {
        surface.on_threshold_changed(threshold).unwrap();
        let mesh = surface.mesh();
        assert!(mesh.triangle_count() > 0);
        for p in &mesh.positions {
            assert!((p.x - threshold).abs() < 1e-5, "{:?} off x = {}", p, threshold);
        }
        // Flat surface: every normal points along -x or +x
        for n in &mesh.normals {
            assert!((n.x.abs() - 1.0).abs() < 1e-4, "normal {:?}", n);
        }
    }
}

// =============================================================================
// Failure handling
// =============================================================================

#[test]
fn invalid_geometry_keeps_the_previous_mesh() {
    let mut surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let before = surface.mesh().clone();
    let range = surface.value_range();

    let rejected = [
        GeometryConfig::new(Point3::ZERO, 0.0, 4, 4, 4),
        GeometryConfig::new(Point3::ZERO, -0.5, 4, 4, 4),
        GeometryConfig::new(Point3::ZERO, 0.5, 4, 0, 4),
        GeometryConfig::new(Point3::splat(f32::INFINITY), 0.5, 4, 4, 4),
    ];
    for geometry in rejected {
        let err = surface.handle(ParameterEvent::SetGeometry(geometry)).unwrap_err();
        assert!(matches!(err, IsoError::InvalidGeometry { .. }), "{:?}", err);
        assert_eq!(surface.mesh(), &before);
        assert_eq!(surface.value_range(), range);
        assert_eq!(surface.state(), RebuildState::Idle);
    }

    // Still usable afterwards
    assert!(surface.on_threshold_changed(2.0).is_ok());
}

#[test]
fn non_finite_samples_do_not_blank_the_surface() {
    let mut surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let clean = surface.mesh().triangle_count();

    // Poison one lattice vertex far from the surface
    let report = surface
        .on_field_changed(Box::new(|p: Point3| {
            if p == Point3::splat(2.0) {
                f32::NAN
            } else {
                p.length_squared()
            }
        }))
        .unwrap();

    assert_eq!(report.non_finite_samples, 1);
    assert_eq!(report.triangle_count, clean);
    assert!(surface.value_range().is_finite());
    assert!(surface.mesh().positions.iter().all(|p| p.is_finite()));
    assert!(surface.mesh().normals.iter().all(|n| n.is_finite()));
}

#[test]
fn field_that_always_fails_gives_an_empty_mesh() {
    let mut surface = unit_sphere(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted);
    let report = surface
        .on_field_changed(Box::new(|_: Point3| f32::NAN))
        .unwrap();

    assert_eq!(report.non_finite_samples, 9 * 9 * 9);
    assert_eq!(report.triangle_count, 0);
    assert!(!surface.value_range().is_finite());
}

// =============================================================================
// Interactive session
// =============================================================================

#[test]
fn interactive_session() {
    let mut surface = IsoSurfaceBuilder::new()
        .field(fields::terrain_bumps)
        .geometry(GeometryConfig::new(Point3::ZERO, 0.05, 40, 20, 40))
        .threshold(0.02)
        .build()
        .unwrap();

    let events = vec![
        ParameterEvent::SetVisible(true),
        ParameterEvent::SetThreshold(0.1),
        ParameterEvent::SetGeometry(GeometryConfig::new(Point3::ZERO, 0.1, 20, 20, 20)),
        ParameterEvent::SetField(Box::new(fields::sphere(Point3::splat(1.0), 0.5))),
        ParameterEvent::SetThreshold(0.0),
        ParameterEvent::SetVisible(false),
    ];

    let mut rebuilds = 0;
    for event in events {
        if let Some(report) = surface.handle(event).unwrap() {
            rebuilds += 1;
            assert_eq!(report.states.last(), Some(&RebuildState::Idle));
            assert_eq!(report.triangle_count, surface.mesh().triangle_count());
        }
    }

    assert_eq!(rebuilds, 4);
    assert_eq!(surface.generation(), 4);
    assert!(surface.wireframe().is_none());
    assert_eq!(surface.geometry().resolution, [20, 20, 20]);

    // Sphere of radius 0.5 around (1, 1, 1) fits inside the 2 x 2 x 2 box
    let stats = surface.mesh().stats();
    assert!(stats.triangle_count > 0);
    assert!(stats.bbox_min.x > 0.4 && stats.bbox_max.x < 1.6);
}
