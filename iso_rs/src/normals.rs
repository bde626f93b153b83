//! Per-vertex normal estimation.
//!
//! Two estimators are available:
//!
//! - [`area_weighted_normals`] sums the area-scaled face normal of every
//!   adjacent triangle, so larger faces pull harder. With shared-edge indexing
//!   this smooths across cells; with per-cell indexing only the triangles of a
//!   single cell meet at a vertex and seams stay faceted.
//! - [`gradient_normals`] ignores the triangles and differentiates the field
//!   itself around each position.

use iso_core::{Axis, Point3, ScalarField};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Central-difference step, as a fraction of the cell size.
pub const GRADIENT_STEP_FACTOR: f32 = 1e-3;

/// Lower bound on the difference step, in `f32` epsilons of the coordinate
/// magnitude.
pub const MIN_STEP_ULPS: f32 = 8.0;

/// Area-weighted vertex normals for an indexed triangle list.
///
/// Each triangle adds `area * n` to its three corners, where
/// `n = (p1 - p0) x (p2 - p0)` is the raw face normal and `area = |n| / 2`, so
/// larger faces dominate quadratically. Accumulators that stay zero are left at
/// zero.
///
/// The weighted sum grows with the fourth power of the cell size, so it is
/// accumulated and normalized in `f64` to stay representable at any finite
/// lattice scale.
pub fn area_weighted_normals(positions: &[Point3], indices: &[u32]) -> Vec<Point3> {
    let mut sums = vec![[0.0f64; 3]; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let [p0, p1, p2] = [positions[a], positions[b], positions[c]].map(widen);
        let n = cross(sub(p1, p0), sub(p2, p0));
        let weight = 0.5 * length(n);
        for corner in [a, b, c] {
            for (sum, component) in sums[corner].iter_mut().zip(n) {
                *sum += component * weight;
            }
        }
    }

    sums.into_iter().map(unit_or_zero).collect()
}

#[inline]
fn widen(p: Point3) -> [f64; 3] {
    [p.x as f64, p.y as f64, p.z as f64]
}

#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length(v: [f64; 3]) -> f64 {
    libm::sqrt(v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
}

fn unit_or_zero(v: [f64; 3]) -> Point3 {
    let len = length(v);
    if len > 0.0 && len.is_finite() {
        Point3::new((v[0] / len) as f32, (v[1] / len) as f32, (v[2] / len) as f32)
    } else {
        Point3::ZERO
    }
}

/// Unit field gradient at each position, by central differences of width
/// `2 * step`.
///
/// Positions where the gradient is zero or not finite get a zero normal.
pub fn gradient_normals<F>(positions: &[Point3], field: &F, step: f32) -> Vec<Point3>
where
    F: ScalarField + Sync + ?Sized,
{
    let estimate = |&p: &Point3| {
        let g = field_gradient(field, p, step);
        if g.is_finite() {
            unit_or_zero(widen(g))
        } else {
            Point3::ZERO
        }
    };

    #[cfg(feature = "parallel")]
    let normals = positions.par_iter().map(estimate).collect();

    #[cfg(not(feature = "parallel"))]
    let normals = positions.iter().map(estimate).collect();

    normals
}

/// Central-difference gradient of `field` at `p`.
///
/// The step never drops below [`MIN_STEP_ULPS`] units of `f32` spacing at the
/// largest coordinate of `p`, and each difference is divided by the distance
/// actually separating the two rounded sample points.
pub fn field_gradient<F>(field: &F, p: Point3, step: f32) -> Point3
where
    F: ScalarField + ?Sized,
{
    let magnitude = p.x.abs().max(p.y.abs()).max(p.z.abs());
    let step = step.max(MIN_STEP_ULPS * f32::EPSILON * magnitude);

    let partial = |axis: Axis| {
        let offset = match axis {
            Axis::X => Point3::new(step, 0.0, 0.0),
            Axis::Y => Point3::new(0.0, step, 0.0),
            Axis::Z => Point3::new(0.0, 0.0, step),
        };
        let (ahead, behind) = (p + offset, p - offset);
        let width = ahead.component(axis) - behind.component(axis);
        if width > 0.0 {
            (field.evaluate(ahead) - field.evaluate(behind)) / width
        } else {
            0.0
        }
    };

    Point3::new(partial(Axis::X), partial(Axis::Y), partial(Axis::Z))
}
