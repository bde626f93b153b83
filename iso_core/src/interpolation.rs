//! Linear interpolation of isosurface crossings along lattice edges.
//!
//! The crossing point on an edge is found by assuming the field varies linearly
//! between the two samples. This is exact only for fields that are linear along
//! the edge; for anything else it is the usual marching cubes approximation.

use crate::types::Point3;

/// Tolerance used to snap crossings onto endpoints and to detect flat edges.
pub const DEGENERATE_EPSILON: f32 = 1e-5;

/// Interpolate the point where the field crosses `iso_value` between two samples.
///
/// Tie-breaking, in order:
/// 1. `iso_value` within [`DEGENERATE_EPSILON`] of `v1` returns `p1`
/// 2. `iso_value` within [`DEGENERATE_EPSILON`] of `v2` returns `p2`
/// 3. `v1` within [`DEGENERATE_EPSILON`] of `v2` (flat edge) returns `p1`
/// 4. a non-finite sample returns the other endpoint
/// 5. otherwise `p1 + (iso - v1) / (v2 - v1) * (p2 - p1)`
///
/// # Arguments
/// * `p1` - Position of the first endpoint
/// * `v1` - Field value at the first endpoint
/// * `p2` - Position of the second endpoint
/// * `v2` - Field value at the second endpoint
/// * `iso_value` - The threshold being contoured
///
/// # Example
/// ```
/// use iso_core::interpolation::interpolate_edge;
/// use iso_core::types::Point3;
///
/// let p = interpolate_edge(Point3::ZERO, 0.0, Point3::new(1.0, 0.0, 0.0), 4.0, 1.0);
/// assert!((p.x - 0.25).abs() < 1e-6);
/// ```
#[inline]
pub fn interpolate_edge(p1: Point3, v1: f32, p2: Point3, v2: f32, iso_value: f32) -> Point3 {
    if libm::fabsf(iso_value - v1) < DEGENERATE_EPSILON {
        return p1;
    }
    if libm::fabsf(iso_value - v2) < DEGENERATE_EPSILON {
        return p2;
    }
    if libm::fabsf(v1 - v2) < DEGENERATE_EPSILON {
        return p1;
    }

    // Failed samples are stored as +inf; the crossing snaps to the good sample
    if !v1.is_finite() {
        return p2;
    }
    if !v2.is_finite() {
        return p1;
    }

    let lambda = (iso_value - v1) / (v2 - v1);
    p1 + (p2 - p1) * lambda
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: Point3 = Point3::new(0.0, 0.0, 0.0);
    const P2: Point3 = Point3::new(1.0, 0.0, 0.0);

    #[test]
    fn test_midpoint() {
        let result = interpolate_edge(P1, -1.0, P2, 1.0, 0.0);
        assert!((result.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fraction_along_edge() {
        let p2 = Point3::new(2.0, 4.0, -2.0);
        let result = interpolate_edge(P1, 1.0, p2, 5.0, 2.0);
        assert!((result.x - 0.5).abs() < 1e-6);
        assert!((result.y - 1.0).abs() < 1e-6);
        assert!((result.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_snaps_to_near_equal_endpoint() {
        assert_eq!(interpolate_edge(P1, 0.5, P2, 1.0, 0.500_001), P1);
        assert_eq!(interpolate_edge(P1, 0.0, P2, 0.5, 0.499_999), P2);
    }

    #[test]
    fn test_first_endpoint_wins_tie() {
        // Both endpoints equal the threshold
        assert_eq!(interpolate_edge(P1, 1.0, P2, 1.0, 1.0), P1);
    }

    #[test]
    fn test_flat_edge_falls_back_to_first_endpoint() {
        let result = interpolate_edge(P1, 2.0, P2, 2.000_001, 0.0);
        assert_eq!(result, P1);
    }

    #[test]
    fn test_order_reversal_is_consistent() {
        let a = interpolate_edge(P1, -3.0, P2, 1.0, 0.0);
        let b = interpolate_edge(P2, 1.0, P1, -3.0, 0.0);
        assert!((a.x - 0.75).abs() < 1e-6);
        assert!((b.x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_sample_snaps_to_finite_endpoint() {
        assert_eq!(interpolate_edge(P1, f32::INFINITY, P2, -1.0, 0.0), P2);
        assert_eq!(interpolate_edge(P1, -1.0, P2, f32::INFINITY, 0.0), P1);
        assert!(interpolate_edge(P1, f32::INFINITY, P2, -1.0, 0.0).is_finite());
    }
}
