//! Ready-made scalar fields.
//!
//! Every constructor returns a plain closure, so the result can be handed to
//! [`crate::IsoSurfaceBuilder::field`] or boxed as a [`crate::BoxedField`].

use iso_core::Point3;

/// Squared distance from `center`. Level set `r²` is a sphere of radius `r`.
pub fn radial_squared(center: Point3) -> impl Fn(Point3) -> f32 + Send + Sync + Copy {
    move |p| (p - center).length_squared()
}

/// Signed distance to a sphere: negative inside, zero on the surface.
pub fn sphere(center: Point3, radius: f32) -> impl Fn(Point3) -> f32 + Send + Sync + Copy {
    move |p| (p - center).length() - radius
}

/// Signed distance along x from the plane `x = offset`.
pub fn plane_x(offset: f32) -> impl Fn(Point3) -> f32 + Send + Sync + Copy {
    move |p| p.x - offset
}

/// Periodic bump landscape with unit period on every axis.
///
/// Each unit cell holds one smooth bump centred in the cell, peaking at
/// `10 / e³` and vanishing toward the cell walls. The lower half of every cell
/// (in local y) is flat zero, which gives the terraced look. Thresholds just
/// above zero pick out the bump caps.
pub fn terrain_bumps(p: Point3) -> f32 {
    let local = |v: f32| 2.0 * (v - libm::floorf(v) - 0.5);
    let (x, y, z) = (local(p.x), local(p.y), local(p.z));

    if y < 0.0 {
        return 0.0;
    }

    let (rx, ry, rz) = (x * x, y * y, z * z);
    if rx > 0.9999 || ry > 0.9999 || rz > 0.9999 {
        return 0.01;
    }

    let falloff = |r: f32| -1.0 / (1.0 - r);
    10.0 * libm::expf(falloff(rx) + falloff(ry) + falloff(rz))
}
