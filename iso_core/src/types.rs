//! Core types for lattice isosurface extraction.
//!
//! Provides the 3D point type and the integer coordinates used to address
//! lattice vertices and cells.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 3D point with named fields for clarity.
///
/// Used for lattice positions, surface points and (unnormalized) normals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Point3 {
    /// The origin / zero vector.
    pub const ZERO: Self = Self::splat(0.0);

    /// Create a new Point3.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a Point3 with all components set to the same value.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Convert to an array.
    #[inline]
    pub const fn as_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Component along `axis`.
    #[inline]
    pub const fn component(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Linear interpolation between two points.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Dot product with another point (treating both as vectors).
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another point (treating both as vectors).
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length of the vector.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length (magnitude) of the vector.
    #[inline]
    pub fn length(self) -> f32 {
        libm::sqrtf(self.length_squared())
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Normalize the vector to unit length.
    /// Returns a zero vector if the length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            self / len
        }
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            x: if self.x < other.x { self.x } else { other.x },
            y: if self.y < other.y { self.y } else { other.y },
            z: if self.z < other.z { self.z } else { other.z },
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: if self.x > other.x { self.x } else { other.x },
            y: if self.y > other.y { self.y } else { other.y },
            z: if self.z > other.z { self.z } else { other.z },
        }
    }
}

impl From<[f32; 3]> for Point3 {
    #[inline]
    fn from(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<Point3> for [f32; 3] {
    #[inline]
    fn from(p: Point3) -> Self {
        p.as_array()
    }
}

impl From<(f32, f32, f32)> for Point3 {
    #[inline]
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Point3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Point3> for f32 {
    type Output = Point3;

    #[inline]
    fn mul(self, point: Point3) -> Point3 {
        point * self
    }
}

impl Div<f32> for Point3 {
    type Output = Self;

    #[inline]
    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Point3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// One of the three lattice axes.
///
/// The discriminant is the axis slot used in global edge indices
/// (`3 * vertex_index + axis`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// The x axis (slot 0).
    X = 0,
    /// The y axis (slot 1).
    Y = 1,
    /// The z axis (slot 2).
    Z = 2,
}

impl Axis {
    /// All axes in slot order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Slot index of this axis (0, 1 or 2).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit step along this axis as `(di, dj, dk)`.
    #[inline]
    pub const fn unit(self) -> (u32, u32, u32) {
        match self {
            Axis::X => (1, 0, 0),
            Axis::Y => (0, 1, 0),
            Axis::Z => (0, 0, 1),
        }
    }
}

/// Integer coordinates of a lattice vertex, each in `0..=n` along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexCoord {
    /// Index along x.
    pub i: u32,
    /// Index along y.
    pub j: u32,
    /// Index along z.
    pub k: u32,
}

impl VertexCoord {
    /// Create a new VertexCoord.
    #[inline]
    pub const fn new(i: u32, j: u32, k: u32) -> Self {
        Self { i, j, k }
    }

    /// The vertex reached by stepping `(di, dj, dk)` from this one.
    #[inline]
    pub const fn offset(self, (di, dj, dk): (u32, u32, u32)) -> Self {
        Self::new(self.i + di, self.j + dj, self.k + dk)
    }

    /// The neighbouring vertex one step along `axis`.
    #[inline]
    pub const fn step(self, axis: Axis) -> Self {
        self.offset(axis.unit())
    }
}

/// Integer coordinates of a lattice cell, each in `0..n` along its axis.
///
/// A cell's origin corner is the vertex with the same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    /// Index along x.
    pub i: u32,
    /// Index along y.
    pub j: u32,
    /// Index along z.
    pub k: u32,
}

impl CellCoord {
    /// Create a new CellCoord.
    #[inline]
    pub const fn new(i: u32, j: u32, k: u32) -> Self {
        Self { i, j, k }
    }

    /// The origin corner vertex of this cell.
    #[inline]
    pub const fn origin_vertex(self) -> VertexCoord {
        VertexCoord::new(self.i, self.j, self.k)
    }

    /// The corner vertex at the given `(0|1, 0|1, 0|1)` offset.
    #[inline]
    pub const fn corner_vertex(self, offset: (u32, u32, u32)) -> VertexCoord {
        self.origin_vertex().offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point3_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Point3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Point3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Point3::new(2.0, 2.5, 3.0));
        assert_eq!(-a, Point3::new(-1.0, -2.0, -3.0));

        let mut acc = Point3::ZERO;
        acc += a;
        acc += a;
        assert_eq!(acc, Point3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_point3_dot_cross() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);

        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.dot(a), 1.0);
        assert_eq!(a.cross(b), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(b.cross(a), Point3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_point3_length_and_normalize() {
        let p = Point3::new(3.0, 4.0, 0.0);
        assert_eq!(p.length(), 5.0);
        assert!((p.normalize().length() - 1.0).abs() < 1e-6);

        // Zero stays zero instead of turning into NaN
        assert_eq!(Point3::ZERO.normalize(), Point3::ZERO);
    }

    #[test]
    fn test_point3_lerp() {
        let a = Point3::ZERO;
        let b = Point3::splat(10.0);

        assert_eq!(a.lerp(b, 0.5), Point3::splat(5.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_point3_is_finite() {
        assert!(Point3::new(1.0, -2.0, 3.0).is_finite());
        assert!(!Point3::new(f32::INFINITY, 0.0, 0.0).is_finite());
        assert!(!Point3::new(0.0, f32::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_point3_conversions() {
        let arr = [1.0, 2.0, 3.0];
        let p: Point3 = arr.into();
        assert_eq!(p.as_array(), arr);

        let back: [f32; 3] = p.into();
        assert_eq!(back, arr);

        let p2: Point3 = (1.0f32, 2.0f32, 3.0f32).into();
        assert_eq!(p2, p);
        assert_eq!(p.component(Axis::Y), 2.0);
    }

    #[test]
    fn test_axis_steps() {
        let v = VertexCoord::new(1, 2, 3);
        assert_eq!(v.step(Axis::X), VertexCoord::new(2, 2, 3));
        assert_eq!(v.step(Axis::Y), VertexCoord::new(1, 3, 3));
        assert_eq!(v.step(Axis::Z), VertexCoord::new(1, 2, 4));

        for (slot, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), slot);
        }
    }

    #[test]
    fn test_cell_corner_vertex() {
        let cell = CellCoord::new(4, 5, 6);
        assert_eq!(cell.origin_vertex(), VertexCoord::new(4, 5, 6));
        assert_eq!(cell.corner_vertex((1, 0, 1)), VertexCoord::new(5, 5, 7));
    }
}
