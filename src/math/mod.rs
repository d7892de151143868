pub mod bezier;
pub mod transform;

pub use transform::Transform3;

use std::cmp::Ordering;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Only used by operations that validate user input (e.g. singular
/// matrices). Edge matching never uses a tolerance.
pub const TOLERANCE: f64 = 1e-10;

/// Rounds a coordinate to the storage precision of a surface.
///
/// All control points are stored at single precision so that coordinates
/// computed along different paths (e.g. a shared edge built from two
/// neighbouring patches) compare exactly equal. Negative zero is folded
/// into positive zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_coord(value: f64) -> f64 {
    f64::from(value as f32) + 0.0
}

/// Rounds every coordinate of a point to the storage precision.
#[must_use]
pub fn round_point(p: &Point3) -> Point3 {
    Point3::new(round_coord(p.x), round_coord(p.y), round_coord(p.z))
}

/// Lexicographic (x, y, z) ordering of two points.
///
/// Stored coordinates are finite and free of negative zero, so
/// `total_cmp` agrees with numeric comparison.
#[must_use]
pub fn cmp_points(a: &Point3, b: &Point3) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}

/// Returns the two interior control points of the cubic that traces the
/// straight line from `a` to `b`, rounded to the storage precision.
///
/// The expressions are symmetric, so `elevate_line(b, a)` returns the same
/// points in swapped order.
#[must_use]
pub fn elevate_line(a: &Point3, b: &Point3) -> (Point3, Point3) {
    let c1 = Point3::new(
        (2.0 * a.x + b.x) / 3.0,
        (2.0 * a.y + b.y) / 3.0,
        (2.0 * a.z + b.z) / 3.0,
    );
    let c2 = Point3::new(
        (a.x + 2.0 * b.x) / 3.0,
        (a.y + 2.0 * b.y) / 3.0,
        (a.z + 2.0 * b.z) / 3.0,
    );
    (round_point(&c1), round_point(&c2))
}

/// Exact hashable key for a stored point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey([u64; 3]);

impl PointKey {
    /// Creates the key for a point whose coordinates are already rounded.
    #[must_use]
    pub fn new(p: &Point3) -> Self {
        Self([
            (p.x + 0.0).to_bits(),
            (p.y + 0.0).to_bits(),
            (p.z + 0.0).to_bits(),
        ])
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a degenerate box containing a single point.
    #[must_use]
    pub fn from_point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the box to include `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// Returns the extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn rounding_folds_negative_zero() {
        let r = round_coord(-0.0);
        assert_eq!(r.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn rounding_is_idempotent() {
        let once = round_coord(0.1);
        assert_eq!(round_coord(once), once);
        assert_ne!(once, 0.1);
    }

    #[test]
    fn point_order_is_lexicographic() {
        assert_eq!(cmp_points(&p(0.0, 5.0, 5.0), &p(1.0, 0.0, 0.0)), Ordering::Less);
        assert_eq!(cmp_points(&p(1.0, 0.0, 2.0), &p(1.0, 0.0, 1.0)), Ordering::Greater);
        assert_eq!(cmp_points(&p(1.0, 2.0, 3.0), &p(1.0, 2.0, 3.0)), Ordering::Equal);
    }

    #[test]
    fn elevation_is_symmetric() {
        let a = round_point(&p(0.3, -1.7, 2.9));
        let b = round_point(&p(4.1, 0.2, -3.3));
        let (c1, c2) = elevate_line(&a, &b);
        let (d1, d2) = elevate_line(&b, &a);
        assert_eq!(c1, d2);
        assert_eq!(c2, d1);
    }

    #[test]
    fn aabb_grows() {
        let mut aabb = Aabb::from_point(p(1.0, 1.0, 1.0));
        aabb.include(&p(-1.0, 2.0, 0.5));
        assert_eq!(aabb.min, p(-1.0, 1.0, 0.5));
        assert_eq!(aabb.max, p(1.0, 2.0, 1.0));
        assert_eq!(aabb.size(), Vector3::new(2.0, 1.0, 0.5));
    }
}
