use super::{Matrix4, Point3};

/// A geometric mapping applied point-wise to control points.
///
/// Bezier primitives are affine invariant, so transforming the control
/// points transforms the surface they describe.
pub trait Transform3 {
    /// Maps a single point.
    fn apply(&self, p: &Point3) -> Point3;
}

impl Transform3 for Matrix4 {
    /// Transforms a point by a 4x4 matrix (homogeneous coordinates).
    fn apply(&self, p: &Point3) -> Point3 {
        let v = self * nalgebra::Vector4::new(p.x, p.y, p.z, 1.0);
        if v.w == 1.0 || v.w == 0.0 {
            Point3::new(v.x, v.y, v.z)
        } else {
            Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        }
    }
}

impl Transform3 for nalgebra::Isometry3<f64> {
    fn apply(&self, p: &Point3) -> Point3 {
        self.transform_point(p)
    }
}

impl<T: Transform3 + ?Sized> Transform3 for &T {
    fn apply(&self, p: &Point3) -> Point3 {
        (**self).apply(p)
    }
}
