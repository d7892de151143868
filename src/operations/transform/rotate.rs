use crate::error::{OperationError, Result};
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};
use crate::Surface;

use super::GeneralTransform;

/// Rotates a surface around an axis.
#[derive(Debug, Clone)]
pub struct Rotate {
    axis_origin: Point3,
    axis_direction: Vector3,
    angle: f64,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `angle` - Rotation angle in radians.
    #[must_use]
    pub fn new(axis_origin: Point3, axis_direction: Vector3, angle: f64) -> Self {
        Self {
            axis_origin,
            axis_direction,
            angle,
        }
    }

    /// Executes the rotation, modifying the surface in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis direction is zero-length or the angle
    /// is not finite.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        if !self.angle.is_finite() {
            return Err(OperationError::InvalidInput("rotation angle must be finite".into()).into());
        }
        let len = self.axis_direction.norm();
        if len < TOLERANCE {
            return Err(
                OperationError::InvalidInput("rotation axis must be non-zero".into()).into(),
            );
        }
        let axis = self.axis_direction / len;

        let t_neg = Matrix4::new_translation(&(-self.axis_origin.coords));
        let rot = rotation_matrix(&axis, self.angle);
        let t_pos = Matrix4::new_translation(&self.axis_origin.coords);
        let matrix = t_pos * rot * t_neg;

        GeneralTransform::new(matrix).execute(surface)
    }
}

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[allow(clippy::many_single_char_names)]
fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::operations::query::BoundingBox;
    use crate::test_support::{open_box, unit_cube};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn rotate_90_around_z() {
        let mut cube = unit_cube();
        Rotate::new(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0), FRAC_PI_2)
            .execute(&mut cube)
            .unwrap();
        // x in [-1, 0], y in [0, 1]
        let aabb = BoundingBox::new().execute(&cube).unwrap().unwrap();
        assert!((aabb.min.x + 1.0).abs() < 1e-6);
        assert!(aabb.max.x.abs() < 1e-6);
        assert!(aabb.min.y.abs() < 1e-6 && (aabb.max.y - 1.0).abs() < 1e-6);
        assert!(cube.is_closed_manifold());
    }

    #[test]
    fn rotated_box_keeps_its_hole() {
        let mut surface = open_box();
        Rotate::new(p(0.3, 0.2, 0.1), Vector3::new(1.0, 2.0, 3.0), 0.7)
            .execute(&mut surface)
            .unwrap();
        assert!(surface.is_well_formed());
        let boundary = surface.boundary().unwrap();
        assert_eq!(boundary.loop_count(), 1);
        assert_eq!(boundary.edge_count(), 4);
    }

    #[test]
    fn zero_axis_returns_error() {
        let mut cube = unit_cube();
        let result = Rotate::new(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0), 1.0)
            .execute(&mut cube);
        assert!(result.is_err());
    }
}
