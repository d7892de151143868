use nalgebra::Matrix3;

use crate::error::{OperationError, Result};
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};
use crate::Surface;

use super::GeneralTransform;

/// Mirrors a surface across a plane defined by a point and normal.
///
/// Every segment is flipped as well, so outward sides stay outward.
#[derive(Debug, Clone)]
pub struct Mirror {
    plane_origin: Point3,
    plane_normal: Vector3,
}

impl Mirror {
    /// Creates a new `Mirror` operation.
    #[must_use]
    pub fn new(plane_origin: Point3, plane_normal: Vector3) -> Self {
        Self {
            plane_origin,
            plane_normal,
        }
    }

    /// Executes the mirror, modifying the surface in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane normal is zero-length.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        let len = self.plane_normal.norm();
        if !len.is_finite() || len < TOLERANCE {
            return Err(OperationError::InvalidInput("mirror normal must be non-zero".into()).into());
        }
        let n = self.plane_normal / len;

        // Householder reflection I - 2nn^T about the plane through the origin
        let linear = Matrix3::identity() - n * n.transpose() * 2.0;
        let mut reflect = Matrix4::identity();
        reflect.fixed_view_mut::<3, 3>(0, 0).copy_from(&linear);
        let matrix = Matrix4::new_translation(&self.plane_origin.coords)
            * reflect
            * Matrix4::new_translation(&(-self.plane_origin.coords));

        GeneralTransform::new(matrix).execute(surface)
    }
}
