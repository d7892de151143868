use crate::error::{OperationError, Result};
use crate::math::{Matrix4, Point3, TOLERANCE};
use crate::Surface;

use super::GeneralTransform;

/// Scales a surface uniformly from a center point.
///
/// A negative factor is a point reflection; segment orientation is
/// restored afterwards.
#[derive(Debug, Clone)]
pub struct Scale {
    center: Point3,
    factor: f64,
}

impl Scale {
    /// Creates a new `Scale` operation.
    #[must_use]
    pub fn new(center: Point3, factor: f64) -> Self {
        Self { center, factor }
    }

    /// Executes the scaling, modifying the surface in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor is zero or not finite.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        if !self.factor.is_finite() || self.factor.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "scale factor must be finite and non-zero".into(),
            )
            .into());
        }
        let matrix = Matrix4::new_translation(&self.center.coords)
            * Matrix4::new_scaling(self.factor)
            * Matrix4::new_translation(&(-self.center.coords));
        GeneralTransform::new(matrix).execute(surface)
    }
}
