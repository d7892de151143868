use crate::error::{OperationError, Result};
use crate::math::{Matrix4, TOLERANCE};
use crate::Surface;

/// Applies an arbitrary affine 4x4 matrix to every control point of a
/// surface.
///
/// Orientation-reversing matrices (negative linear determinant) also flip
/// every segment, so a surface that was consistently oriented stays so
/// and keeps its outward side.
#[derive(Debug, Clone)]
pub struct GeneralTransform {
    matrix: Matrix4,
}

impl GeneralTransform {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    /// Executes the transformation, modifying the surface in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix has a non-finite entry, is not
    /// affine, collapses space (zero linear determinant) or maps a control
    /// point outside single precision range. The surface is unchanged on
    /// error.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        if self.matrix.iter().any(|v| !v.is_finite()) {
            return Err(OperationError::InvalidInput("matrix must be finite".into()).into());
        }
        let last = self.matrix.row(3);
        if last[0] != 0.0 || last[1] != 0.0 || last[2] != 0.0 || last[3] != 1.0 {
            return Err(OperationError::InvalidInput("matrix must be affine".into()).into());
        }
        let det = self.matrix.fixed_view::<3, 3>(0, 0).determinant();
        if det.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput("matrix is singular".into()).into());
        }

        surface.transform(&self.matrix)?;
        if det < 0.0 {
            surface.flip_all();
        }
        Ok(())
    }
}
