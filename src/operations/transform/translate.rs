use crate::error::{OperationError, Result};
use crate::math::{Matrix4, Vector3};
use crate::Surface;

use super::GeneralTransform;

/// Translates a surface by a displacement vector.
#[derive(Debug, Clone)]
pub struct Translate {
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(displacement: Vector3) -> Self {
        Self { displacement }
    }

    /// Executes the translation, modifying the surface in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the displacement is not finite.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        if !self.displacement.iter().all(|v| v.is_finite()) {
            return Err(OperationError::InvalidInput("displacement must be finite".into()).into());
        }
        GeneralTransform::new(Matrix4::new_translation(&self.displacement)).execute(surface)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::query::BoundingBox;
    use crate::test_support::two_cubes;

    #[test]
    fn translation_keeps_components() {
        let mut surface = two_cubes();
        Translate::new(Vector3::new(-2.0, 0.5, 10.0))
            .execute(&mut surface)
            .unwrap();
        assert_eq!(surface.component_count(), 2);
        let aabb = BoundingBox::new().execute(&surface).unwrap().unwrap();
        assert_eq!(aabb.min, Point3::new(-2.0, 0.5, 10.0));
        assert_eq!(aabb.max, Point3::new(2.0, 1.5, 11.0));
    }

    #[test]
    fn infinite_displacement_is_rejected() {
        let mut surface = two_cubes();
        let result = Translate::new(Vector3::new(f64::INFINITY, 0.0, 0.0)).execute(&mut surface);
        assert!(result.is_err());
    }
}
