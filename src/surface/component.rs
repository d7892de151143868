use crate::error::{Result, SegmentError};
use crate::iter::SurfaceSource;
use crate::segment::SegmentRef;
use crate::topology::Component;

use super::Surface;

/// A connected component exposed as a segment source of its own.
///
/// Segment `n` of the view is the component's `n`-th segment; no
/// coordinate data is copied.
#[derive(Debug, Clone)]
pub struct ComponentView<'a> {
    surface: &'a Surface,
    component: Component,
}

impl<'a> ComponentView<'a> {
    pub(crate) fn new(surface: &'a Surface, component: Component) -> Self {
        Self { surface, component }
    }

    /// The surface the component belongs to.
    #[must_use]
    pub fn surface(&self) -> &'a Surface {
        self.surface
    }

    /// The member segment indices.
    #[must_use]
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Index in the surface of the view's `local` segment.
    #[must_use]
    pub fn surface_index(&self, local: usize) -> Option<usize> {
        self.component.segment_indices.get(local).copied()
    }
}

impl SurfaceSource for ComponentView<'_> {
    fn segment_count(&self) -> usize {
        self.component.len()
    }

    fn segment(&self, index: usize) -> Result<SegmentRef<'_>> {
        let global = self
            .surface_index(index)
            .ok_or(SegmentError::IndexOutOfRange {
                index,
                len: self.component.len(),
            })?;
        let mut segment = self.surface.segment(global)?;
        segment.index = index;
        Ok(segment)
    }
}
