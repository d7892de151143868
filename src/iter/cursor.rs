use crate::error::{Result, SegmentError};
use crate::segment::{Color, SegmentKind, SegmentRef, Tag};

/// A collection of segments addressable by index.
///
/// Implemented by [`crate::Surface`] and by component views, so boundary
/// computation, bounding boxes and cursors work on either.
pub trait SurfaceSource {
    /// Number of segments.
    fn segment_count(&self) -> usize;

    /// Returns the segment at `index`. The returned reference's `index`
    /// field is `index` itself, i.e. local to this source.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn segment(&self, index: usize) -> Result<SegmentRef<'_>>;

    /// Returns a cursor positioned at the first segment.
    fn cursor(&self) -> SegmentCursor<'_, Self>
    where
        Self: Sized,
    {
        SegmentCursor::new(self, 0, self.segment_count())
    }

    /// Splits the segments into at most `parts` disjoint, contiguous
    /// cursors that together visit every segment exactly once.
    ///
    /// Intended for fork-join consumers that accumulate per range and
    /// combine partial results afterwards.
    fn partition_cursors(&self, parts: usize) -> Vec<SegmentCursor<'_, Self>>
    where
        Self: Sized,
    {
        let len = self.segment_count();
        let parts = parts.clamp(1, len.max(1));
        let base = len / parts;
        let extra = len % parts;
        let mut start = 0;
        (0..parts)
            .map(|n| {
                let end = start + base + usize::from(n < extra);
                let cursor = SegmentCursor::new(self, start, end);
                start = end;
                cursor
            })
            .collect()
    }
}

/// Sequential access to segment data.
///
/// Each step exposes the current segment's kind, control points, color and
/// tag until [`SurfaceCursor::is_done`] returns `true`.
pub trait SurfaceCursor {
    /// Returns `true` once every segment has been visited.
    fn is_done(&self) -> bool;

    /// Moves to the next segment. Does nothing once the cursor is done.
    fn advance(&mut self);

    /// Copies the current segment's control points into `coords` and
    /// returns its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor is done or `coords` is too short for
    /// the current segment.
    fn current_segment(&self, coords: &mut [f64]) -> Result<SegmentKind>;

    /// Color of the current segment.
    fn current_color(&self) -> Option<Color>;

    /// Tag of the current segment.
    fn current_tag(&self) -> Option<Tag>;
}

/// Copies `src` into the front of `dst`, checking the length first.
pub(crate) fn fill_buffer(dst: &mut [f64], src: &[f64]) -> Result<()> {
    if dst.len() < src.len() {
        return Err(SegmentError::BufferTooSmall {
            needed: src.len(),
            actual: dst.len(),
        }
        .into());
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(())
}

/// A cursor over a contiguous index range of a [`SurfaceSource`].
#[derive(Debug)]
pub struct SegmentCursor<'a, S: SurfaceSource + ?Sized> {
    source: &'a S,
    index: usize,
    end: usize,
}

impl<S: SurfaceSource + ?Sized> Clone for SegmentCursor<'_, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            index: self.index,
            end: self.end,
        }
    }
}

impl<'a, S: SurfaceSource + ?Sized> SegmentCursor<'a, S> {
    /// Creates a cursor over `start..end`, clamped to the source's length.
    #[must_use]
    pub fn new(source: &'a S, start: usize, end: usize) -> Self {
        let end = end.min(source.segment_count());
        Self {
            source,
            index: start.min(end),
            end,
        }
    }

    /// Index of the current segment within the source.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of segments left, including the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.end - self.index
    }

    fn current(&self) -> Result<SegmentRef<'a>> {
        if self.index >= self.end {
            return Err(SegmentError::CursorExhausted.into());
        }
        self.source.segment(self.index)
    }
}

impl<S: SurfaceSource + ?Sized> SurfaceCursor for SegmentCursor<'_, S> {
    fn is_done(&self) -> bool {
        self.index >= self.end
    }

    fn advance(&mut self) {
        if self.index < self.end {
            self.index += 1;
        }
    }

    fn current_segment(&self, coords: &mut [f64]) -> Result<SegmentKind> {
        let seg = self.current()?;
        fill_buffer(coords, seg.coords)?;
        Ok(seg.kind)
    }

    fn current_color(&self) -> Option<Color> {
        self.current().ok().and_then(|seg| seg.color)
    }

    fn current_tag(&self) -> Option<Tag> {
        self.current().ok().and_then(|seg| seg.tag.cloned())
    }
}

impl<'a, S: SurfaceSource + ?Sized> Iterator for SegmentCursor<'a, S> {
    type Item = SegmentRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let seg = self.current().ok()?;
        self.index += 1;
        Some(seg)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}
