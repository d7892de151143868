use crate::error::SegmentError;
use crate::math::{round_coord, Point3};

use super::{flip_coords, Color, SegmentKind, SegmentRef, Tag};

/// Per-segment bookkeeping. Coordinates live in the shared buffer.
#[derive(Debug, Clone)]
struct SegmentData {
    kind: SegmentKind,
    control_offset: usize,
    color: Option<Color>,
    tag: Option<Tag>,
}

/// Central arena that owns every segment of a surface.
///
/// Segments are addressed by their insertion index and reference their
/// control points through an offset into one packed coordinate buffer.
/// Segments are never removed individually; [`SegmentStore::clear`] drops
/// them all. Every mutation bumps [`SegmentStore::generation`].
#[derive(Debug, Default, Clone)]
pub struct SegmentStore {
    segments: Vec<SegmentData>,
    coords: Vec<f64>,
    generation: u64,
}

impl SegmentStore {
    /// Creates a new, empty segment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if no segments are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Mutation counter; changes whenever the stored geometry changes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Appends a segment and returns its index.
    ///
    /// Coordinates are rounded to the storage precision. When `flipped` is
    /// set, the control points are permuted so the segment's orientation is
    /// reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if `coords` does not hold exactly the number of
    /// coordinates `kind` requires, if any coordinate is not finite, or if
    /// one overflows single precision.
    pub fn push(
        &mut self,
        kind: SegmentKind,
        coords: &[f64],
        flipped: bool,
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize, SegmentError> {
        let expected = kind.coord_count();
        if coords.len() != expected {
            return Err(SegmentError::ControlPointCount {
                kind,
                expected,
                actual: coords.len(),
            });
        }
        for (index, c) in coords.iter().enumerate() {
            if !c.is_finite() {
                return Err(SegmentError::NonFiniteCoordinate { index });
            }
            if !round_coord(*c).is_finite() {
                return Err(SegmentError::CoordinateOutOfRange { index });
            }
        }

        let control_offset = self.coords.len();
        if flipped {
            let permuted = flip_coords(kind, coords);
            self.coords.extend(permuted.into_iter().map(round_coord));
        } else {
            self.coords.extend(coords.iter().copied().map(round_coord));
        }
        self.segments.push(SegmentData {
            kind,
            control_offset,
            color,
            tag,
        });
        self.generation += 1;
        Ok(self.segments.len() - 1)
    }

    fn data(&self, index: usize) -> Result<&SegmentData, SegmentError> {
        self.segments.get(index).ok_or(SegmentError::IndexOutOfRange {
            index,
            len: self.segments.len(),
        })
    }

    /// Returns a view of the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn get(&self, index: usize) -> Result<SegmentRef<'_>, SegmentError> {
        let data = self.data(index)?;
        let end = data.control_offset + data.kind.coord_count();
        Ok(SegmentRef {
            index,
            kind: data.kind,
            coords: &self.coords[data.control_offset..end],
            color: data.color,
            tag: data.tag.as_ref(),
        })
    }

    /// Returns the kind of the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn kind(&self, index: usize) -> Result<SegmentKind, SegmentError> {
        Ok(self.data(index)?.kind)
    }

    /// Returns the color of the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn color(&self, index: usize) -> Result<Option<Color>, SegmentError> {
        Ok(self.data(index)?.color)
    }

    /// Returns the tag of the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn tag(&self, index: usize) -> Result<Option<&Tag>, SegmentError> {
        Ok(self.data(index)?.tag.as_ref())
    }

    /// Returns the control points of the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn points(&self, index: usize) -> Result<Vec<Point3>, SegmentError> {
        Ok(self.get(index)?.points())
    }

    /// Removes every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.coords.clear();
        self.generation += 1;
    }

    /// Rewrites every control point through `f`, re-rounding the result.
    ///
    /// The store is left untouched if any mapped coordinate is not finite
    /// at storage precision.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::CoordinateOutOfRange`] naming the first
    /// offending coordinate of the packed buffer.
    pub fn map_points(
        &mut self,
        mut f: impl FnMut(&Point3) -> Point3,
    ) -> Result<(), SegmentError> {
        let mut mapped = Vec::with_capacity(self.coords.len());
        for chunk in self.coords.chunks_exact(3) {
            let q = f(&Point3::new(chunk[0], chunk[1], chunk[2]));
            mapped.extend([q.x, q.y, q.z].map(round_coord));
        }
        if let Some(index) = mapped.iter().position(|c| !c.is_finite()) {
            return Err(SegmentError::CoordinateOutOfRange { index });
        }
        self.coords = mapped;
        self.generation += 1;
        Ok(())
    }

    /// Moves every segment of `other` to the end of this store, keeping
    /// their order. Returns the number of segments moved.
    pub fn absorb(&mut self, other: SegmentStore) -> usize {
        let count = other.segments.len();
        if count == 0 {
            return 0;
        }
        let base = self.coords.len();
        self.coords.extend(other.coords);
        self.segments
            .extend(other.segments.into_iter().map(|data| SegmentData {
                control_offset: data.control_offset + base,
                ..data
            }));
        self.generation += 1;
        count
    }

    /// Reverses the orientation of every segment in place.
    pub fn flip_all(&mut self) {
        for data in &self.segments {
            let end = data.control_offset + data.kind.coord_count();
            let flipped = flip_coords(data.kind, &self.coords[data.control_offset..end]);
            self.coords[data.control_offset..end].copy_from_slice(&flipped);
        }
        self.generation += 1;
    }
}
