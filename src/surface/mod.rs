//! The surface container and its cached topology queries.

mod cache;
mod component;

pub use component::ComponentView;

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::iter::{SurfaceCursor, SurfaceSource};
use crate::math::Transform3;
use crate::segment::{Color, SegmentKind, SegmentRef, SegmentStore, Tag};
use crate::topology::{
    analyze, write_diagnostics, BoundaryOptions, BoundaryPath, Component, Diagnostic, Validator,
};

use cache::TopologyCache;

/// How a surface's topology is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Shared edges must be traversed in opposite directions.
    pub oriented: bool,
    /// Tolerate two boundary edges leaving one point, and open boundary
    /// curves. Never changes which edges count as matched.
    pub allow_multiple_starts: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            oriented: true,
            allow_multiple_starts: false,
        }
    }
}

impl From<SurfaceOptions> for BoundaryOptions {
    fn from(options: SurfaceOptions) -> Self {
        Self {
            oriented: options.oriented,
            allow_multiple_starts: options.allow_multiple_starts,
        }
    }
}

/// A surface assembled from planar triangles, cubic triangles, cubic
/// vertices and bicubic patches.
///
/// Segments are appended and never removed individually. Topology
/// (well-formedness, boundary, components) is computed on first query and
/// cached until the next mutation.
///
/// A `Surface` can be moved between threads but not shared; wrap it in a
/// lock if several threads need it.
#[derive(Debug, Clone)]
pub struct Surface {
    store: SegmentStore,
    options: SurfaceOptions,
    validator: Validator,
    cache: RefCell<Option<TopologyCache>>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Creates an empty oriented surface.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SurfaceOptions::default())
    }

    /// Creates an empty surface whose shared edges may be traversed in
    /// either direction.
    #[must_use]
    pub fn unoriented() -> Self {
        Self::with_options(SurfaceOptions {
            oriented: false,
            ..SurfaceOptions::default()
        })
    }

    /// Creates an empty surface with explicit options.
    #[must_use]
    pub fn with_options(options: SurfaceOptions) -> Self {
        Self {
            store: SegmentStore::new(),
            options,
            validator: Validator::new(options.into()),
            cache: RefCell::new(None),
        }
    }

    /// Counts every topology recomputation in `counter`.
    #[must_use]
    pub fn with_validation_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.validator = self.validator.with_counter(counter);
        self
    }

    /// The options the surface was created with.
    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    /// Returns `true` if orientation is checked.
    #[must_use]
    pub fn is_oriented(&self) -> bool {
        self.options.oriented
    }

    /// Read access to the underlying segment store.
    #[must_use]
    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    /// Returns `true` if the surface has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // --- Ingestion ---

    /// Appends a segment of any kind and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if `coords` does not hold exactly the number of
    /// coordinates `kind` requires, or contains a non-finite value.
    pub fn add_segment(
        &mut self,
        kind: SegmentKind,
        coords: &[f64],
        flipped: bool,
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        Ok(self.store.push(kind, coords, flipped, color, tag)?)
    }

    /// Appends a planar triangle (9 coordinates).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_planar_triangle(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::PlanarTriangle, coords, false, color, tag)
    }

    /// Appends a planar triangle with reversed orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_planar_triangle_flipped(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::PlanarTriangle, coords, true, color, tag)
    }

    /// Appends a cubic Bezier triangle (30 coordinates).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_triangle(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicTriangle, coords, false, color, tag)
    }

    /// Appends a cubic Bezier triangle with reversed orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_triangle_flipped(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicTriangle, coords, true, color, tag)
    }

    /// Appends a cubic vertex (15 coordinates: four curve points, then the
    /// apex).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_vertex(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicVertex, coords, false, color, tag)
    }

    /// Appends a cubic vertex with reversed orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_vertex_flipped(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicVertex, coords, true, color, tag)
    }

    /// Appends a bicubic patch (48 coordinates).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_patch(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicPatch, coords, false, color, tag)
    }

    /// Appends a bicubic patch with reversed orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate count is wrong or a coordinate is
    /// not finite.
    pub fn add_cubic_patch_flipped(
        &mut self,
        coords: &[f64],
        color: Option<Color>,
        tag: Option<Tag>,
    ) -> Result<usize> {
        self.add_segment(SegmentKind::CubicPatch, coords, true, color, tag)
    }

    /// Appends every segment of `source`, keeping colors and tags. Returns
    /// the number of segments appended.
    ///
    /// Nothing is appended if any segment fails.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment of `source` cannot be read.
    pub fn append(&mut self, source: &impl SurfaceSource) -> Result<usize> {
        let mut staged = SegmentStore::new();
        for index in 0..source.segment_count() {
            let segment = source.segment(index)?;
            staged.push(
                segment.kind,
                segment.coords,
                false,
                segment.color,
                segment.tag.cloned(),
            )?;
        }
        Ok(self.store.absorb(staged))
    }

    /// Appends everything `cursor` yields. Returns the number of segments
    /// appended.
    ///
    /// Segments are staged until the cursor is exhausted, so a failure
    /// leaves the surface unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor fails or yields invalid coordinates.
    pub fn append_cursor(&mut self, mut cursor: impl SurfaceCursor) -> Result<usize> {
        let mut buf = [0.0; 48];
        let mut staged = SegmentStore::new();
        while !cursor.is_done() {
            let kind = cursor.current_segment(&mut buf)?;
            staged.push(
                kind,
                &buf[..kind.coord_count()],
                false,
                cursor.current_color(),
                cursor.current_tag(),
            )?;
            cursor.advance();
        }
        Ok(self.store.absorb(staged))
    }

    /// Removes every segment.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Maps every control point through `transform`.
    ///
    /// Orientation is not adjusted; see [`crate::operations::transform::Mirror`]
    /// for reflections.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the surface unchanged, if a mapped
    /// coordinate does not fit single precision.
    pub fn transform(&mut self, transform: &impl Transform3) -> Result<()> {
        Ok(self.store.map_points(|p| transform.apply(p))?)
    }

    /// Reverses the orientation of every segment.
    pub fn flip_all(&mut self) {
        self.store.flip_all();
    }

    // --- Topology queries ---

    /// Runs `f` on the topology of the current generation, recomputing it
    /// first if the store changed since the last query.
    fn with_topology<R>(&self, f: impl FnOnce(&TopologyCache) -> R) -> R {
        let generation = self.store.generation();
        let mut slot = self.cache.borrow_mut();
        if slot.as_ref().is_some_and(|c| c.generation != generation) {
            trace!(generation, "topology cache is stale");
            *slot = None;
        }
        let cache = slot.get_or_insert_with(|| {
            TopologyCache::new(generation, analyze(self.cursor(), &self.validator))
        });
        f(cache)
    }

    /// Returns `true` if the surface is a valid 2-manifold, possibly with
    /// boundary.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.with_topology(|t| t.analysis.well_formed())
    }

    /// Every defect found in the surface.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.with_topology(|t| t.analysis.diagnostics().to_vec())
    }

    /// Writes one line per defect to `sink` and returns whether the surface
    /// is well formed.
    ///
    /// A failing sink does not change the verdict.
    pub fn write_diagnostics(&self, sink: &mut dyn fmt::Write) -> bool {
        self.with_topology(|t| {
            if write_diagnostics(t.analysis.diagnostics(), sink).is_err() {
                trace!("diagnostics sink rejected a write");
            }
            t.analysis.well_formed()
        })
    }

    /// The boundary curves, or `None` if the surface is malformed.
    #[must_use]
    pub fn boundary(&self) -> Option<BoundaryPath> {
        self.with_topology(|t| t.analysis.boundary.clone())
    }

    /// Owning segment of each boundary edge, in path order.
    #[must_use]
    pub fn boundary_segment_indices(&self) -> Option<Vec<usize>> {
        self.with_topology(|t| t.analysis.boundary.as_ref().map(|b| b.segment_indices.clone()))
    }

    /// Local edge number of each boundary edge, in path order.
    #[must_use]
    pub fn boundary_edge_numbers(&self) -> Option<Vec<usize>> {
        self.with_topology(|t| t.analysis.boundary.as_ref().map(|b| b.edge_numbers.clone()))
    }

    /// Tag of each boundary edge's segment, in path order.
    #[must_use]
    pub fn boundary_tags(&self) -> Option<Vec<Option<Tag>>> {
        self.with_topology(|t| t.analysis.boundary.as_ref().map(|b| b.tags.clone()))
    }

    /// Color of each boundary edge's segment, in path order.
    #[must_use]
    pub fn boundary_colors(&self) -> Option<Vec<Option<Color>>> {
        self.with_topology(|t| t.analysis.boundary.as_ref().map(|b| b.colors.clone()))
    }

    /// Returns `true` if the surface is well formed and has no boundary.
    #[must_use]
    pub fn is_closed_manifold(&self) -> bool {
        self.with_topology(|t| t.analysis.boundary.as_ref().is_some_and(BoundaryPath::is_empty))
    }

    /// Number of connected components; zero if the surface is malformed.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.with_topology(|t| t.components().len())
    }

    /// All connected components, ordered by smallest segment index.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        self.with_topology(|t| t.components().to_vec())
    }

    /// Returns component `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is malformed or `index` is not below
    /// [`Surface::component_count`].
    pub fn component(&self, index: usize) -> Result<Component> {
        let (well_formed, component, count) = self.with_topology(|t| {
            let components = t.components();
            (t.analysis.well_formed(), components.get(index).cloned(), components.len())
        });
        if !well_formed {
            return Err(TopologyError::NotWellFormed.into());
        }
        component.ok_or_else(|| TopologyError::ComponentOutOfRange { index, count }.into())
    }

    /// Returns component `index` as a segment source.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below [`Surface::component_count`].
    pub fn component_view(&self, index: usize) -> Result<ComponentView<'_>> {
        Ok(ComponentView::new(self, self.component(index)?))
    }
}

impl SurfaceSource for Surface {
    fn segment_count(&self) -> usize {
        self.store.len()
    }

    fn segment(&self, index: usize) -> Result<SegmentRef<'_>> {
        Ok(self.store.get(index)?)
    }
}
