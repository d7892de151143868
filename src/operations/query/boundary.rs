use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::error::{OperationError, Result};
use crate::iter::SurfaceSource;
use crate::topology::{
    analyze, write_diagnostics, BoundaryOptions, BoundaryPath, Diagnostic, Validator,
};

/// Outcome of a standalone boundary computation.
#[derive(Debug, Clone)]
pub struct BoundaryReport {
    pub well_formed: bool,
    /// Boundary curves; `None` unless well formed.
    pub boundary: Option<BoundaryPath>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Computes the boundary of any segment source without touching a
/// surface's cache.
///
/// Segment indices in the result are those of the source, so a
/// [`crate::ComponentView`] reports component-local indices.
#[derive(Debug, Clone, Default)]
pub struct ComputeBoundary {
    validator: Validator,
    counter: Option<Arc<AtomicUsize>>,
}

impl ComputeBoundary {
    /// Creates a new `ComputeBoundary` query for an oriented surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the orientation and start-point rules.
    #[must_use]
    pub fn with_options(mut self, options: BoundaryOptions) -> Self {
        let counter = self.counter.clone();
        self.validator = Validator::new(options);
        if let Some(counter) = counter {
            self.validator = self.validator.with_counter(counter);
        }
        self
    }

    /// Counts every validation run in `counter`.
    #[must_use]
    pub fn with_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.validator = self.validator.with_counter(Arc::clone(&counter));
        self.counter = Some(counter);
        self
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, source: &impl SurfaceSource) -> BoundaryReport {
        let analysis = analyze(source.cursor(), &self.validator);
        BoundaryReport {
            well_formed: analysis.well_formed(),
            boundary: analysis.boundary,
            diagnostics: analysis.validation.diagnostics,
        }
    }

    /// Executes the query and writes every defect to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a write.
    pub fn execute_with_sink(
        &self,
        source: &impl SurfaceSource,
        sink: &mut dyn fmt::Write,
    ) -> Result<BoundaryReport> {
        let report = self.execute(source);
        write_diagnostics(&report.diagnostics, sink)
            .map_err(|_| OperationError::Failed("diagnostics sink rejected a write".into()))?;
        Ok(report)
    }
}
