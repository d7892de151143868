use std::cell::OnceCell;

use crate::topology::{Analysis, Component};

/// Derived topology of one store generation.
#[derive(Debug, Clone)]
pub(crate) struct TopologyCache {
    pub generation: u64,
    pub analysis: Analysis,
    components: OnceCell<Vec<Component>>,
}

impl TopologyCache {
    pub fn new(generation: u64, analysis: Analysis) -> Self {
        Self {
            generation,
            analysis,
            components: OnceCell::new(),
        }
    }

    /// Connected components, computed on first use.
    pub fn components(&self) -> &[Component] {
        self.components.get_or_init(|| self.analysis.components())
    }
}
