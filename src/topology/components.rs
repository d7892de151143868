use std::collections::VecDeque;

use super::validate::Validation;

/// A maximal set of segments connected through matched edges.
///
/// Holds indices only; the segment data stays in the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Indices of the member segments, ascending.
    pub segment_indices: Vec<usize>,
}

impl Component {
    /// Number of member segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segment_indices.len()
    }

    /// Returns `true` if the component has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_indices.is_empty()
    }

    /// Returns `true` if `segment` belongs to the component.
    #[must_use]
    pub fn contains(&self, segment: usize) -> bool {
        self.segment_indices.binary_search(&segment).is_ok()
    }
}

/// Splits `segment_count` segments into connected components.
///
/// Traversal is breadth-first over segments; each edge finds the other side
/// of its geometric edge by binary search in the sorted edge array. Segments
/// without any edge end up alone. Components are ordered by their smallest
/// segment index.
#[must_use]
pub fn partition(validation: &Validation, segment_count: usize) -> Vec<Component> {
    let mut by_segment: Vec<Vec<usize>> = vec![Vec::new(); segment_count];
    for (index, edge) in validation.edges.iter().enumerate() {
        if let Some(list) = by_segment.get_mut(edge.owning_segment) {
            list.push(index);
        }
    }

    let mut visited = vec![false; validation.edges.len()];
    let mut seen = vec![false; segment_count];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for root in 0..segment_count {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        queue.push_back(root);
        let mut members = Vec::new();

        while let Some(segment) = queue.pop_front() {
            members.push(segment);
            for &index in &by_segment[segment] {
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                let Some(partner) = validation.partner(index) else {
                    continue;
                };
                let other = validation.edges[partner].owning_segment;
                if other < segment_count && !seen[other] {
                    seen[other] = true;
                    queue.push_back(other);
                }
            }
        }

        members.sort_unstable();
        components.push(Component {
            segment_indices: members,
        });
    }

    components
}
