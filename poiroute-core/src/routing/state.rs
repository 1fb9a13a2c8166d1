use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::Meters;

#[derive(Copy, Clone, PartialEq)]
pub(super) struct State {
    /// Cost so far plus the remaining estimate
    pub(super) estimate: Meters,
    pub(super) cost: Meters,
    pub(super) node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by estimate (reversed from standard Rust BinaryHeap)
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
