use std::collections::BinaryHeap;
use std::time::Instant;

use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::algo::haversine_distance;
use crate::{Meters, StreetGraph};

/// Deadline is checked once per this many settled nodes
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Result of a point to point search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Found(Meters),
    NoPath,
    TimedOut,
}

impl SearchOutcome {
    /// Path length, with unreachable and timed out searches mapped to infinity
    pub fn length(self) -> Meters {
        match self {
            SearchOutcome::Found(length) => length,
            SearchOutcome::NoPath | SearchOutcome::TimedOut => f64::INFINITY,
        }
    }
}

/// A* search over edge lengths with a great-circle heuristic.
///
/// Edge lengths are sums of great-circle segment lengths, so the heuristic
/// never overestimates and the first time `target` is popped its cost is the
/// shortest path length.
pub fn astar_path_length(
    graph: &StreetGraph,
    start: NodeIndex,
    target: NodeIndex,
    deadline: Option<Instant>,
) -> SearchOutcome {
    if start == target {
        return SearchOutcome::Found(0.0);
    }
    let Some(goal) = graph.node_point(target) else {
        return SearchOutcome::NoPath;
    };
    let heuristic = |node: NodeIndex| {
        graph
            .node_point(node)
            .map_or(0.0, |point| haversine_distance(point, goal))
    };

    let mut costs: HashMap<NodeIndex, Meters> = HashMap::new();
    let mut heap = BinaryHeap::new();
    costs.insert(start, 0.0);
    heap.push(State {
        estimate: heuristic(start),
        cost: 0.0,
        node: start,
    });

    let mut settled = 0usize;
    while let Some(State { cost, node, .. }) = heap.pop() {
        if node == target {
            return SearchOutcome::Found(cost);
        }

        // Skip if we've found a better path
        if let Some(&best) = costs.get(&node) {
            if cost > best {
                continue;
            }
        }

        settled += 1;
        if settled % DEADLINE_CHECK_INTERVAL == 0
            && deadline.is_some_and(|deadline| Instant::now() >= deadline)
        {
            return SearchOutcome::TimedOut;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight().length;

            match costs.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        estimate: next_cost + heuristic(next),
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            estimate: next_cost + heuristic(next),
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    SearchOutcome::NoPath
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{StreetGraphBuilder, WayDirection};
    use approx::assert_relative_eq;
    use geo::Point;
    use std::time::Duration;

    /// `size` x `size` grid of two-way streets with a few one-way rows
    fn grid(size: i64) -> StreetGraph {
        let mut builder = StreetGraphBuilder::new();
        for row in 0..size {
            for col in 0..size {
                #[allow(clippy::cast_precision_loss)]
                builder.add_node(
                    row * size + col,
                    Point::new(29.0 + col as f64 * 0.001, 41.0 + row as f64 * 0.001),
                );
            }
        }
        for row in 0..size {
            let ids: Vec<i64> = (0..size).map(|col| row * size + col).collect();
            let direction = if row % 3 == 1 {
                WayDirection::Forward
            } else {
                WayDirection::Both
            };
            builder.add_way(&ids, direction);
        }
        for col in 0..size {
            let ids: Vec<i64> = (0..size).map(|row| row * size + col).collect();
            builder.add_way(&ids, WayDirection::Both);
        }
        builder.build(false).unwrap()
    }

    fn node(graph: &StreetGraph, osm_id: i64) -> NodeIndex {
        graph
            .graph
            .node_indices()
            .find(|&idx| graph.graph[idx].id == osm_id)
            .unwrap()
    }

    #[test]
    fn matches_dijkstra_lengths() {
        let graph = grid(8);
        let start = node(&graph, 0);
        let reference =
            petgraph::algo::dijkstra(&graph.graph, start, None, |e| e.weight().length);

        for target_id in [7, 15, 36, 63] {
            let target = node(&graph, target_id);
            let found = astar_path_length(&graph, start, target, None);
            match found {
                SearchOutcome::Found(length) => {
                    assert_relative_eq!(length, reference[&target], max_relative = 1e-9);
                }
                other => panic!("expected a path to {target_id}, got {other:?}"),
            }
        }
    }

    #[test]
    fn same_node_is_zero() {
        let graph = grid(3);
        let start = node(&graph, 4);
        assert_eq!(
            astar_path_length(&graph, start, start, None),
            SearchOutcome::Found(0.0)
        );
    }

    #[test]
    fn unreachable_target_is_no_path() {
        let mut builder = StreetGraphBuilder::new();
        builder.add_node(1, Point::new(29.000, 41.0));
        builder.add_node(2, Point::new(29.001, 41.0));
        builder.add_way(&[1, 2], WayDirection::Forward);
        let graph = builder.build(false).unwrap();

        let outcome = astar_path_length(&graph, node(&graph, 2), node(&graph, 1), None);
        assert_eq!(outcome, SearchOutcome::NoPath);
        assert_eq!(outcome.length(), f64::INFINITY);
    }

    #[test]
    fn expired_deadline_stops_long_searches() {
        let graph = grid(40);
        let deadline = Instant::now().checked_sub(Duration::from_secs(1));
        let outcome =
            astar_path_length(&graph, node(&graph, 0), node(&graph, 40 * 40 - 1), deadline);
        assert_eq!(outcome, SearchOutcome::TimedOut);
    }
}
