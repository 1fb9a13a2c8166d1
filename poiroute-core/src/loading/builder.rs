//! Construction of street graphs from OSM-like nodes and ways

use geo::{LineString, Point};
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::algo::haversine_distance;
use crate::model::streets::{OsmNodeId, StreetEdge, StreetGraph, StreetNode};
use crate::{Error, Meters};

/// Traversal direction of a way relative to its node order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WayDirection {
    Both,
    Forward,
    Backward,
}

/// Collects nodes and ways, then builds a [`StreetGraph`].
///
/// With simplification enabled only way endpoints and nodes shared between
/// ways become graph nodes; the chain of points between two of them is
/// collapsed into a single edge carrying the full geometry and length.
#[derive(Debug, Default)]
pub struct StreetGraphBuilder {
    nodes: HashMap<OsmNodeId, Point<f64>>,
    ways: Vec<(Vec<OsmNodeId>, WayDirection)>,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node position (x = longitude, y = latitude)
    pub fn add_node(&mut self, id: OsmNodeId, point: Point<f64>) {
        self.nodes.insert(id, point);
    }

    pub fn add_way(&mut self, nodes: &[OsmNodeId], direction: WayDirection) {
        self.ways.push((nodes.to_vec(), direction));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a referenced node has
    /// non-finite coordinates.
    pub fn build(&self, simplify: bool) -> Result<StreetGraph, Error> {
        let junctions = self.junctions(simplify);
        let mut graph: DiGraph<StreetNode, StreetEdge> = DiGraph::new();
        let mut index: HashMap<OsmNodeId, NodeIndex> = HashMap::new();
        let mut skipped_ways = 0usize;

        for (way, direction) in &self.ways {
            let way: Vec<OsmNodeId> = way.iter().copied().dedup().collect();
            if way.len() < 2 {
                continue;
            }
            let Some(points) = way
                .iter()
                .map(|id| self.nodes.get(id).copied())
                .collect::<Option<Vec<_>>>()
            else {
                skipped_ways += 1;
                continue;
            };
            if let Some(bad) = points.iter().find(|p| !p.x().is_finite() || !p.y().is_finite()) {
                return Err(Error::InvalidInput(format!(
                    "non-finite node coordinates {bad:?}"
                )));
            }

            let mut start = 0;
            for current in 1..way.len() {
                if !junctions.contains(&way[current]) && current != way.len() - 1 {
                    continue;
                }
                if way[start] == way[current] {
                    // Loop closing on its only junction: split at the middle
                    // node so it survives as two edges.
                    let middle = (start + current) / 2;
                    add_span(&mut graph, &mut index, &way, &points, start, middle, *direction);
                    add_span(&mut graph, &mut index, &way, &points, middle, current, *direction);
                } else {
                    add_span(&mut graph, &mut index, &way, &points, start, current, *direction);
                }
                start = current;
            }
        }

        if skipped_ways > 0 {
            log::warn!("Skipped {skipped_ways} ways referencing unknown nodes");
        }
        log::debug!(
            "Built street graph: {} nodes, {} edges (simplify: {simplify})",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(StreetGraph::new(graph))
    }

    /// OSM ids that must become graph nodes
    fn junctions(&self, simplify: bool) -> HashSet<OsmNodeId> {
        if !simplify {
            return self.ways.iter().flat_map(|(way, _)| way.iter().copied()).collect();
        }

        let mut usage: HashMap<OsmNodeId, usize> = HashMap::new();
        let mut junctions = HashSet::new();
        for (way, _) in &self.ways {
            if let (Some(first), Some(last)) = (way.first(), way.last()) {
                junctions.insert(*first);
                junctions.insert(*last);
            }
            for id in way {
                *usage.entry(*id).or_default() += 1;
            }
        }
        junctions.extend(usage.into_iter().filter(|(_, n)| *n > 1).map(|(id, _)| id));
        junctions
    }
}

fn node_index(
    graph: &mut DiGraph<StreetNode, StreetEdge>,
    index: &mut HashMap<OsmNodeId, NodeIndex>,
    id: OsmNodeId,
    geometry: Point<f64>,
) -> NodeIndex {
    *index
        .entry(id)
        .or_insert_with(|| graph.add_node(StreetNode { id, geometry }))
}

/// Add the edges covering `way[from..=to]`
#[allow(clippy::too_many_arguments)]
fn add_span(
    graph: &mut DiGraph<StreetNode, StreetEdge>,
    index: &mut HashMap<OsmNodeId, NodeIndex>,
    way: &[OsmNodeId],
    points: &[Point<f64>],
    from: usize,
    to: usize,
    direction: WayDirection,
) {
    let span = &points[from..=to];
    let length: Meters = span
        .iter()
        .tuple_windows()
        .map(|(a, b)| haversine_distance(*a, *b))
        .sum();
    let source = node_index(graph, index, way[from], points[from]);
    let target = node_index(graph, index, way[to], points[to]);
    let geometry: LineString<f64> = span.iter().copied().collect();
    add_segment(graph, source, target, length, geometry, direction);
}

fn add_segment(
    graph: &mut DiGraph<StreetNode, StreetEdge>,
    from: NodeIndex,
    to: NodeIndex,
    length: Meters,
    geometry: LineString<f64>,
    direction: WayDirection,
) {
    if matches!(direction, WayDirection::Both | WayDirection::Backward) {
        let reversed: LineString<f64> = geometry.0.iter().rev().copied().collect();
        graph.add_edge(
            to,
            from,
            StreetEdge {
                length,
                geometry: reversed,
            },
        );
    }
    if matches!(direction, WayDirection::Both | WayDirection::Forward) {
        graph.add_edge(from, to, StreetEdge { length, geometry });
    }
}
