//! Street graph with a spatial index over its nodes

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use fixedbitset::FixedBitSet;
use geo::Point;
use petgraph::{
    Directed,
    graph::{DiGraph, Edges, NodeIndex},
    unionfind::UnionFind,
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{StreetEdge, StreetNode};
use crate::algo::geodesy::EARTH_RADIUS_M;
use crate::model::Connectivity;

/// R-tree entry: projected node coordinates tagged with the node index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a constructed graph, used to key memoized lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Routable street network.
///
/// Nodes are stored in a directed petgraph graph; two-way streets carry one
/// edge per direction. Node coordinates are indexed in an R-tree using an
/// equirectangular projection around the mean node latitude, so nearest
/// neighbour queries work in meters rather than degrees.
pub struct StreetGraph {
    id: GraphId,
    pub graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    cos_ref_lat: f64,
}

impl StreetGraph {
    pub fn new(graph: DiGraph<StreetNode, StreetEdge>) -> Self {
        let cos_ref_lat = reference_latitude(&graph).to_radians().cos();
        let rtree = RTree::bulk_load(
            graph
                .node_indices()
                .map(|idx| {
                    IndexedPoint::new(project(graph[idx].geometry, cos_ref_lat), idx)
                })
                .collect(),
        );

        Self {
            id: GraphId::next(),
            graph,
            rtree,
            cos_ref_lat,
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, node: NodeIndex) -> bool {
        node.index() < self.graph.node_count()
    }

    pub fn node_point(&self, node: NodeIndex) -> Option<Point<f64>> {
        self.graph.node_weight(node).map(|n| n.geometry)
    }

    /// Outgoing edges of `node`
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, StreetEdge, Directed> {
        self.graph.edges(node)
    }

    /// Nearest graph node to `point` (x = longitude, y = latitude)
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<NodeIndex> {
        self.rtree
            .nearest_neighbor(&project(*point, self.cos_ref_lat))
            .map(|entry| entry.data)
    }

    /// Reduce the graph to its largest connected component.
    ///
    /// Path queries between two nodes of the result can only fail because
    /// of edge direction, never because one endpoint sits on an island.
    pub fn largest_component(self, connectivity: Connectivity) -> Self {
        let components = match connectivity {
            Connectivity::Strong => petgraph::algo::tarjan_scc(&self.graph),
            Connectivity::Weak => weak_components(&self.graph),
        };

        let Some(largest) = components.into_iter().max_by_key(Vec::len) else {
            return self;
        };
        if largest.len() == self.graph.node_count() {
            return self;
        }

        log::debug!(
            "Keeping largest component: {} of {} nodes",
            largest.len(),
            self.graph.node_count()
        );

        let mut keep = FixedBitSet::with_capacity(self.graph.node_count());
        for node in &largest {
            keep.insert(node.index());
        }

        let graph = self.graph.filter_map(
            |idx, node| keep.contains(idx.index()).then(|| node.clone()),
            |_, edge| Some(edge.clone()),
        );
        Self::new(graph)
    }
}

impl fmt::Debug for StreetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreetGraph")
            .field("id", &self.id)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}

fn weak_components(graph: &DiGraph<StreetNode, StreetEdge>) -> Vec<Vec<NodeIndex>> {
    let mut sets = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut groups: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
    for node in graph.node_indices() {
        groups.entry(sets.find(node.index())).or_default().push(node);
    }
    groups.into_values().collect()
}

#[allow(clippy::cast_precision_loss)]
fn reference_latitude(graph: &DiGraph<StreetNode, StreetEdge>) -> f64 {
    if graph.node_count() == 0 {
        return 0.0;
    }
    let sum: f64 = graph.node_weights().map(|n| n.geometry.y()).sum();
    sum / graph.node_count() as f64
}

fn project(point: Point<f64>, cos_ref_lat: f64) -> [f64; 2] {
    [
        point.x().to_radians() * EARTH_RADIUS_M * cos_ref_lat,
        point.y().to_radians() * EARTH_RADIUS_M,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{StreetGraphBuilder, WayDirection};

    fn two_islands() -> StreetGraph {
        let mut builder = StreetGraphBuilder::new();
        // Main triangle
        builder.add_node(1, Point::new(29.000, 41.000));
        builder.add_node(2, Point::new(29.001, 41.000));
        builder.add_node(3, Point::new(29.001, 41.001));
        builder.add_way(&[1, 2, 3, 1], WayDirection::Both);
        // Detached pair
        builder.add_node(10, Point::new(29.010, 41.010));
        builder.add_node(11, Point::new(29.011, 41.010));
        builder.add_way(&[10, 11], WayDirection::Both);
        builder.build(false).unwrap()
    }

    #[test]
    fn largest_component_drops_islands() {
        let graph = two_islands();
        assert_eq!(graph.node_count(), 5);

        let reduced = graph.largest_component(Connectivity::Weak);
        assert_eq!(reduced.node_count(), 3);
        assert_eq!(reduced.edge_count(), 6);
        assert!(reduced.graph.node_weights().all(|n| n.id < 10));
    }

    #[test]
    fn strong_component_respects_one_way_edges() {
        let mut builder = StreetGraphBuilder::new();
        builder.add_node(1, Point::new(29.000, 41.000));
        builder.add_node(2, Point::new(29.001, 41.000));
        builder.add_node(3, Point::new(29.002, 41.000));
        builder.add_way(&[1, 2], WayDirection::Both);
        // Dead-end one way street: 3 can never be left again
        builder.add_way(&[2, 3], WayDirection::Forward);
        let graph = builder.build(false).unwrap();

        let weak = StreetGraph::new(graph.graph.clone()).largest_component(Connectivity::Weak);
        assert_eq!(weak.node_count(), 3);

        let strong = graph.largest_component(Connectivity::Strong);
        assert_eq!(strong.node_count(), 2);
    }

    #[test]
    fn nearest_node_uses_projected_distance() {
        let graph = two_islands();
        let near_third = graph
            .nearest_node(&Point::new(29.0011, 41.0012))
            .and_then(|idx| graph.graph.node_weight(idx))
            .map(|n| n.id);
        assert_eq!(near_third, Some(3));
    }

    #[test]
    fn every_graph_gets_a_fresh_id() {
        let a = two_islands();
        let b = two_islands();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn empty_graph_has_no_nearest_node() {
        let graph = StreetGraph::new(DiGraph::new());
        assert!(graph.is_empty());
        assert_eq!(graph.nearest_node(&Point::new(29.0, 41.0)), None);
    }
}
