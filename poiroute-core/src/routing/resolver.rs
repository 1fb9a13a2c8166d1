use std::sync::Arc;

use geo::Point;

use crate::cache::{CacheStats, NodeCache, NodeKey};
use crate::{StreetGraph, StreetNodeId};

/// Maps coordinates to their nearest graph node, memoizing the answers.
///
/// The user location and popular POIs are looked up again and again across
/// candidates and requests, so results are kept per `(graph, lat, lon)`.
#[derive(Debug, Clone)]
pub struct NodeResolver {
    cache: Arc<NodeCache>,
}

impl NodeResolver {
    pub fn new(cache: Arc<NodeCache>) -> Self {
        Self { cache }
    }

    pub fn nearest_node(&self, graph: &StreetGraph, lat: f64, lon: f64) -> Option<StreetNodeId> {
        let key = NodeKey::new(graph.id(), lat, lon);
        if let Some(node) = self.cache.get(&key) {
            return Some(node);
        }
        let node = graph.nearest_node(&Point::new(lon, lat))?;
        Some(self.cache.get_or_insert(key, node))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;
    use crate::loading::{StreetGraphBuilder, WayDirection};

    fn line() -> StreetGraph {
        let mut builder = StreetGraphBuilder::new();
        builder.add_node(1, Point::new(29.000, 41.0));
        builder.add_node(2, Point::new(29.002, 41.0));
        builder.add_way(&[1, 2], WayDirection::Both);
        builder.build(false).unwrap()
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let resolver = NodeResolver::new(Arc::new(SharedCache::new(16)));
        let graph = line();

        let first = resolver.nearest_node(&graph, 41.0, 29.0019);
        let second = resolver.nearest_node(&graph, 41.0, 29.0019);
        assert_eq!(first, second);
        assert_eq!(first.map(|idx| graph.graph[idx].id), Some(2));

        let stats = resolver.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn lookups_are_scoped_to_their_graph() {
        let resolver = NodeResolver::new(Arc::new(SharedCache::new(16)));
        let a = line();
        let b = line();
        resolver.nearest_node(&a, 41.0, 29.0);
        resolver.nearest_node(&b, 41.0, 29.0);
        assert_eq!(resolver.cache_stats().len, 2);
    }
}
