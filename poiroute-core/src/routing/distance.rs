use std::time::{Duration, Instant};

use super::astar::{SearchOutcome, astar_path_length};
use super::resolver::NodeResolver;
use crate::{Meters, StreetGraph};

/// Network distance between two coordinates on one graph.
///
/// Unreachability is a value: every failure mode (no nearby node, no path,
/// search timeout) yields `f64::INFINITY`.
#[derive(Debug, Clone)]
pub struct RouteCalculator {
    resolver: NodeResolver,
    search_timeout: Option<Duration>,
}

impl RouteCalculator {
    pub fn new(resolver: NodeResolver, search_timeout: Option<Duration>) -> Self {
        Self {
            resolver,
            search_timeout,
        }
    }

    pub fn resolver(&self) -> &NodeResolver {
        &self.resolver
    }

    pub fn route_distance(
        &self,
        graph: &StreetGraph,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Meters {
        let origin = self.resolver.nearest_node(graph, origin_lat, origin_lon);
        let destination = self.resolver.nearest_node(graph, dest_lat, dest_lon);
        let (Some(origin), Some(destination)) = (origin, destination) else {
            return f64::INFINITY;
        };
        if !graph.contains_node(origin) || !graph.contains_node(destination) {
            return f64::INFINITY;
        }
        if origin == destination {
            return 0.0;
        }

        let deadline = self.search_timeout.map(|timeout| Instant::now() + timeout);
        let outcome = astar_path_length(graph, origin, destination, deadline);
        if outcome == SearchOutcome::TimedOut {
            log::warn!(
                "Route search to ({dest_lat}, {dest_lon}) timed out after {:?}",
                self.search_timeout.unwrap_or_default()
            );
        }
        outcome.length()
    }
}
