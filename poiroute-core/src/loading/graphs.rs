//! Cached access to per-mode street graphs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use log::{debug, info, warn};

use super::provider::{NetworkProvider, NetworkRequest};
use crate::cache::{CacheStats, GraphCache, GraphKey};
use crate::{Error, Meters, Mode, StreetGraph};

/// Builds street graphs through a [`NetworkProvider`] and keeps the results
/// in a bounded cache keyed by `(center, radius, mode)`.
///
/// Provider failures and timeouts are reported as `None`: the mode cannot be
/// evaluated, but the caller carries on with other modes.
pub struct GraphProvider {
    source: Arc<dyn NetworkProvider>,
    cache: Arc<GraphCache>,
    build_timeout: Option<Duration>,
    unavailable: AtomicU64,
}

impl GraphProvider {
    pub fn new(
        source: Arc<dyn NetworkProvider>,
        cache: Arc<GraphCache>,
        build_timeout: Option<Duration>,
    ) -> Self {
        Self {
            source,
            cache,
            build_timeout,
            unavailable: AtomicU64::new(0),
        }
    }

    pub fn get_graph(
        &self,
        center_lat: f64,
        center_lon: f64,
        radius_m: Meters,
        mode: Mode,
    ) -> Option<Arc<StreetGraph>> {
        let key = GraphKey::new(center_lat, center_lon, radius_m, mode);
        if let Some(graph) = self.cache.get(&key) {
            debug!("Returning cached {mode} graph");
            return Some(graph);
        }

        let request = NetworkRequest::for_mode(center_lat, center_lon, radius_m, mode);
        info!(
            "Building {mode} network graph ({:.0} m around {:.5}, {:.5})",
            request.distance_m, center_lat, center_lon
        );
        let started = Instant::now();

        let graph = match self.build(request) {
            Ok(graph) => graph.largest_component(mode.connectivity()),
            Err(e) => {
                warn!("Failed to retrieve the network graph for {mode}: {e}");
                self.unavailable.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        if graph.is_empty() {
            warn!("Network graph for {mode} has no routable nodes");
            self.unavailable.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        debug!(
            "{mode} graph ready in {:?}: {} nodes, {} edges",
            started.elapsed(),
            graph.node_count(),
            graph.edge_count()
        );
        Some(self.cache.get_or_insert(key, Arc::new(graph)))
    }

    /// Number of requests for which no graph could be produced
    pub fn unavailable_count(&self) -> u64 {
        self.unavailable.load(Ordering::Relaxed)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn build(&self, request: NetworkRequest) -> Result<StreetGraph, Error> {
        let Some(timeout) = self.build_timeout else {
            return self.source.build_graph(&request);
        };

        // The helper thread is left to finish on its own after a timeout;
        // its result is dropped with the channel.
        let (tx, rx) = crossbeam_channel::bounded(1);
        let source = Arc::clone(&self.source);
        thread::Builder::new()
            .name(format!("graph-build-{}", request.mode))
            .spawn(move || {
                let _ = tx.send(source.build_graph(&request));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Provider(
                "graph construction thread terminated without a result".to_string(),
            )),
        }
    }
}
