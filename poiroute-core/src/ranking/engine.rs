//! Entry point tying prefiltering, graph access, routing and selection together

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};

use super::processor::CandidateProcessor;
use super::request::RankRequest;
use super::select::select_top_n;
use crate::algo::prefilter;
use crate::cache::{CacheStats, GraphCache, NodeCache};
use crate::loading::{GraphProvider, NetworkProvider};
use crate::model::{DataFault, decode_records};
use crate::routing::{NodeResolver, RouteCalculator};
use crate::{EngineConfig, Error, Meters, Mode, Poi, RankedCandidates};

/// Counters describing what an engine has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub graph_cache: CacheStats,
    pub node_cache: CacheStats,
    /// Mode evaluations skipped because no graph could be produced
    pub unavailable_modes: u64,
    /// Records rejected for missing required fields or unreadable values
    pub data_faults: u64,
}

/// Ranks candidate POIs by network distance from a user, per travel mode.
///
/// Holds the graph and node caches plus the worker pool, so one engine is
/// meant to live for the whole process and serve concurrent requests.
pub struct RankingEngine {
    config: EngineConfig,
    graphs: GraphProvider,
    calculator: RouteCalculator,
    processor: CandidateProcessor,
    data_faults: AtomicU64,
}

impl RankingEngine {
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker pool
    /// cannot be created.
    pub fn new(source: Arc<dyn NetworkProvider>, config: EngineConfig) -> Result<Self, Error> {
        let graph_cache = Arc::new(GraphCache::new(config.graph_cache_capacity));
        let node_cache = Arc::new(NodeCache::new(config.node_cache_capacity));
        Self::with_caches(source, config, graph_cache, node_cache)
    }

    /// Build an engine around existing caches, e.g. to share them between
    /// engines using different providers
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker pool
    /// cannot be created.
    pub fn with_caches(
        source: Arc<dyn NetworkProvider>,
        config: EngineConfig,
        graph_cache: Arc<GraphCache>,
        node_cache: Arc<NodeCache>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let graphs = GraphProvider::new(source, graph_cache, config.graph_build_timeout());
        let calculator = RouteCalculator::new(
            NodeResolver::new(node_cache),
            config.path_search_timeout(),
        );
        let processor = CandidateProcessor::new(config.max_workers)?;

        Ok(Self {
            config,
            graphs,
            calculator,
            processor,
            data_faults: AtomicU64::new(0),
        })
    }

    /// Engine downloading networks from the configured Overpass endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the Overpass client or the engine cannot be built.
    #[cfg(feature = "overpass")]
    pub fn with_overpass(config: EngineConfig) -> Result<Self, Error> {
        let source = Arc::new(crate::loading::OverpassNetworkProvider::new(&config.overpass)?);
        Self::new(source, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Top `n` candidates per configured mode within `radius_m` of the user.
    ///
    /// # Errors
    ///
    /// Only malformed arguments are errors. Failures local to one mode or one
    /// candidate shrink the result instead.
    pub fn find_top_candidates(
        &self,
        candidates: &[Poi],
        user_lat: f64,
        user_lon: f64,
        radius_m: Meters,
        n: usize,
    ) -> Result<RankedCandidates, Error> {
        self.rank(&RankRequest::new(user_lat, user_lon, radius_m, n), candidates)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the request is malformed.
    pub fn rank(&self, request: &RankRequest, candidates: &[Poi]) -> Result<RankedCandidates, Error> {
        request.validate()?;
        let modes: Vec<Mode> = request
            .modes
            .as_deref()
            .unwrap_or(&self.config.modes)
            .iter()
            .copied()
            .unique()
            .collect();

        if candidates.is_empty() {
            info!("No candidates found");
            return Ok(RankedCandidates::empty(&modes));
        }

        let started = Instant::now();
        let valid: Vec<Poi> = candidates
            .iter()
            .filter(|poi| match DataFault::check(poi) {
                Some(fault) => {
                    self.report(&fault);
                    false
                }
                None => true,
            })
            .cloned()
            .collect();

        let options = self.config.prefilter_options(&request.subcategories);
        let candidates = prefilter(
            &valid,
            request.user_lat,
            request.user_lon,
            request.radius_m,
            &options,
        );

        let mut result = RankedCandidates::empty(&modes);
        if candidates.is_empty() {
            info!("No candidates left after prefiltering");
            return Ok(result);
        }

        for mode in modes {
            let Some(graph) =
                self.graphs
                    .get_graph(request.user_lat, request.user_lon, request.radius_m, mode)
            else {
                warn!("Failed to retrieve the network graph for {mode}. Skipping.");
                continue;
            };

            let mode_started = Instant::now();
            let survivors = self.processor.rank_for_mode(
                &self.calculator,
                &graph,
                &candidates,
                request.user_lat,
                request.user_lon,
                request.radius_m,
                mode,
            );
            let selection = select_top_n(survivors, mode, request.n);
            for fault in &selection.faults {
                self.data_faults.fetch_add(1, Ordering::Relaxed);
                debug!("Counted data fault for {mode}: {fault}");
            }
            debug!(
                "{mode}: {} of {} candidates kept in {:?}",
                selection.kept.len(),
                candidates.len(),
                mode_started.elapsed()
            );
            result.insert(mode, selection.kept);
        }

        debug!("Ranking finished in {:?}", started.elapsed());
        Ok(result)
    }

    /// Like [`rank`](Self::rank), for records that still have to be decoded.
    ///
    /// Unreadable records are reported as data faults and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the request is malformed.
    pub fn rank_records(
        &self,
        request: &RankRequest,
        records: Vec<serde_json::Value>,
    ) -> Result<RankedCandidates, Error> {
        request.validate()?;
        let (candidates, rejected) = decode_records(records);
        for record in &rejected {
            warn!("Skipping candidate: {record}");
            self.data_faults.fetch_add(1, Ordering::Relaxed);
        }
        self.rank(request, &candidates)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            graph_cache: self.graphs.cache_stats(),
            node_cache: self.calculator.resolver().cache_stats(),
            unavailable_modes: self.graphs.unavailable_count(),
            data_faults: self.data_faults.load(Ordering::Relaxed),
        }
    }

    fn report(&self, fault: &DataFault) {
        warn!("Skipping candidate: {fault}");
        self.data_faults.fetch_add(1, Ordering::Relaxed);
    }
}
