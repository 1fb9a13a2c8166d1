use log::trace;
use rayon::prelude::*;

use crate::routing::RouteCalculator;
use crate::{Error, Meters, Mode, Poi, StreetGraph};

/// Fans route distance computations out over a bounded worker pool.
///
/// The pool is created once and reused by every request; a call never uses
/// more workers than it has candidates.
pub struct CandidateProcessor {
    pool: rayon::ThreadPool,
}

impl CandidateProcessor {
    /// # Errors
    ///
    /// Returns [`Error::ThreadPool`] when the worker threads cannot be spawned.
    pub fn new(max_workers: usize) -> Result<Self, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .thread_name(|i| format!("poiroute-worker-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn max_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Candidates reachable within `radius_m`, each carrying its route
    /// distance for `mode`, in input order
    #[allow(clippy::too_many_arguments)]
    pub fn rank_for_mode(
        &self,
        calculator: &RouteCalculator,
        graph: &StreetGraph,
        candidates: &[Poi],
        user_lat: f64,
        user_lon: f64,
        radius_m: Meters,
        mode: Mode,
    ) -> Vec<Poi> {
        if candidates.is_empty() {
            return Vec::new();
        }

        self.pool.install(|| {
            candidates
                .par_iter()
                .with_max_len(1)
                .filter_map(|poi| {
                    let (Some(lat), Some(lon)) = (poi.latitude, poi.longitude) else {
                        trace!("Skipping {:?}: no coordinates", poi.name);
                        return None;
                    };

                    let distance = calculator.route_distance(graph, user_lat, user_lon, lat, lon);
                    if !distance.is_finite() || distance > radius_m {
                        trace!("Excluding {:?} for {mode}: {distance:.1} m", poi.name);
                        return None;
                    }

                    let mut ranked = poi.clone();
                    ranked.set_route_distance(mode, distance);
                    Some(ranked)
                })
                .collect()
        })
    }
}
