use std::str::FromStr;

use poiroute_core::prelude::*;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::functions::{records_from_py, to_py, to_py_err};

/// RankingEngine
///
/// Ranks candidate places by street network distance from a user, separately
/// for driving and walking. Street networks are downloaded from an Overpass
/// API endpoint and kept in memory, so one engine should be created per
/// process and reused.
///
/// Example:
///
/// .. code-block:: python
///
///     engine = RankingEngine(modes=["walk"], max_workers=8)
///     top = engine.find_top_candidates(places, 41.0082, 28.9784, 1500, n=3)
///     top["walk"][0]["walk_route_distance_m"]
#[pyclass(name = "RankingEngine", frozen)]
pub struct PyRankingEngine {
    engine: RankingEngine,
}

#[pymethods]
impl PyRankingEngine {
    /// Parameters
    /// ----------
    /// config_path : str, optional
    ///     TOML file with engine settings; keyword arguments override it
    /// overpass_endpoint : str, optional
    ///     Overpass API interpreter URL
    /// modes : list[str], optional
    ///     Travel modes evaluated per call, any of ``"drive"`` and ``"walk"``
    /// max_workers : int, optional
    ///     Size of the routing worker pool
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     If the configuration is invalid
    #[new]
    #[pyo3(signature = (config_path=None, overpass_endpoint=None, modes=None, max_workers=None))]
    fn new(
        py: Python<'_>,
        config_path: Option<&str>,
        overpass_endpoint: Option<String>,
        modes: Option<Vec<String>>,
        max_workers: Option<usize>,
    ) -> PyResult<Self> {
        let mut config = match config_path {
            Some(path) => EngineConfig::from_path(path).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };
        if let Some(endpoint) = overpass_endpoint {
            config.overpass.endpoint = endpoint;
        }
        if let Some(modes) = modes {
            config.modes = modes
                .iter()
                .map(|mode| Mode::from_str(mode))
                .collect::<Result<_, _>>()
                .map_err(to_py_err)?;
        }
        if let Some(max_workers) = max_workers {
            config.max_workers = max_workers;
        }

        log::debug!("Creating ranking engine: {config:?}");
        let engine = py
            .detach(|| RankingEngine::with_overpass(config))
            .map_err(to_py_err)?;
        Ok(Self { engine })
    }

    /// Find the closest candidates by route distance for each travel mode
    ///
    /// Parameters
    /// ----------
    /// candidates : list[dict]
    ///     Records with ``latitude``, ``longitude`` and ``subcategory``; any
    ///     other keys are passed through. Unreadable records are skipped and
    ///     counted in ``stats()["data_faults"]``
    /// user_lat, user_lon : float
    ///     User location
    /// radius_m : float
    ///     Maximum route distance in meters
    /// n : int, default=5
    ///     Maximum number of candidates per mode
    /// subcategories : list[str], optional
    ///     Keep only records whose subcategory contains one of these
    ///
    /// Returns
    /// -------
    /// dict[str, list[dict]]
    ///     Mode name to candidates sorted by ``<mode>_route_distance_m``. A mode
    ///     whose network could not be loaded maps to an empty list.
    ///
    /// Notes
    /// -----
    /// The GIL is released while networks are built and routes computed.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (candidates, user_lat, user_lon, radius_m, n=5, subcategories=None))]
    fn find_top_candidates<'py>(
        &self,
        py: Python<'py>,
        candidates: &Bound<'py, PyList>,
        user_lat: f64,
        user_lon: f64,
        radius_m: f64,
        n: usize,
        subcategories: Option<Vec<String>>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let records = records_from_py(candidates)?;
        let request = RankRequest::new(user_lat, user_lon, radius_m, n)
            .with_subcategories(subcategories.unwrap_or_default());
        let ranked = py
            .detach(|| self.engine.rank_records(&request, records))
            .map_err(to_py_err)?;
        to_py(py, &ranked)
    }

    /// Cache and fault counters accumulated by this engine
    fn stats<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let stats = self.engine.stats();
        let dict = PyDict::new(py);
        dict.set_item("graph_cache_hits", stats.graph_cache.hits)?;
        dict.set_item("graph_cache_misses", stats.graph_cache.misses)?;
        dict.set_item("graph_cache_size", stats.graph_cache.len)?;
        dict.set_item("node_cache_hits", stats.node_cache.hits)?;
        dict.set_item("node_cache_misses", stats.node_cache.misses)?;
        dict.set_item("node_cache_size", stats.node_cache.len)?;
        dict.set_item("unavailable_modes", stats.unavailable_modes)?;
        dict.set_item("data_faults", stats.data_faults)?;
        Ok(dict)
    }

    #[getter]
    fn modes(&self) -> Vec<&'static str> {
        self.engine.config().modes.iter().map(|mode| mode.as_str()).collect()
    }

    fn __repr__(&self) -> String {
        let config = self.engine.config();
        format!(
            "RankingEngine(modes={:?}, max_workers={}, endpoint={:?})",
            self.modes(),
            config.max_workers,
            config.overpass.endpoint
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

