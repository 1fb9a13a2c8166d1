//! Engine configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::algo::PrefilterOptions;
use crate::algo::prefilter::{DEFAULT_BUFFER_FACTOR, DEFAULT_HAVERSINE_THRESHOLD};
use crate::cache::{DEFAULT_GRAPH_CACHE_CAPACITY, DEFAULT_NODE_CACHE_CAPACITY};
use crate::{Error, Mode};

pub const DEFAULT_MAX_WORKERS: usize = 32;
const DEFAULT_GRAPH_BUILD_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PATH_SEARCH_TIMEOUT_MS: u64 = 5_000;

/// Settings of a [`RankingEngine`](crate::RankingEngine).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// modes = ["walk"]
/// max_workers = 8
///
/// [overpass]
/// endpoint = "https://overpass.example.org/api/interpreter"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Modes evaluated when a request does not name any
    pub modes: Vec<Mode>,
    pub graph_cache_capacity: usize,
    pub node_cache_capacity: usize,
    /// Size of the shared worker pool used for per-candidate routing
    pub max_workers: usize,
    /// Candidate count above which the great-circle prefilter runs
    pub prefilter_threshold: usize,
    pub buffer_factor: f64,
    /// Upper bound on one network construction; `0` disables the limit
    pub graph_build_timeout_secs: u64,
    /// Upper bound on one shortest path search; `0` disables the limit
    pub path_search_timeout_ms: u64,
    pub overpass: OverpassConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            modes: Mode::ALL.to_vec(),
            graph_cache_capacity: DEFAULT_GRAPH_CACHE_CAPACITY,
            node_cache_capacity: DEFAULT_NODE_CACHE_CAPACITY,
            max_workers: DEFAULT_MAX_WORKERS,
            prefilter_threshold: DEFAULT_HAVERSINE_THRESHOLD,
            buffer_factor: DEFAULT_BUFFER_FACTOR,
            graph_build_timeout_secs: DEFAULT_GRAPH_BUILD_TIMEOUT_SECS,
            path_search_timeout_ms: DEFAULT_PATH_SEARCH_TIMEOUT_MS,
            overpass: OverpassConfig::default(),
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), Error> {
        if self.modes.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one travel mode is required".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if !self.buffer_factor.is_finite() || self.buffer_factor < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "buffer_factor must be a finite value >= 1, got {}",
                self.buffer_factor
            )));
        }
        Ok(())
    }

    pub fn graph_build_timeout(&self) -> Option<Duration> {
        (self.graph_build_timeout_secs > 0)
            .then(|| Duration::from_secs(self.graph_build_timeout_secs))
    }

    pub fn path_search_timeout(&self) -> Option<Duration> {
        (self.path_search_timeout_ms > 0)
            .then(|| Duration::from_millis(self.path_search_timeout_ms))
    }

    pub fn prefilter_options(&self, subcategories: &[String]) -> PrefilterOptions {
        PrefilterOptions {
            buffer_factor: self.buffer_factor,
            haversine_threshold: self.prefilter_threshold,
            subcategories: subcategories.to_vec(),
        }
    }
}

/// Connection settings for the Overpass network source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            request_timeout_secs: 180,
            user_agent: concat!("poiroute/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
