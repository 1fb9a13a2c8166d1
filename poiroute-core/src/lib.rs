//! Geospatial candidate ranking over routable street networks.
//!
//! Given a user location, a search radius and a list of candidate points of
//! interest, the engine builds (or reuses) a street graph per travel mode,
//! computes network distances to every candidate in parallel and returns the
//! closest ones per mode.

pub mod algo;
pub mod cache;
pub mod config;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod ranking;
pub mod routing;

pub use config::EngineConfig;
pub use error::Error;
pub use model::{Mode, Poi, RankedCandidates, StreetGraph};
pub use ranking::{RankRequest, RankingEngine};

/// Index of a node inside a [`StreetGraph`]
pub type StreetNodeId = petgraph::graph::NodeIndex;
/// Physical length in meters
pub type Meters = f64;
