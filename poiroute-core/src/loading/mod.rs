//! This module is responsible for obtaining street networks: the provider
//! abstraction, graph construction from OSM-like data and the cached,
//! time-bounded graph access used by the engine.

mod builder;
mod graphs;
#[cfg(feature = "overpass")]
pub mod overpass;
mod provider;

pub use builder::{StreetGraphBuilder, WayDirection};
pub use graphs::GraphProvider;
#[cfg(feature = "overpass")]
pub use overpass::OverpassNetworkProvider;
pub use provider::{NetworkProvider, NetworkRequest};
