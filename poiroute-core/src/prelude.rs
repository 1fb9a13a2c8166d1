// Re-export key components
pub use crate::algo::{BoundingBox, PrefilterOptions, haversine_distance, prefilter};
pub use crate::cache::{CacheStats, GraphCache, NodeCache};
pub use crate::config::{EngineConfig, OverpassConfig};
pub use crate::loading::{
    GraphProvider, NetworkProvider, NetworkRequest, StreetGraphBuilder, WayDirection,
};
#[cfg(feature = "overpass")]
pub use crate::loading::OverpassNetworkProvider;
pub use crate::model::{
    DataFault, Mode, Poi, RankedCandidates, RejectedRecord, StreetGraph, decode_records,
};
pub use crate::ranking::{EngineStats, RankRequest, RankingEngine, select_top_n};
pub use crate::routing::{NodeResolver, RouteCalculator};

// Core scalar types
pub use crate::Error;
pub use crate::Meters;
pub use crate::StreetNodeId;
