//! Data model for candidate ranking
//!
//! Contains POI records, travel modes, ranking results and the street
//! network representation used for routing.

pub mod mode;
pub mod poi;
pub mod ranked;
pub mod streets;

pub use mode::{Connectivity, Mode};
pub use poi::{DataFault, Poi, RejectedRecord, decode_records};
pub use ranked::RankedCandidates;
pub use streets::{GraphId, StreetEdge, StreetGraph, StreetNode};
