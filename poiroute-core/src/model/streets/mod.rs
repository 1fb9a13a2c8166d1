//! Routable street network model

pub mod components;
pub mod network;

pub use components::{OsmNodeId, StreetEdge, StreetNode};
pub use network::{GraphId, IndexedPoint, StreetGraph};
