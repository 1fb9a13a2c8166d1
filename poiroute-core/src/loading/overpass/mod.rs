//! Overpass API network source.

mod dto;
mod http_source;

pub use http_source::OverpassNetworkProvider;
