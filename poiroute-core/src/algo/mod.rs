//! Geometric algorithms independent of the street network

pub mod geodesy;
pub mod prefilter;

pub use geodesy::{BoundingBox, EARTH_RADIUS_M, haversine_distance};
pub use prefilter::{PrefilterOptions, prefilter};
