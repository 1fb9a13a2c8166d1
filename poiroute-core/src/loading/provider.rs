use geo::Point;

use crate::{Error, Meters, Mode, StreetGraph};

/// Parameters of one network extract
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRequest {
    /// Center of the extract (x = longitude, y = latitude)
    pub center: Point<f64>,
    /// Radius of the extract in meters
    pub distance_m: Meters,
    /// Network type to download
    pub mode: Mode,
    /// Collapse interstitial nodes into single edges
    pub simplify: bool,
}

impl NetworkRequest {
    /// Request sized for a ranking query of `radius_m` around a user
    pub fn for_mode(center_lat: f64, center_lon: f64, radius_m: Meters, mode: Mode) -> Self {
        Self {
            center: Point::new(center_lon, center_lat),
            distance_m: mode.query_distance(radius_m),
            mode,
            simplify: mode.simplify(),
        }
    }
}

/// Source of routable street networks, typically backed by OpenStreetMap
pub trait NetworkProvider: Send + Sync {
    /// # Errors
    ///
    /// Any error means the network for this request could not be produced.
    fn build_graph(&self, request: &NetworkRequest) -> Result<StreetGraph, Error>;
}
