//! Street network components - nodes and edges

use geo::{LineString, Point};

use crate::Meters;

/// OpenStreetMap node identifier
pub type OsmNodeId = i64;

/// Street graph node (network intersection or path vertex)
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// OSM ID of the node
    pub id: OsmNodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Physical length of the segment in meters
    pub length: Meters,
    /// Segment geometry, more than two points when the edge was simplified
    pub geometry: LineString<f64>,
}

impl StreetEdge {
    pub fn length(&self) -> Meters {
        self.length
    }
}
