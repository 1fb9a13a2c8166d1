//! DTOs for decoding Overpass JSON responses.
//!
//! The response is decoded into these transport types first, then fed into a
//! [`StreetGraphBuilder`] in one pass.

use std::collections::BTreeMap;

use geo::Point;
use serde::Deserialize;

use crate::Mode;
use crate::loading::{StreetGraphBuilder, WayDirection};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(super) enum OverpassElementDto {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    #[serde(other)]
    Other,
}

impl OverpassResponseDto {
    pub(super) fn into_builder(self, mode: Mode) -> Result<StreetGraphBuilder, String> {
        let mut builder = StreetGraphBuilder::new();
        for element in self.elements {
            match element {
                OverpassElementDto::Node { id, lat, lon } => {
                    if !lat.is_finite() || !lon.is_finite() {
                        return Err(format!("node {id} includes non-finite coordinates"));
                    }
                    builder.add_node(id, Point::new(lon, lat));
                }
                OverpassElementDto::Way { nodes, tags } => {
                    builder.add_way(&nodes, way_direction(&tags, mode));
                }
                OverpassElementDto::Other => {}
            }
        }
        Ok(builder)
    }
}

/// Pedestrians may walk one-way streets in both directions
fn way_direction(tags: &BTreeMap<String, String>, mode: Mode) -> WayDirection {
    if mode == Mode::Walk {
        return WayDirection::Both;
    }
    match tags.get("oneway").map(String::as_str) {
        Some("yes" | "true" | "1") => WayDirection::Forward,
        Some("-1" | "reverse") => WayDirection::Backward,
        Some(_) => WayDirection::Both,
        None if tags.get("junction").is_some_and(|j| j == "roundabout") => WayDirection::Forward,
        None => WayDirection::Both,
    }
}
