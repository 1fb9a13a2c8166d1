//! Point of interest record

use std::fmt;

use geo::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Error, Meters, Mode};

/// A candidate point of interest.
///
/// Required fields (`latitude`, `longitude`, `subcategory`) are optional here
/// because records arrive from loosely typed upstream sources; a record
/// lacking one of them is rejected by [`Poi::validate`], never filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_route_distance_m: Option<Meters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_route_distance_m: Option<Meters>,
    /// Any additional columns of the source record, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Poi {
    pub fn new(latitude: f64, longitude: f64, subcategory: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            subcategory: Some(subcategory.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Coordinates as a `geo` point (x = longitude, y = latitude)
    pub fn point(&self) -> Option<Point<f64>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }

    pub fn route_distance(&self, mode: Mode) -> Option<Meters> {
        match mode {
            Mode::Drive => self.drive_route_distance_m,
            Mode::Walk => self.walk_route_distance_m,
        }
    }

    pub fn set_route_distance(&mut self, mode: Mode, distance: Meters) {
        match mode {
            Mode::Drive => self.drive_route_distance_m = Some(distance),
            Mode::Walk => self.walk_route_distance_m = Some(distance),
        }
    }

    /// Names of required fields this record lacks
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.latitude.is_none() {
            missing.push("latitude");
        }
        if self.longitude.is_none() {
            missing.push("longitude");
        }
        if self.subcategory.is_none() {
            missing.push("subcategory");
        }
        missing
    }

    /// # Errors
    ///
    /// Returns [`Error::DataIntegrity`] naming every missing required field.
    pub fn validate(&self) -> Result<(), Error> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::DataIntegrity {
                missing: missing.iter().join(", "),
            })
        }
    }

    /// Case-insensitive substring match of the subcategory against any of `wanted`
    pub fn matches_subcategory<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        if wanted.is_empty() {
            return true;
        }
        let Some(subcategory) = self.subcategory.as_deref() else {
            return false;
        };
        let subcategory = subcategory.to_lowercase();
        wanted
            .iter()
            .any(|tag| subcategory.contains(&tag.as_ref().to_lowercase()))
    }
}

/// A record rejected at a validation boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFault {
    pub name: Option<String>,
    pub missing: Vec<&'static str>,
}

impl DataFault {
    /// Returns a fault when `poi` lacks required fields
    pub fn check(poi: &Poi) -> Option<Self> {
        let missing = poi.missing_fields();
        (!missing.is_empty()).then(|| DataFault {
            name: poi.name.clone(),
            missing,
        })
    }
}

impl fmt::Display for DataFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "POI {} missing {}",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.missing.iter().join(", ")
        )
    }
}

/// A source record that could not be read as a [`Poi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position of the record in its batch
    pub position: usize,
    pub name: Option<String>,
    pub reason: String,
}

impl fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {} ({}) unreadable: {}",
            self.position,
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.reason
        )
    }
}

/// Decode loosely typed records one at a time.
///
/// A record with a wrongly typed field is rejected on its own; the rest of
/// the batch is kept in input order.
pub fn decode_records(
    records: impl IntoIterator<Item = serde_json::Value>,
) -> (Vec<Poi>, Vec<RejectedRecord>) {
    let mut pois = Vec::new();
    let mut rejected = Vec::new();
    for (position, record) in records.into_iter().enumerate() {
        let name = record
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        match serde_json::from_value::<Poi>(record) {
            Ok(poi) => pois.push(poi),
            Err(e) => rejected.push(RejectedRecord {
                position,
                name,
                reason: e.to_string(),
            }),
        }
    }
    (pois, rejected)
}
