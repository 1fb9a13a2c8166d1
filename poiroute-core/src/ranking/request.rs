use serde::{Deserialize, Serialize};

use crate::{Error, Meters, Mode};

/// Parameters of one ranking call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    pub user_lat: f64,
    pub user_lon: f64,
    pub radius_m: Meters,
    /// Maximum number of candidates returned per mode
    pub n: usize,
    /// Modes to evaluate; `None` uses the engine's configured modes
    #[serde(default)]
    pub modes: Option<Vec<Mode>>,
    /// Subcategories to keep; empty keeps every candidate
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl RankRequest {
    pub fn new(user_lat: f64, user_lon: f64, radius_m: Meters, n: usize) -> Self {
        Self {
            user_lat,
            user_lon,
            radius_m,
            n,
            modes: None,
            subcategories: Vec::new(),
        }
    }

    pub fn with_modes(mut self, modes: &[Mode]) -> Self {
        self.modes = Some(modes.to_vec());
        self
    }

    pub fn with_subcategories<S: Into<String>>(mut self, subcategories: impl IntoIterator<Item = S>) -> Self {
        self.subcategories = subcategories.into_iter().map(Into::into).collect();
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for coordinates outside WGS84 ranges,
    /// non-finite values, a non-positive radius or an empty mode list.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.user_lat.is_finite() || !(-90.0..=90.0).contains(&self.user_lat) {
            return Err(Error::InvalidInput(format!(
                "user latitude {} outside [-90, 90]",
                self.user_lat
            )));
        }
        if !self.user_lon.is_finite() || !(-180.0..=180.0).contains(&self.user_lon) {
            return Err(Error::InvalidInput(format!(
                "user longitude {} outside [-180, 180]",
                self.user_lon
            )));
        }
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_m
            )));
        }
        if self.modes.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::InvalidInput(
                "at least one travel mode must be requested".to_string(),
            ));
        }
        Ok(())
    }
}
