//! Travel modes and their graph construction parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Meters};

const WALK_DISTANCE_FACTOR: f64 = 1.5;
const WALK_MAX_DISTANCE: Meters = 2000.0;
const DRIVE_DISTANCE_FACTOR: f64 = 2.0;
const DRIVE_MAX_DISTANCE: Meters = 5000.0;

/// Which notion of connectivity is used when reducing a graph
/// to its largest component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Every node reaches every other node following edge directions
    Strong,
    /// Connected once edge directions are ignored
    Weak,
}

/// Transportation mode, determines which network and distance apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Drive,
    Walk,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Drive, Mode::Walk];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Drive => "drive",
            Mode::Walk => "walk",
        }
    }

    /// Radius of the network extract requested around the user.
    ///
    /// Pedestrian networks are denser, so walking uses a smaller area;
    /// driving is capped to bound construction cost.
    pub fn query_distance(self, radius_m: Meters) -> Meters {
        match self {
            Mode::Walk => (radius_m * WALK_DISTANCE_FACTOR).min(WALK_MAX_DISTANCE),
            Mode::Drive => (radius_m * DRIVE_DISTANCE_FACTOR).min(DRIVE_MAX_DISTANCE),
        }
    }

    /// Walking keeps every intermediate node to preserve path granularity
    pub fn simplify(self) -> bool {
        !matches!(self, Mode::Walk)
    }

    pub fn connectivity(self) -> Connectivity {
        match self {
            Mode::Drive => Connectivity::Strong,
            Mode::Walk => Connectivity::Weak,
        }
    }

    /// Name of the field carrying this mode's route distance
    pub fn distance_field(self) -> &'static str {
        match self {
            Mode::Drive => "drive_route_distance_m",
            Mode::Walk => "walk_route_distance_m",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(Mode::Drive),
            "walk" => Ok(Mode::Walk),
            other => Err(Error::InvalidInput(format!("unknown travel mode '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::walk_small(Mode::Walk, 500.0, 750.0)]
    #[case::walk_capped(Mode::Walk, 2000.0, 2000.0)]
    #[case::drive_small(Mode::Drive, 1000.0, 2000.0)]
    #[case::drive_capped(Mode::Drive, 4000.0, 5000.0)]
    fn query_distance_is_scaled_and_capped(
        #[case] mode: Mode,
        #[case] radius: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(mode.query_distance(radius), expected);
    }

    #[test]
    fn only_driving_is_simplified() {
        assert!(Mode::Drive.simplify());
        assert!(!Mode::Walk.simplify());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("DRIVE".parse::<Mode>().unwrap(), Mode::Drive);
        assert_eq!(" walk ".parse::<Mode>().unwrap(), Mode::Walk);
        assert!("default".parse::<Mode>().is_err());
    }
}
