//! Spherical earth helpers

use geo::Point;

use crate::Meters;

/// Mean earth radius used by every distance approximation in the crate
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points (x = lon, y = lat)
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> Meters {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Axis aligned lat/lon rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Approximate box around a center using an equirectangular projection
    pub fn around(lat: f64, lon: f64, radius_m: Meters) -> Self {
        let delta_lat = (radius_m / EARTH_RADIUS_M).to_degrees();
        let delta_lon = delta_lat / lat.to_radians().cos();
        Self {
            min_lat: lat - delta_lat,
            max_lat: lat + delta_lat,
            min_lon: lon - delta_lon,
            max_lon: lon + delta_lon,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn haversine_matches_known_distance() {
        // One degree of latitude
        let d = haversine_distance(Point::new(29.0, 41.0), Point::new(29.0, 42.0));
        assert_relative_eq!(d, 111_194.93, epsilon = 0.1);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let p = Point::new(29.0, 41.0);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn bounding_box_widens_longitude_with_latitude() {
        let bbox = BoundingBox::around(60.0, 10.0, 1000.0);
        let dlat = bbox.max_lat - 60.0;
        let dlon = bbox.max_lon - 10.0;
        assert_relative_eq!(dlon, dlat * 2.0, max_relative = 1e-9);
        assert!(bbox.contains(60.0, 10.0));
        assert!(bbox.contains(bbox.max_lat, bbox.min_lon));
        assert!(!bbox.contains(bbox.max_lat + 1e-9, 10.0));
    }
}
