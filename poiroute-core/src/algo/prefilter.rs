//! Cheap coordinate filters applied before any routing work.
//!
//! Road distance is never shorter than straight-line distance, so dropping
//! candidates outside a box of `radius_m` cannot lose a reachable result.
//! For large inputs a great-circle filter with a buffered radius runs first;
//! in typical street grids road distance stays within about 1.5x of the
//! straight line, which is the default buffer.

use geo::Point;
use serde::{Deserialize, Serialize};

use super::geodesy::{BoundingBox, haversine_distance};
use crate::{Meters, Poi};

pub const DEFAULT_BUFFER_FACTOR: f64 = 1.5;
pub const DEFAULT_HAVERSINE_THRESHOLD: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefilterOptions {
    /// Multiplier applied to the radius for the great-circle filter
    pub buffer_factor: f64,
    /// Candidate count above which the great-circle filter is applied
    pub haversine_threshold: usize,
    /// Requested subcategories; empty means any
    pub subcategories: Vec<String>,
}

impl Default for PrefilterOptions {
    fn default() -> Self {
        Self {
            buffer_factor: DEFAULT_BUFFER_FACTOR,
            haversine_threshold: DEFAULT_HAVERSINE_THRESHOLD,
            subcategories: Vec::new(),
        }
    }
}

/// Shrink the candidate set before routing. Input order is preserved and
/// records without coordinates are dropped.
pub fn prefilter(
    candidates: &[Poi],
    user_lat: f64,
    user_lon: f64,
    radius_m: Meters,
    options: &PrefilterOptions,
) -> Vec<Poi> {
    let user = Point::new(user_lon, user_lat);

    let nearby: Vec<&Poi> = if candidates.len() > options.haversine_threshold {
        let max_distance = radius_m * options.buffer_factor;
        let kept: Vec<&Poi> = candidates
            .iter()
            .filter(|poi| {
                poi.point()
                    .is_some_and(|p| haversine_distance(user, p) <= max_distance)
            })
            .collect();
        log::debug!(
            "Pre-filtered from {} to {} candidates",
            candidates.len(),
            kept.len()
        );
        kept
    } else {
        candidates.iter().collect()
    };

    let bbox = BoundingBox::around(user_lat, user_lon, radius_m);
    nearby
        .into_iter()
        .filter(|poi| match (poi.latitude, poi.longitude) {
            (Some(lat), Some(lon)) => bbox.contains(lat, lon),
            _ => false,
        })
        .filter(|poi| poi.matches_subcategory(&options.subcategories))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_LAT: f64 = 41.0;
    const USER_LON: f64 = 29.0;

    /// Points fanned out north-east of the user, `step` meters apart
    fn fan(count: usize, step: f64) -> Vec<Poi> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = (i as f64 * step / 6_371_000.0).to_degrees();
                Poi::new(USER_LAT + offset, USER_LON + offset, "cafe").with_name(format!("p{i}"))
            })
            .collect()
    }

    #[test]
    fn small_inputs_only_use_the_bounding_box() {
        let candidates = fan(10, 300.0);
        let kept = prefilter(&candidates, USER_LAT, USER_LON, 1000.0, &PrefilterOptions::default());
        // Both axes are checked independently, so diagonal points up to
        // about sqrt(2) * radius survive
        assert!(kept.len() < candidates.len());
        assert!(kept.iter().all(|p| {
            BoundingBox::around(USER_LAT, USER_LON, 1000.0)
                .contains(p.latitude.unwrap(), p.longitude.unwrap())
        }));
    }

    #[test]
    fn large_inputs_respect_buffered_great_circle_radius() {
        let candidates = fan(120, 50.0);
        let options = PrefilterOptions::default();
        let radius = 1000.0;
        let kept = prefilter(&candidates, USER_LAT, USER_LON, radius, &options);

        assert!(!kept.is_empty());
        let user = Point::new(USER_LON, USER_LAT);
        for poi in &kept {
            let d = haversine_distance(user, poi.point().unwrap());
            assert!(d <= radius * options.buffer_factor, "{d} beyond buffer");
        }
    }

    #[test]
    fn keeps_input_order() {
        let mut candidates = fan(5, 100.0);
        candidates.reverse();
        let kept = prefilter(&candidates, USER_LAT, USER_LON, 2000.0, &PrefilterOptions::default());
        let names: Vec<_> = kept.iter().map(|p| p.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["p4", "p3", "p2", "p1", "p0"]);
    }

    #[test]
    fn filters_by_subcategory_and_drops_records_without_coordinates() {
        let candidates = vec![
            Poi::new(USER_LAT, USER_LON, "Italian Restaurant"),
            Poi::new(USER_LAT, USER_LON, "cafe"),
            Poi {
                subcategory: Some("restaurant".into()),
                ..Poi::default()
            },
        ];
        let options = PrefilterOptions {
            subcategories: vec!["RESTAURANT".into()],
            ..PrefilterOptions::default()
        };
        let kept = prefilter(&candidates, USER_LAT, USER_LON, 500.0, &options);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].subcategory.as_deref(), Some("Italian Restaurant"));
    }
}
