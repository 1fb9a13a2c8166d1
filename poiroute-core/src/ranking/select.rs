use crate::model::DataFault;
use crate::{Mode, Poi};

/// Outcome of selecting the top candidates for one mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub kept: Vec<Poi>,
    /// Records rejected because they lack required fields
    pub faults: Vec<DataFault>,
}

/// Sort survivors by their `mode` route distance and keep the first `n` valid
/// records.
///
/// The sort is stable, so equal distances keep their input order. Every
/// survivor is validated, not only the first `n`; invalid ones are reported
/// in [`Selection::faults`] and never emitted.
pub fn select_top_n(mut survivors: Vec<Poi>, mode: Mode, n: usize) -> Selection {
    let distance = |poi: &Poi| poi.route_distance(mode).unwrap_or(f64::INFINITY);
    survivors.sort_by(|a, b| distance(a).total_cmp(&distance(b)));

    let mut selection = Selection {
        kept: Vec::with_capacity(n.min(survivors.len())),
        faults: Vec::new(),
    };
    for poi in survivors {
        if let Some(fault) = DataFault::check(&poi) {
            log::warn!("Rejecting {mode} candidate: {fault}");
            selection.faults.push(fault);
        } else if selection.kept.len() < n {
            selection.kept.push(poi);
        }
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(name: &str, distance: f64) -> Poi {
        let mut poi = Poi::new(41.0, 29.0, "cafe").with_name(name);
        poi.set_route_distance(Mode::Walk, distance);
        poi
    }

    fn names(pois: &[Poi]) -> Vec<&str> {
        pois.iter().filter_map(|p| p.name.as_deref()).collect()
    }

    #[test]
    fn sorts_ascending_and_truncates() {
        let survivors = vec![ranked("c", 300.0), ranked("a", 100.0), ranked("b", 200.0)];
        let selection = select_top_n(survivors, Mode::Walk, 2);
        assert_eq!(names(&selection.kept), vec!["a", "b"]);
        assert!(selection.faults.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let survivors = vec![ranked("first", 50.0), ranked("second", 50.0), ranked("third", 10.0)];
        let selection = select_top_n(survivors, Mode::Walk, 3);
        assert_eq!(names(&selection.kept), vec!["third", "first", "second"]);
    }

    #[test]
    fn invalid_records_are_reported_not_emitted() {
        let mut broken = ranked("broken", 5.0);
        broken.subcategory = None;
        let survivors = vec![broken, ranked("ok", 10.0)];

        let selection = select_top_n(survivors, Mode::Walk, 5);
        assert_eq!(names(&selection.kept), vec!["ok"]);
        assert_eq!(selection.faults.len(), 1);
        assert_eq!(selection.faults[0].missing, vec!["subcategory"]);
    }

    #[test]
    fn zero_n_keeps_nothing() {
        let selection = select_top_n(vec![ranked("a", 1.0)], Mode::Walk, 0);
        assert!(selection.kept.is_empty());
    }
}
