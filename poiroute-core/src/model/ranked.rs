use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Mode, Poi};

/// Top candidates per travel mode, each list ascending by that mode's
/// route distance. Every requested mode has a key, possibly with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedCandidates {
    by_mode: BTreeMap<Mode, Vec<Poi>>,
}

impl RankedCandidates {
    /// Result with an empty list for each of `modes`
    pub fn empty(modes: &[Mode]) -> Self {
        Self {
            by_mode: modes.iter().map(|&mode| (mode, Vec::new())).collect(),
        }
    }

    pub fn insert(&mut self, mode: Mode, pois: Vec<Poi>) {
        self.by_mode.insert(mode, pois);
    }

    pub fn get(&self, mode: Mode) -> Option<&[Poi]> {
        self.by_mode.get(&mode).map(Vec::as_slice)
    }

    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.by_mode.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, &[Poi])> {
        self.by_mode.iter().map(|(mode, pois)| (*mode, pois.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<Mode, Vec<Poi>> {
        self.by_mode
    }

    pub fn is_empty(&self) -> bool {
        self.by_mode.values().all(Vec::is_empty)
    }
}
