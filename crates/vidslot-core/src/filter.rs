// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Participant allow-list.

use rustc_hash::{FxHashMap, FxHashSet};
use vidslot_port::Participant;

use crate::merge::MergeMode;

/// Ordered allow-list of participant session ids.
///
/// Empty admits every participant in roster order. Non-empty admits only the
/// listed participants, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantFilter {
    ids: Vec<String>,
}

impl ParticipantFilter {
    /// Filter seeded with `ids` (duplicates dropped).
    pub fn new(ids: Vec<String>) -> Self {
        let mut filter = Self::default();
        filter.update(ids, MergeMode::Replace);
        filter
    }

    /// Listed ids, in order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Whether every participant is admitted.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Apply an update. `Merge` is an order-preserving set union. Returns
    /// whether the list changed.
    pub fn update(&mut self, ids: Vec<String>, mode: MergeMode) -> bool {
        let before = self.ids.clone();
        if mode == MergeMode::Replace {
            self.ids.clear();
        }
        let mut seen: FxHashSet<String> = self.ids.iter().cloned().collect();
        for id in ids {
            if seen.insert(id.clone()) {
                self.ids.push(id);
            }
        }
        self.ids != before
    }

    /// Participants admitted by this filter, in output order.
    pub fn select<'a>(&self, participants: &'a [Participant]) -> Vec<&'a Participant> {
        if self.ids.is_empty() {
            return participants.iter().collect();
        }
        let by_id: FxHashMap<&str, &Participant> = participants
            .iter()
            .map(|p| (p.session_id.as_str(), p))
            .collect();
        self.ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    fn roster(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id)).collect()
    }

    fn ids_of(selected: &[&Participant]) -> Vec<String> {
        selected.iter().map(|p| p.session_id.clone()).collect()
    }

    #[test]
    fn empty_filter_keeps_roster_order() {
        let people = roster(&["a", "b", "c"]);
        let filter = ParticipantFilter::default();
        assert_eq!(ids_of(&filter.select(&people)), ["a", "b", "c"]);
    }

    #[test]
    fn filter_reorders_and_drops() {
        let people = roster(&["a", "b", "c"]);
        let filter = ParticipantFilter::new(vec!["c".into(), "a".into(), "zz".into()]);
        assert_eq!(ids_of(&filter.select(&people)), ["c", "a"]);
    }

    #[test]
    fn merge_is_union_and_replace_overwrites() {
        let mut filter = ParticipantFilter::new(vec!["a".into(), "b".into()]);
        assert!(filter.update(vec!["b".into(), "c".into()], MergeMode::Merge));
        assert_eq!(filter.ids(), ["a", "b", "c"]);
        assert!(!filter.update(vec!["a".into()], MergeMode::Merge));
        assert!(filter.update(vec!["c".into()], MergeMode::Replace));
        assert_eq!(filter.ids(), ["c"]);
    }
}
