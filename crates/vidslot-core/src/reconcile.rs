// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Slot reconciler.
//!
//! Diffs each pass's candidate inputs against the previously committed slot
//! list and decides, per slot, whether its rendering surface is reused as-is,
//! rebound to a new track, freshly created, or released.
//!
//! # Invariants
//!
//! - Identity is the [`InputId`]; slot position never participates in lookup.
//! - Every surface this reconciler creates is released exactly once, in the
//!   pass whose output first omits its slot (or in [`SlotReconciler::release_all`]).
//! - Reconciling the same candidates twice is a no-op the second time
//!   (`changed == false`, no surface actions).

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};
use vidslot_port::{InputId, SurfaceId, SurfacePort, TrackId, VideoInput};

/// A committed input. Slots persist across passes until superseded.
pub type Slot = VideoInput;

/// Surface lifecycle decision taken during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAction {
    /// A new surface was created and the track bound to it.
    Create {
        /// Owning input.
        input: InputId,
        /// New surface.
        surface: SurfaceId,
    },
    /// The surface was carried forward untouched.
    Reuse {
        /// Owning input.
        input: InputId,
        /// Reused surface.
        surface: SurfaceId,
    },
    /// The surface was kept and a different track bound to it.
    Rebind {
        /// Owning input.
        input: InputId,
        /// Rebound surface.
        surface: SurfaceId,
    },
    /// The surface was destroyed.
    Release {
        /// Former owning input.
        input: InputId,
        /// Released surface.
        surface: SurfaceId,
    },
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Whether anything observable changed.
    pub changed: bool,
    /// Surface decisions, in the order they were taken.
    pub actions: Vec<SurfaceAction>,
}

impl ReconcileOutcome {
    /// Number of actions matching `pred`.
    pub fn count(&self, pred: impl Fn(&SurfaceAction) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}

/// Fields compared positionally to decide whether a pass changed anything.
#[derive(Debug, PartialEq, Eq)]
struct Fingerprint {
    id: InputId,
    paused: bool,
    dominant: bool,
    display_name: String,
    track: Option<TrackId>,
}

impl Fingerprint {
    fn of(slot: &Slot) -> Self {
        Self {
            id: slot.id.clone(),
            paused: slot.paused,
            dominant: slot.dominant,
            display_name: slot.display_name.clone(),
            track: slot.track_id().cloned(),
        }
    }
}

/// Owns the committed slot list and the set of camera ids that hold a
/// surface. The set never outgrows the committed slots.
#[derive(Debug, Default)]
pub struct SlotReconciler {
    slots: Vec<Slot>,
    known_ids: FxHashSet<InputId>,
}

impl SlotReconciler {
    /// Empty reconciler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed slots, in slot order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Whether `id` is a committed camera input that has been bound to a surface.
    pub fn is_known(&self, id: &InputId) -> bool {
        self.known_ids.contains(id)
    }

    /// Run one pass over `candidates` (in slot-priority order).
    pub fn reconcile<S: SurfacePort>(
        &mut self,
        candidates: Vec<VideoInput>,
        surfaces: &mut S,
    ) -> ReconcileOutcome {
        let before: Vec<Fingerprint> = self.slots.iter().map(Fingerprint::of).collect();
        let mut previous: Vec<Option<Slot>> =
            std::mem::take(&mut self.slots).into_iter().map(Some).collect();
        let index: FxHashMap<InputId, usize> = previous
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (s.id.clone(), i)))
            .collect();

        let mut next = Vec::with_capacity(candidates.len());
        let mut seen = FxHashSet::default();
        let mut actions = Vec::new();

        for candidate in candidates {
            if !seen.insert(candidate.id.clone()) {
                warn!(id = %candidate.id, "duplicate candidate id; keeping first");
                continue;
            }
            if candidate.track.is_none()
                && (candidate.is_screenshare() || !self.known_ids.contains(&candidate.id))
            {
                trace!(id = %candidate.id, "no live track; skipping");
                continue;
            }
            let prior = index.get(&candidate.id).and_then(|&i| previous[i].take());
            next.push(self.commit(candidate, prior, surfaces, &mut actions));
        }

        // Torn-down ids lose placeholder eligibility; a returning participant
        // must bring a live track again.
        for slot in previous.into_iter().flatten() {
            self.known_ids.remove(&slot.id);
            if let Some(surface) = slot.surface {
                surfaces.release_surface(surface);
                actions.push(SurfaceAction::Release {
                    input: slot.id,
                    surface,
                });
            }
        }

        let changed = before.len() != next.len()
            || before
                .iter()
                .zip(next.iter())
                .any(|(old, new)| *old != Fingerprint::of(new));
        debug!(
            changed,
            slots = next.len(),
            actions = actions.len(),
            "reconciled video slots"
        );
        self.slots = next;
        ReconcileOutcome { changed, actions }
    }

    /// Commit one candidate, reusing `prior` when it carries the same id.
    fn commit<S: SurfacePort>(
        &mut self,
        candidate: VideoInput,
        prior: Option<Slot>,
        surfaces: &mut S,
        actions: &mut Vec<SurfaceAction>,
    ) -> Slot {
        match prior {
            Some(prev) if prev.track_id() == candidate.track_id() => {
                if let Some(surface) = prev.surface {
                    actions.push(SurfaceAction::Reuse {
                        input: candidate.id.clone(),
                        surface,
                    });
                }
                Slot {
                    surface: prev.surface,
                    track: prev.track,
                    ..candidate
                }
            }
            prior => {
                let existing = prior.and_then(|p| p.surface);
                let surface = match (&candidate.track, existing) {
                    (Some(track), Some(surface)) => {
                        surfaces.bind_track(surface, track);
                        actions.push(SurfaceAction::Rebind {
                            input: candidate.id.clone(),
                            surface,
                        });
                        Some(surface)
                    }
                    (Some(track), None) => {
                        let surface = surfaces.create_surface(&candidate.id);
                        surfaces.bind_track(surface, track);
                        actions.push(SurfaceAction::Create {
                            input: candidate.id.clone(),
                            surface,
                        });
                        Some(surface)
                    }
                    // Placeholder: keep whatever surface exists, bind nothing.
                    (None, existing) => existing,
                };
                if candidate.track.is_some() && !candidate.is_screenshare() {
                    self.known_ids.insert(candidate.id.clone());
                }
                let paused = candidate.paused || candidate.track.is_none();
                Slot {
                    surface,
                    paused,
                    ..candidate
                }
            }
        }
    }

    /// Release every surface and forget all state.
    pub fn release_all<S: SurfacePort>(&mut self, surfaces: &mut S) -> Vec<SurfaceAction> {
        let mut actions = Vec::new();
        for slot in self.slots.drain(..) {
            if let Some(surface) = slot.surface {
                surfaces.release_surface(surface);
                actions.push(SurfaceAction::Release {
                    input: slot.id,
                    surface,
                });
            }
        }
        self.known_ids.clear();
        actions
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use vidslot_harness::MockSurfaces;
    use vidslot_port::{TrackHandle, VideoInputType};

    fn camera(id: &str, track: Option<&str>) -> VideoInput {
        VideoInput {
            id: InputId::camera(id),
            kind: VideoInputType::Camera,
            display_name: id.to_uppercase(),
            dominant: false,
            paused: track.is_none(),
            paused_by_user: false,
            track: track.map(TrackHandle::new),
            surface: None,
        }
    }

    fn screen(id: &str, track: Option<&str>) -> VideoInput {
        VideoInput {
            id: InputId::screenshare(id),
            kind: VideoInputType::Screenshare,
            display_name: String::new(),
            ..camera(id, track)
        }
    }

    fn surface_of(rec: &SlotReconciler, id: &str) -> Option<SurfaceId> {
        rec.slots()
            .iter()
            .find(|s| s.id.as_str() == id)
            .and_then(|s| s.surface)
    }

    #[test]
    fn first_pass_creates_one_surface_per_live_input() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        let out = rec.reconcile(
            vec![camera("a", Some("t1")), camera("b", Some("t2"))],
            &mut surfaces,
        );
        assert!(out.changed);
        assert_eq!(out.count(|a| matches!(a, SurfaceAction::Create { .. })), 2);
        assert_eq!(surfaces.live_count(), 2);
    }

    #[test]
    fn same_candidates_twice_is_a_no_op() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        let batch = vec![camera("a", Some("t1")), screen("a", Some("s1"))];
        rec.reconcile(batch.clone(), &mut surfaces);
        let before = rec.slots().to_vec();

        let out = rec.reconcile(batch, &mut surfaces);
        assert!(!out.changed);
        assert_eq!(rec.slots(), before.as_slice());
        assert_eq!(surfaces.created, 2);
        assert!(out
            .actions
            .iter()
            .all(|a| matches!(a, SurfaceAction::Reuse { .. })));
    }

    #[test]
    fn same_track_reuses_surface() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(vec![camera("A", Some("t1"))], &mut surfaces);
        let first = surface_of(&rec, "A");

        let mut refreshed = camera("A", Some("t1"));
        refreshed.dominant = true;
        let out = rec.reconcile(vec![refreshed], &mut surfaces);
        assert!(out.changed);
        assert_eq!(surface_of(&rec, "A"), first);
        assert_eq!(surfaces.created, 1);
        assert!(rec.slots()[0].dominant);
    }

    #[test]
    fn track_switch_rebinds_without_recreating() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(vec![camera("self", Some("front"))], &mut surfaces);
        let first = surface_of(&rec, "self");

        let out = rec.reconcile(vec![camera("self", Some("back"))], &mut surfaces);
        assert!(out.changed);
        assert_eq!(surface_of(&rec, "self"), first);
        assert_eq!(surfaces.created, 1);
        assert_eq!(
            out.actions,
            vec![SurfaceAction::Rebind {
                input: InputId::camera("self"),
                surface: first.unwrap(),
            }]
        );
        assert_eq!(surfaces.bound_track(first.unwrap()), Some(&TrackId::from("back")));
    }

    #[test]
    fn removed_input_is_released_exactly_once() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("A", Some("t1")), camera("B", Some("t2"))],
            &mut surfaces,
        );
        let b = surface_of(&rec, "B").unwrap();

        let out = rec.reconcile(vec![camera("A", Some("t1"))], &mut surfaces);
        assert!(out.changed);
        assert!(rec.slots().iter().all(|s| s.id.as_str() != "B"));
        assert_eq!(surfaces.released, vec![b]);

        rec.reconcile(vec![camera("A", Some("t1"))], &mut surfaces);
        assert_eq!(surfaces.released, vec![b]);
        assert_eq!(surfaces.double_releases, 0);
    }

    #[test]
    fn known_camera_without_track_stays_as_placeholder() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("C", Some("t1")), screen("C", Some("s1"))],
            &mut surfaces,
        );

        let out = rec.reconcile(vec![camera("C", None), screen("C", None)], &mut surfaces);
        assert!(out.changed);
        assert_eq!(rec.slots().len(), 1);
        let slot = &rec.slots()[0];
        assert_eq!(slot.id, InputId::camera("C"));
        assert!(slot.paused);
        assert!(slot.surface.is_some());
        assert_eq!(surfaces.released.len(), 1);
    }

    #[test]
    fn unknown_camera_without_track_is_dropped() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        let out = rec.reconcile(vec![camera("new", None)], &mut surfaces);
        assert!(!out.changed);
        assert!(rec.slots().is_empty());
        assert_eq!(surfaces.created, 0);
    }

    #[test]
    fn placeholder_regains_track_on_same_surface() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(vec![camera("C", Some("t1"))], &mut surfaces);
        let first = surface_of(&rec, "C");
        rec.reconcile(vec![camera("C", None)], &mut surfaces);
        rec.reconcile(vec![camera("C", Some("t2"))], &mut surfaces);
        assert_eq!(surface_of(&rec, "C"), first);
        assert!(!rec.slots()[0].paused);
        assert_eq!(surfaces.created, 1);
    }

    #[test]
    fn reorder_is_a_change_but_keeps_surfaces() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("a", Some("t1")), camera("b", Some("t2"))],
            &mut surfaces,
        );
        let a = surface_of(&rec, "a");
        let out = rec.reconcile(
            vec![camera("b", Some("t2")), camera("a", Some("t1"))],
            &mut surfaces,
        );
        assert!(out.changed);
        assert_eq!(surface_of(&rec, "a"), a);
        assert_eq!(surfaces.created, 2);
        assert!(surfaces.released.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("a", Some("t1")), camera("a", Some("t2"))],
            &mut surfaces,
        );
        assert_eq!(rec.slots().len(), 1);
        assert_eq!(rec.slots()[0].track_id(), Some(&TrackId::from("t1")));
    }

    #[test]
    fn departed_camera_is_forgotten() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("a", Some("t1")), camera("b", Some("t2"))],
            &mut surfaces,
        );
        assert!(rec.is_known(&InputId::camera("b")));

        rec.reconcile(vec![camera("a", Some("t1"))], &mut surfaces);
        assert!(!rec.is_known(&InputId::camera("b")));
        assert!(rec.is_known(&InputId::camera("a")));

        // Rejoining without a track is no longer a placeholder.
        rec.reconcile(vec![camera("a", Some("t1")), camera("b", None)], &mut surfaces);
        assert_eq!(rec.slots().len(), 1);
        assert_eq!(surfaces.live_count(), 1);
    }

    #[test]
    fn release_all_frees_everything() {
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();
        rec.reconcile(
            vec![camera("a", Some("t1")), screen("a", Some("s1"))],
            &mut surfaces,
        );
        let actions = rec.release_all(&mut surfaces);
        assert_eq!(actions.len(), 2);
        assert_eq!(surfaces.live_count(), 0);
        assert!(rec.slots().is_empty());
        assert!(!rec.is_known(&InputId::camera("a")));
    }
}
