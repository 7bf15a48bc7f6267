// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

use proptest::prelude::*;
use vidslot_core::{collect_candidates, fit, ParticipantFilter, SlotReconciler, SurfaceAction};
use vidslot_harness::{participant, MockSurfaces};
use vidslot_port::{BoxSize, Participant};

/// (session index, camera track generation, screen track generation)
type Shape = (u8, Option<u8>, Option<u8>);

fn build_roster(shapes: &[Shape]) -> Vec<Participant> {
    shapes
        .iter()
        .map(|(id, cam, screen)| {
            let mut b = participant(&format!("p{id}"));
            if let Some(g) = cam {
                b = b.camera(&format!("cam-{id}-{g}"));
            }
            if let Some(g) = screen {
                b = b.screen(&format!("scr-{id}-{g}"));
            }
            b.build()
        })
        .collect()
}

fn roster_strategy() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(
        (0u8..6, prop::option::of(0u8..2), prop::option::of(0u8..2)),
        0..8,
    )
}

proptest! {
    #[test]
    fn fit_stays_inside_container(
        w in 1u32..4000,
        h in 1u32..4000,
        ar in 0.25f64..4.0,
    ) {
        let v = fit(BoxSize::new(f64::from(w), f64::from(h)), ar);
        prop_assert!(v.w <= w);
        prop_assert!(v.h <= h);
        // One side always binds.
        prop_assert!(v.w == w || v.h == h);
    }

    #[test]
    fn reconciling_same_roster_twice_is_idempotent(shapes in roster_strategy()) {
        let roster = build_roster(&shapes);
        let filter = ParticipantFilter::default();
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();

        rec.reconcile(collect_candidates(&roster, None, &filter).inputs, &mut surfaces);
        let slots = rec.slots().to_vec();
        let created = surfaces.created;

        let out = rec.reconcile(collect_candidates(&roster, None, &filter).inputs, &mut surfaces);
        prop_assert!(!out.changed);
        let all_reused = out
            .actions
            .iter()
            .all(|a| matches!(a, SurfaceAction::Reuse { .. }));
        prop_assert!(all_reused);
        prop_assert_eq!(rec.slots(), slots.as_slice());
        prop_assert_eq!(surfaces.created, created);
    }

    #[test]
    fn every_surface_is_released_exactly_once(
        rosters in prop::collection::vec(roster_strategy(), 1..6)
    ) {
        let filter = ParticipantFilter::default();
        let mut rec = SlotReconciler::new();
        let mut surfaces = MockSurfaces::new();

        for shapes in &rosters {
            let roster = build_roster(shapes);
            rec.reconcile(collect_candidates(&roster, None, &filter).inputs, &mut surfaces);
            let with_surface = rec.slots().iter().filter(|s| s.surface.is_some()).count();
            prop_assert_eq!(surfaces.live_count(), with_surface);
        }
        rec.release_all(&mut surfaces);

        prop_assert_eq!(surfaces.double_releases, 0);
        prop_assert_eq!(surfaces.live_count(), 0);
        prop_assert_eq!(surfaces.released.len(), surfaces.created as usize);
    }
}
