// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use common::{rig, rig_with, test_config};
use vidslot_core::{CompositorConfig, CompositorError, CompositorState, ConfigError, MergeMode};
use vidslot_harness::participant;
use vidslot_port::{BoxSize, LogicalSize, Participant, ViewportSize};

fn three_people() -> Vec<Participant> {
    vec![
        participant("a").camera("t1").build(),
        participant("b").camera("t2").screen("s2").build(),
        participant("c").camera("t3").build(),
    ]
}

#[tokio::test]
async fn allow_list_selects_and_orders_participants() {
    let mut rig = rig(three_people());
    rig.compositor.start().await.unwrap();

    assert!(rig
        .compositor
        .update_participant_ids(vec!["b".into()], MergeMode::Replace));
    assert_eq!(rig.renderer.log().last_slot_ids(), ["b", "b-screen"]);
    assert_eq!(rig.surfaces().released.len(), 2);

    assert!(rig
        .compositor
        .update_participant_ids(vec!["c".into(), "b".into()], MergeMode::Merge));
    assert_eq!(rig.compositor.participant_ids(), ["b", "c"]);
    assert_eq!(rig.renderer.log().last_slot_ids(), ["b", "b-screen", "c"]);

    rig.renderer.clear();
    assert!(!rig
        .compositor
        .update_participant_ids(vec!["c".into()], MergeMode::Merge));
    assert!(rig.renderer.log().slot_pushes().is_empty());

    assert!(rig
        .compositor
        .update_participant_ids(Vec::new(), MergeMode::Replace));
    assert_eq!(rig.renderer.log().last_slot_ids(), ["a", "b", "b-screen", "c"]);
}

#[tokio::test]
async fn configured_allow_list_applies_from_first_pass() {
    let config = CompositorConfig {
        participant_ids: vec!["ghost".into(), "c".into(), "a".into()],
        ..test_config()
    };
    let mut rig = rig_with(config, three_people());
    rig.compositor.start().await.unwrap();
    assert_eq!(rig.renderer.log().last_slot_ids(), ["c", "a"]);
    assert_eq!(rig.renderer.log().peer_pushes()[0].len(), 2);
}

#[tokio::test]
async fn allow_list_updates_while_idle_take_effect_on_start() {
    let mut rig = rig(three_people());
    assert!(rig
        .compositor
        .update_participant_ids(vec!["a".into()], MergeMode::Merge));
    assert!(rig.renderer.log().slot_pushes().is_empty());

    rig.compositor.start().await.unwrap();
    assert_eq!(rig.renderer.log().last_slot_ids(), ["a"]);
}

#[tokio::test]
async fn aspect_ratio_change_restarts_renderer() {
    let mut rig = rig(three_people());
    rig.compositor.start().await.unwrap();

    rig.compositor.update_aspect_ratio(1.0).await.unwrap();
    assert_eq!(rig.compositor.state(), CompositorState::Started);
    let log = rig.renderer.log();
    assert_eq!(log.starts.len(), 2);
    assert_eq!(log.stops(), 1);
    assert_eq!(log.starts[1].viewport, ViewportSize { w: 640, h: 640 });
    assert_eq!(
        log.starts[1].logical,
        LogicalSize {
            width: 640,
            height: 640
        }
    );
    assert_eq!(rig.events.starts(), 2);
    assert_eq!(rig.surfaces().live_count(), 4);
    assert_eq!(rig.surfaces().double_releases, 0);
}

#[tokio::test]
async fn invalid_aspect_ratio_is_rejected() {
    let mut rig = rig(three_people());
    rig.compositor.start().await.unwrap();
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            rig.compositor.update_aspect_ratio(bad).await,
            Err(CompositorError::Config(ConfigError::Invalid(_)))
        ));
    }
    assert!((rig.compositor.config().aspect_ratio - 2.0).abs() < f64::EPSILON);
    assert_eq!(rig.renderer.log().starts.len(), 1);
}

#[tokio::test]
async fn aspect_ratio_change_while_idle_only_updates_config() {
    let mut rig = rig(three_people());
    rig.compositor.update_aspect_ratio(0.5).await.unwrap();
    assert_eq!(rig.compositor.state(), CompositorState::Idle);
    assert!(rig.renderer.log().starts.is_empty());
    assert_eq!(
        rig.compositor.config().logical_size(),
        LogicalSize {
            width: 640,
            height: 1280
        }
    );
}

#[tokio::test]
async fn resize_updates_scale_and_ignores_unmeasured_boxes() {
    let mut rig = rig(three_people());
    rig.compositor.start().await.unwrap();

    assert!(rig.compositor.on_resize(BoxSize::new(640.0, 320.0)));
    assert_eq!(rig.compositor.viewport(), ViewportSize { w: 640, h: 320 });
    assert_eq!(rig.renderer.log().last_scale(), Some(0.5));

    assert!(!rig.compositor.on_resize(BoxSize::new(0.0, 0.0)));
    assert!((rig.compositor.scale_factor() - 0.5).abs() < f64::EPSILON);
    assert_eq!(rig.compositor.viewport(), ViewportSize { w: 640, h: 320 });

    assert!(!rig.compositor.on_resize(BoxSize::new(640.0, 320.0)));
}

#[tokio::test]
async fn resize_before_start_sizes_the_first_viewport() {
    let mut rig = rig(three_people());
    assert!(rig.compositor.on_resize(BoxSize::new(960.0, 480.0)));
    rig.compositor.start().await.unwrap();

    let log = rig.renderer.log();
    assert_eq!(log.starts[0].viewport, ViewportSize { w: 960, h: 480 });
    assert!((log.starts[0].options.scale_factor - 0.75).abs() < f64::EPSILON);
}
