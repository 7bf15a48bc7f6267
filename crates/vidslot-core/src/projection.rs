// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Participant projection: raw transport records to strict video inputs.
//!
//! This is the only place that deals with missing fields. Everything
//! downstream (the reconciler in particular) sees total, typed inputs.

use vidslot_port::{
    InputId, Participant, Peer, PeerAudio, PeerMap, PeerVideo, TrackInfo, TrackState, VideoInput,
    VideoInputType, GUEST_NAME,
};

use crate::filter::ParticipantFilter;

/// Whether a track in `state` renders as "off".
pub const fn is_off(state: TrackState) -> bool {
    state.is_off()
}

/// Which of a participant's logical tracks to project.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    /// Primary camera.
    Camera,
    /// Screen share.
    Screenshare,
    /// Remote media player virtual track.
    MediaPlayer,
}

fn display_name(participant: &Participant) -> String {
    participant
        .user_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(GUEST_NAME)
        .to_owned()
}

fn state_off(info: Option<&TrackInfo>) -> bool {
    info.is_none_or(|i| is_off(i.state))
}

/// Project one logical track of `participant` into a candidate input.
///
/// Media-player tracks are paused only when no track is attached: a stalled
/// player keeps showing its last frame instead of a placeholder.
pub fn project(participant: &Participant, dominant: bool, kind: TrackKind) -> VideoInput {
    let session = participant.session_id.as_str();
    let tracks = &participant.tracks;
    let (id, input_kind, info) = match kind {
        TrackKind::Camera => (
            InputId::camera(session),
            VideoInputType::Camera,
            tracks.video.as_ref(),
        ),
        TrackKind::Screenshare => (
            InputId::screenshare(session),
            VideoInputType::Screenshare,
            tracks.screen_video.as_ref(),
        ),
        TrackKind::MediaPlayer => (
            InputId::camera(session),
            VideoInputType::Camera,
            tracks.rmp_video.as_ref(),
        ),
    };

    let track = info.and_then(|i| i.track.clone());
    let paused = match kind {
        TrackKind::MediaPlayer => track.is_none(),
        TrackKind::Camera | TrackKind::Screenshare => track.is_none() || state_off(info),
    };
    let display_name = match kind {
        TrackKind::Screenshare => String::new(),
        TrackKind::Camera | TrackKind::MediaPlayer => display_name(participant),
    };

    VideoInput {
        id,
        kind: input_kind,
        display_name,
        dominant,
        paused,
        paused_by_user: info.is_some_and(TrackInfo::off_by_user),
        track,
        surface: None,
    }
}

/// Project `participant` into its peer descriptor.
pub fn project_peer(participant: &Participant, dominant: bool, is_media_player: bool) -> Peer {
    let session = participant.session_id.as_str();
    let tracks = &participant.tracks;
    let video_paused = if is_media_player {
        tracks
            .rmp_video
            .as_ref()
            .is_none_or(|i| i.track.is_none())
    } else {
        state_off(tracks.video.as_ref())
    };

    Peer {
        id: participant.session_id.clone(),
        display_name: display_name(participant),
        video: PeerVideo {
            id: InputId::camera(session),
            dominant,
            paused: video_paused,
        },
        screenshare_video: PeerVideo {
            id: InputId::screenshare(session),
            dominant,
            paused: state_off(tracks.screen_video.as_ref()),
        },
        audio: PeerAudio {
            paused: state_off(tracks.audio.as_ref()),
        },
    }
}

/// Candidate inputs and peer descriptors for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// Inputs in slot-priority order.
    pub inputs: Vec<VideoInput>,
    /// Peers keyed by participant id.
    pub peers: PeerMap,
}

/// Derive candidates from a roster snapshot.
///
/// Media players contribute their player track; everyone else contributes a
/// camera input followed by a screen-share input.
pub fn collect_candidates(
    participants: &[Participant],
    active_speaker: Option<&str>,
    filter: &ParticipantFilter,
) -> Candidates {
    let mut out = Candidates::default();
    for participant in filter.select(participants) {
        let dominant = active_speaker == Some(participant.session_id.as_str());
        let media_player = participant.is_media_player();
        if media_player {
            out.inputs
                .push(project(participant, dominant, TrackKind::MediaPlayer));
        } else {
            out.inputs.push(project(participant, dominant, TrackKind::Camera));
            out.inputs
                .push(project(participant, dominant, TrackKind::Screenshare));
        }
        out.peers.insert(
            participant.session_id.clone(),
            project_peer(participant, dominant, media_player),
        );
    }
    out
}
