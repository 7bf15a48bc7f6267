// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw participant records as delivered by the call transport.
//!
//! Transport snapshots are loosely shaped: any nested field may be missing.
//! Every field here is defaulted so a record always deserializes; the
//! projection boundary in `vidslot-core` turns these into strict inputs.

use serde::{Deserialize, Serialize};

use crate::ids::TrackId;

/// Liveness state of a media track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// Track is turned off.
    #[default]
    Off,
    /// Track is blocked (permissions or policy).
    Blocked,
    /// Local track is ready to send.
    Sendable,
    /// Track is being negotiated.
    Loading,
    /// Track stalled on the network.
    Interrupted,
    /// Track is delivering media.
    Playable,
}

impl TrackState {
    /// Every liveness state, in declaration order.
    pub const ALL: [TrackState; 6] = [
        TrackState::Off,
        TrackState::Blocked,
        TrackState::Sendable,
        TrackState::Loading,
        TrackState::Interrupted,
        TrackState::Playable,
    ];

    /// Whether a track in this state renders as "off".
    ///
    /// True exactly for [`TrackState::Off`] and [`TrackState::Blocked`].
    pub const fn is_off(self) -> bool {
        matches!(self, TrackState::Off | TrackState::Blocked)
    }
}

/// Handle to a live media track.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackHandle {
    /// Track identity.
    pub id: TrackId,
}

impl TrackHandle {
    /// Handle for the track with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: TrackId(id.into()),
        }
    }
}

/// Why a track is off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackOff {
    /// The owner turned the track off themselves.
    pub by_user: bool,
}

/// Transport-side view of one logical track.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackInfo {
    /// Liveness state.
    pub state: TrackState,
    /// Off reason, present only while off.
    pub off: Option<TrackOff>,
    /// The live track, if one is attached.
    pub track: Option<TrackHandle>,
}

impl TrackInfo {
    /// Whether the owner turned this track off themselves.
    pub fn off_by_user(&self) -> bool {
        self.off.is_some_and(|off| off.by_user)
    }
}

/// The logical tracks a participant may carry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantTracks {
    /// Primary camera.
    pub video: Option<TrackInfo>,
    /// Microphone.
    pub audio: Option<TrackInfo>,
    /// Screen-share video.
    pub screen_video: Option<TrackInfo>,
    /// Remote media player virtual video track.
    pub rmp_video: Option<TrackInfo>,
}

/// What kind of roster entry a participant is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantKind {
    /// A regular call member.
    #[default]
    Call,
    /// A server-side media player streaming into the call.
    RemoteMediaPlayer,
}

/// One participant as reported by the transport snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    /// Session identifier, unique within the call.
    pub session_id: String,
    /// Display name, if the participant set one.
    pub user_name: Option<String>,
    /// Whether this is the local participant.
    pub local: bool,
    /// Roster entry kind.
    #[serde(rename = "participantType")]
    pub kind: ParticipantKind,
    /// Logical tracks.
    pub tracks: ParticipantTracks,
}

impl Participant {
    /// Minimal record with only a session id.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    /// Whether this entry is a remote media player.
    pub fn is_media_player(&self) -> bool {
        self.kind == ParticipantKind::RemoteMediaPlayer
    }
}
