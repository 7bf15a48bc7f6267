// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Normalized compositor types exchanged with renderers.
//!
//! These types are pure domain objects. Anything loosely shaped lives in
//! [`crate::participant`]; everything here is total and strictly typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{InputId, SurfaceId, TrackId};
use crate::participant::TrackHandle;

/// Display name used when a participant has not set one.
pub const GUEST_NAME: &str = "Guest";

/// Kind of video input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoInputType {
    /// Camera or media-player video.
    Camera,
    /// Screen-share video.
    Screenshare,
}

/// One candidate video input, derived fresh on every reconciliation pass.
///
/// Once committed by the reconciler the same type doubles as a slot; the
/// reconciler is the only writer of [`VideoInput::surface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoInput {
    /// Stable identity key.
    pub id: InputId,
    /// Camera or screen-share.
    pub kind: VideoInputType,
    /// Participant display name; empty for screen-share.
    pub display_name: String,
    /// Owner is the current active speaker.
    pub dominant: bool,
    /// Track absent or reported off/blocked.
    pub paused: bool,
    /// Track was turned off by its owner.
    pub paused_by_user: bool,
    /// The live track, absent when paused with nothing attached.
    pub track: Option<TrackHandle>,
    /// Rendering surface bound to this input, once one exists.
    pub surface: Option<SurfaceId>,
}

impl VideoInput {
    /// Identity of the bound track, if any.
    pub fn track_id(&self) -> Option<&TrackId> {
        self.track.as_ref().map(|t| &t.id)
    }

    /// Whether this is a screen-share input.
    pub fn is_screenshare(&self) -> bool {
        self.kind == VideoInputType::Screenshare
    }

    /// Renderer-facing projection of this input.
    pub fn to_active_slot(&self) -> ActiveVideoSlot {
        ActiveVideoSlot {
            id: self.id.clone(),
            kind: self.kind,
            display_name: self.display_name.clone(),
            paused: self.paused,
            dominant: self.dominant,
        }
    }
}

/// Renderer-visible description of an occupied slot position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveVideoSlot {
    /// Input id.
    pub id: InputId,
    /// Camera or screen-share.
    #[serde(rename = "type")]
    pub kind: VideoInputType,
    /// Display name.
    pub display_name: String,
    /// Paused placeholder flag.
    pub paused: bool,
    /// Active speaker flag.
    pub dominant: bool,
}

/// Fixed-capacity slot array; `None` is the explicit empty marker.
pub type ActiveSlotArray = Vec<Option<ActiveVideoSlot>>;

/// Per-track summary inside a [`Peer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerVideo {
    /// Input id the track would occupy.
    pub id: InputId,
    /// Owner is the active speaker.
    pub dominant: bool,
    /// Track renders as paused.
    pub paused: bool,
}

/// Audio summary inside a [`Peer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerAudio {
    /// Microphone is off or blocked.
    pub paused: bool,
}

/// Per-participant descriptor, rebuilt wholesale every pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    /// Participant session id.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Camera (or media-player) video.
    pub video: PeerVideo,
    /// Screen-share video.
    pub screenshare_video: PeerVideo,
    /// Microphone.
    pub audio: PeerAudio,
}

/// Peers keyed by participant id.
pub type PeerMap = BTreeMap<String, Peer>;

/// Logical image name to verified-loadable URL.
pub type AssetImageMap = BTreeMap<String, String>;

/// Named renderer parameters.
pub type ParamMap = BTreeMap<String, serde_json::Value>;

/// Sources object handed to the renderer at startup and on image updates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSources {
    /// Active slot array.
    pub video_slots: ActiveSlotArray,
    /// Committed image sources.
    pub asset_images: AssetImageMap,
}
