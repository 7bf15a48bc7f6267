// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Call transport port: roster snapshots and roster events.

use serde::{Deserialize, Serialize};

use crate::participant::Participant;

/// Roster event kinds the compositor subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallEventKind {
    /// `participant-joined`
    ParticipantJoined,
    /// `participant-updated`
    ParticipantUpdated,
    /// `participant-left`
    ParticipantLeft,
    /// `active-speaker-change`
    ActiveSpeakerChange,
}

impl CallEventKind {
    /// Every kind the compositor listens for.
    pub const ALL: [CallEventKind; 4] = [
        CallEventKind::ParticipantJoined,
        CallEventKind::ParticipantUpdated,
        CallEventKind::ParticipantLeft,
        CallEventKind::ActiveSpeakerChange,
    ];
}

/// A roster event delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum CallEvent {
    /// A participant joined.
    ParticipantJoined {
        /// Session id.
        session_id: String,
    },
    /// A participant's state changed.
    ParticipantUpdated {
        /// Session id.
        session_id: String,
    },
    /// A participant left.
    ParticipantLeft {
        /// Session id.
        session_id: String,
    },
    /// The active speaker changed.
    ActiveSpeakerChange {
        /// New active speaker session id, if any.
        peer_id: Option<String>,
    },
}

impl CallEvent {
    /// Kind of this event.
    pub const fn kind(&self) -> CallEventKind {
        match self {
            CallEvent::ParticipantJoined { .. } => CallEventKind::ParticipantJoined,
            CallEvent::ParticipantUpdated { .. } => CallEventKind::ParticipantUpdated,
            CallEvent::ParticipantLeft { .. } => CallEventKind::ParticipantLeft,
            CallEvent::ActiveSpeakerChange { .. } => CallEventKind::ActiveSpeakerChange,
        }
    }
}

/// Read access to the call roster plus event subscription.
pub trait CallTransport {
    /// All current participants, in roster order.
    fn participants(&self) -> Vec<Participant>;

    /// Session id of the current active speaker.
    fn active_speaker_id(&self) -> Option<String>;

    /// Start delivering the given event kinds.
    fn subscribe(&mut self, kinds: &[CallEventKind]);

    /// Stop delivering the given event kinds.
    fn unsubscribe(&mut self, kinds: &[CallEventKind]);
}
