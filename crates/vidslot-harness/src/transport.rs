// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory call transport.

use std::collections::HashSet;

use vidslot_port::{CallEvent, CallEventKind, CallTransport, Participant};

/// Mock call transport for testing.
///
/// Roster mutators return the [`CallEvent`] a real transport would emit, so
/// tests can feed it straight into the compositor.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Current roster, in roster order.
    pub participants: Vec<Participant>,
    /// Current active speaker.
    pub active_speaker: Option<String>,
    /// Currently subscribed event kinds.
    pub subscribed: HashSet<CallEventKind>,
    /// Number of subscribe calls.
    pub subscribe_calls: u32,
    /// Number of unsubscribe calls.
    pub unsubscribe_calls: u32,
}

impl MockTransport {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster seeded with `participants`.
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            ..Self::default()
        }
    }

    /// Whether `kind` is currently subscribed.
    pub fn is_subscribed(&self, kind: CallEventKind) -> bool {
        self.subscribed.contains(&kind)
    }

    /// Append a participant.
    pub fn join(&mut self, participant: Participant) -> CallEvent {
        let session_id = participant.session_id.clone();
        self.participants.push(participant);
        CallEvent::ParticipantJoined { session_id }
    }

    /// Replace the participant with the same session id in place, or append
    /// it if absent.
    pub fn update(&mut self, participant: Participant) -> CallEvent {
        let session_id = participant.session_id.clone();
        match self
            .participants
            .iter_mut()
            .find(|p| p.session_id == session_id)
        {
            Some(existing) => *existing = participant,
            None => self.participants.push(participant),
        }
        CallEvent::ParticipantUpdated { session_id }
    }

    /// Remove a participant by session id.
    pub fn leave(&mut self, session_id: &str) -> CallEvent {
        self.participants.retain(|p| p.session_id != session_id);
        if self.active_speaker.as_deref() == Some(session_id) {
            self.active_speaker = None;
        }
        CallEvent::ParticipantLeft {
            session_id: session_id.to_owned(),
        }
    }

    /// Change the active speaker.
    pub fn set_active_speaker(&mut self, session_id: Option<&str>) -> CallEvent {
        self.active_speaker = session_id.map(str::to_owned);
        CallEvent::ActiveSpeakerChange {
            peer_id: self.active_speaker.clone(),
        }
    }
}

impl CallTransport for MockTransport {
    fn participants(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    fn active_speaker_id(&self) -> Option<String> {
        self.active_speaker.clone()
    }

    fn subscribe(&mut self, kinds: &[CallEventKind]) {
        self.subscribe_calls += 1;
        self.subscribed.extend(kinds.iter().copied());
    }

    fn unsubscribe(&mut self, kinds: &[CallEventKind]) {
        self.unsubscribe_calls += 1;
        for kind in kinds {
            self.subscribed.remove(kind);
        }
    }
}
