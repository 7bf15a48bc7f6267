// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Participant fixtures.

use vidslot_port::{Participant, ParticipantKind, TrackHandle, TrackInfo, TrackOff, TrackState};

/// A playable track with the given id.
pub fn playable(track: &str) -> TrackInfo {
    TrackInfo {
        state: TrackState::Playable,
        off: None,
        track: Some(TrackHandle::new(track)),
    }
}

/// Builder for [`Participant`] records.
#[derive(Debug, Clone)]
pub struct ParticipantBuilder {
    participant: Participant,
}

/// Start building a participant with session id `session_id`.
pub fn participant(session_id: &str) -> ParticipantBuilder {
    ParticipantBuilder {
        participant: Participant::new(session_id),
    }
}

impl ParticipantBuilder {
    /// Set the user name.
    pub fn named(mut self, name: &str) -> Self {
        self.participant.user_name = Some(name.to_owned());
        self
    }

    /// Mark as the local participant.
    pub fn local(mut self) -> Self {
        self.participant.local = true;
        self
    }

    /// Attach a playable camera track.
    pub fn camera(mut self, track: &str) -> Self {
        self.participant.tracks.video = Some(playable(track));
        self
    }

    /// Camera turned off by the user, with its track still attached.
    pub fn camera_off_by_user(mut self, track: &str) -> Self {
        self.participant.tracks.video = Some(TrackInfo {
            state: TrackState::Off,
            off: Some(TrackOff { by_user: true }),
            track: Some(TrackHandle::new(track)),
        });
        self
    }

    /// Camera with an explicit state and optional track.
    pub fn camera_state(mut self, state: TrackState, track: Option<&str>) -> Self {
        self.participant.tracks.video = Some(TrackInfo {
            state,
            off: None,
            track: track.map(TrackHandle::new),
        });
        self
    }

    /// Attach a playable screen-share track.
    pub fn screen(mut self, track: &str) -> Self {
        self.participant.tracks.screen_video = Some(playable(track));
        self
    }

    /// Attach a playable microphone track.
    pub fn audio(mut self, track: &str) -> Self {
        self.participant.tracks.audio = Some(playable(track));
        self
    }

    /// Make this a remote media player with the given player track state.
    pub fn media_player(mut self, state: TrackState, track: Option<&str>) -> Self {
        self.participant.kind = ParticipantKind::RemoteMediaPlayer;
        self.participant.tracks.rmp_video = Some(TrackInfo {
            state,
            off: None,
            track: track.map(TrackHandle::new),
        });
        self
    }

    /// Finish.
    pub fn build(self) -> Participant {
        self.participant
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn builder_sets_requested_tracks() {
        let p = participant("s1").named("Ada").camera("cam").screen("scr").build();
        assert_eq!(p.user_name.as_deref(), Some("Ada"));
        assert!(p.tracks.video.is_some());
        assert!(p.tracks.screen_video.is_some());
        assert!(p.tracks.audio.is_none());
        assert!(!p.is_media_player());
    }

    #[test]
    fn media_player_flag() {
        let p = participant("rmp")
            .media_player(TrackState::Playable, Some("m"))
            .build();
        assert!(p.is_media_player());
    }
}
