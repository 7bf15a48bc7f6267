// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identity keys used across the compositor contract.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Suffix appended to a session id to form its screen-share input id.
pub const SCREENSHARE_SUFFIX: &str = "-screen";

/// Stable identity of one video input.
///
/// Camera and media-player inputs use the participant session id verbatim.
/// Screen-share inputs append [`SCREENSHARE_SUFFIX`] so one participant can
/// contribute two inputs without colliding.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputId(pub String);

impl InputId {
    /// Input id for a participant's camera (or media-player) track.
    pub fn camera(session_id: &str) -> Self {
        Self(session_id.to_owned())
    }

    /// Input id for a participant's screen-share track.
    pub fn screenshare(session_id: &str) -> Self {
        Self(format!("{session_id}{SCREENSHARE_SUFFIX}"))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Identity of a media track as reported by the transport.
///
/// Two tracks are "the same" for reconciliation purposes iff their ids match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque rendering-surface handle issued by a [`crate::SurfacePort`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}
