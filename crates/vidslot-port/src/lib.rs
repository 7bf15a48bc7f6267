// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port contract for the video slot compositor.
//!
//! This crate defines the domain contract between the compositor engine,
//! the call transport that feeds it, and the renderer that consumes it.
//! It contains NO reconciliation logic; that lives in `vidslot-core`.
//!
//! # Design Principles
//!
//! - **Renderers are dumb**: They receive slot arrays and parameters. No roster logic.
//! - **Loose in, strict out**: Transport records are fully defaulted; normalized types are total.
//! - **Identity is not position**: Inputs are keyed by [`InputId`], never by array index.

mod geometry;
mod ids;
mod participant;
mod probe;
mod renderer;
mod surface;
mod transport;
mod types;

pub use geometry::{BoxSize, LogicalSize, ViewportSize};
pub use ids::{InputId, SurfaceId, TrackId, SCREENSHARE_SUFFIX};
pub use participant::{
    Participant, ParticipantKind, ParticipantTracks, TrackHandle, TrackInfo, TrackOff, TrackState,
};
pub use probe::{ImageProbe, ProbeError};
pub use renderer::{
    AssetImageCell, AssetUrlResolver, RenderOptions, RendererEngine, RendererError,
    RendererErrorSink, RendererHandle, StartRequest,
};
pub use surface::SurfacePort;
pub use transport::{CallEvent, CallEventKind, CallTransport};
pub use types::{
    ActiveSlotArray, ActiveVideoSlot, AssetImageMap, ParamMap, Peer, PeerAudio, PeerMap,
    PeerVideo, RenderSources, VideoInput, VideoInputType, GUEST_NAME,
};
