// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rendering-surface port.
//!
//! A surface is the host-side element a live track is attached to (a video
//! output element, a texture, ...). The reconciler is the only caller.

use crate::ids::{InputId, SurfaceId};
use crate::participant::TrackHandle;

/// Creates, rebinds, and destroys rendering surfaces.
///
/// Every surface returned by [`SurfacePort::create_surface`] is released
/// exactly once through [`SurfacePort::release_surface`].
pub trait SurfacePort {
    /// Create a fresh surface for the given input.
    fn create_surface(&mut self, input: &InputId) -> SurfaceId;

    /// Attach `track` to `surface`, replacing whatever was attached.
    fn bind_track(&mut self, surface: SurfaceId, track: &TrackHandle);

    /// Destroy a surface.
    fn release_surface(&mut self, surface: SurfaceId);
}
