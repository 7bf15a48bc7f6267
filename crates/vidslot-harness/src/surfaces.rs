// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock surface factory.

use std::collections::BTreeMap;

use vidslot_port::{InputId, SurfaceId, SurfacePort, TrackHandle, TrackId};

/// Mock surface factory for testing.
///
/// Tracks live surfaces and the track bound to each. Releasing a surface
/// that is not live is counted instead of panicking so tests can assert on it.
#[derive(Debug, Default)]
pub struct MockSurfaces {
    next_id: u64,
    /// Live surfaces and their bound track.
    pub live: BTreeMap<SurfaceId, Option<TrackId>>,
    /// Owning input of every surface ever created.
    pub owners: BTreeMap<SurfaceId, InputId>,
    /// Number of create calls.
    pub created: u32,
    /// Number of bind calls.
    pub binds: u32,
    /// Released surfaces, in release order.
    pub released: Vec<SurfaceId>,
    /// Releases of surfaces that were not live.
    pub double_releases: u32,
}

impl MockSurfaces {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces currently live.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Track currently bound to `surface`.
    pub fn bound_track(&self, surface: SurfaceId) -> Option<&TrackId> {
        self.live.get(&surface).and_then(Option::as_ref)
    }

    /// Input a surface was created for.
    pub fn owner(&self, surface: SurfaceId) -> Option<&InputId> {
        self.owners.get(&surface)
    }
}

impl SurfacePort for MockSurfaces {
    fn create_surface(&mut self, input: &InputId) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.live.insert(id, None);
        self.owners.insert(id, input.clone());
        self.created += 1;
        id
    }

    fn bind_track(&mut self, surface: SurfaceId, track: &TrackHandle) {
        self.binds += 1;
        if let Some(slot) = self.live.get_mut(&surface) {
            *slot = Some(track.id.clone());
        }
    }

    fn release_surface(&mut self, surface: SurfaceId) {
        if self.live.remove(&surface).is_some() {
            self.released.push(surface);
        } else {
            self.double_releases += 1;
        }
    }
}
