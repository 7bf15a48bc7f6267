// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock renderer engine and control handle.
//!
//! The engine and every handle it starts share one [`RenderLog`]. Keep a
//! clone of the [`MockRenderer`] to inspect the log after handing the
//! original to a compositor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vidslot_port::{
    ActiveSlotArray, ActiveVideoSlot, PeerMap, RenderSources, RendererEngine, RendererError,
    RendererHandle, StartRequest,
};

/// One control call received by a [`MockHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// `set_active_video_input_slots`
    Slots(ActiveSlotArray),
    /// `set_param_value`
    Param(String, serde_json::Value),
    /// `set_scale_factor`
    Scale(f64),
    /// `update_image_sources`
    Sources(RenderSources),
    /// `set_room_peer_descriptions_by_id`
    Peers(PeerMap),
    /// `stop`
    Stop,
}

/// Everything the renderer was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    /// Start requests, in order (including failed starts).
    pub starts: Vec<StartRequest>,
    /// Control calls across all handles, in order.
    pub calls: Vec<RenderCall>,
}

impl RenderLog {
    /// Every slot array pushed.
    pub fn slot_pushes(&self) -> Vec<&ActiveSlotArray> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Slots(slots) => Some(slots),
                _ => None,
            })
            .collect()
    }

    /// Most recent slot array pushed.
    pub fn last_slots(&self) -> Option<&ActiveSlotArray> {
        self.slot_pushes().pop()
    }

    /// Ids of the occupied positions in the most recent slot array.
    pub fn last_slot_ids(&self) -> Vec<String> {
        self.last_slots()
            .map(|slots| {
                slots
                    .iter()
                    .flatten()
                    .map(|s: &ActiveVideoSlot| s.id.as_str().to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every parameter set, in order.
    pub fn params(&self) -> Vec<(&str, &serde_json::Value)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Param(k, v) => Some((k.as_str(), v)),
                _ => None,
            })
            .collect()
    }

    /// Every peer map pushed.
    pub fn peer_pushes(&self) -> Vec<&PeerMap> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Peers(peers) => Some(peers),
                _ => None,
            })
            .collect()
    }

    /// Every sources object pushed.
    pub fn source_pushes(&self) -> Vec<&RenderSources> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Sources(sources) => Some(sources),
                _ => None,
            })
            .collect()
    }

    /// Most recent scale factor set.
    pub fn last_scale(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Scale(s) => Some(*s),
            _ => None,
        })
    }

    /// Number of stop calls.
    pub fn stops(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Stop))
            .count()
    }
}

#[derive(Debug, Default)]
struct Shared {
    log: RenderLog,
    fail_next: Option<RendererError>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock renderer engine for testing.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    shared: Arc<Mutex<Shared>>,
}

impl MockRenderer {
    /// Create a new mock renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` fail with `err`.
    pub fn fail_next_start(&self, err: RendererError) {
        lock(&self.shared).fail_next = Some(err);
    }

    /// Copy of the shared log.
    pub fn log(&self) -> RenderLog {
        lock(&self.shared).log.clone()
    }

    /// Forget recorded calls (start requests included).
    pub fn clear(&self) {
        lock(&self.shared).log = RenderLog::default();
    }

    /// Report a runtime failure through the most recent start's error sink.
    /// Returns false if the renderer was never started.
    pub fn report_runtime_error(&self, message: &str) -> bool {
        let sink = lock(&self.shared)
            .log
            .starts
            .last()
            .map(|req| req.options.errors.clone());
        match sink {
            Some(sink) => {
                sink.report(RendererError::Runtime(message.to_owned()));
                true
            }
            None => false,
        }
    }
}

impl RendererEngine for MockRenderer {
    type Handle = MockHandle;

    async fn start(&mut self, request: StartRequest) -> Result<MockHandle, RendererError> {
        let mut shared = lock(&self.shared);
        shared.log.starts.push(request);
        if let Some(err) = shared.fail_next.take() {
            return Err(err);
        }
        Ok(MockHandle {
            shared: Arc::clone(&self.shared),
            stopped: false,
        })
    }
}

/// Control handle returned by [`MockRenderer`].
#[derive(Debug)]
pub struct MockHandle {
    shared: Arc<Mutex<Shared>>,
    /// Whether `stop` was called on this handle.
    pub stopped: bool,
}

impl MockHandle {
    fn record(&self, call: RenderCall) {
        lock(&self.shared).log.calls.push(call);
    }
}

impl RendererHandle for MockHandle {
    fn set_active_video_input_slots(&mut self, slots: &[Option<ActiveVideoSlot>]) {
        self.record(RenderCall::Slots(slots.to_vec()));
    }

    fn set_param_value(&mut self, key: &str, value: &serde_json::Value) {
        self.record(RenderCall::Param(key.to_owned(), value.clone()));
    }

    fn set_scale_factor(&mut self, scale: f64) {
        self.record(RenderCall::Scale(scale));
    }

    fn update_image_sources(&mut self, sources: &RenderSources) {
        self.record(RenderCall::Sources(sources.clone()));
    }

    fn set_room_peer_descriptions_by_id(&mut self, peers: &PeerMap) {
        self.record(RenderCall::Peers(peers.clone()));
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.record(RenderCall::Stop);
    }
}
