// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer port: startup call plus the control handle it returns.
//!
//! The compositor owns no pixels. It hands the renderer a sources object and
//! an options bundle, then drives it exclusively through [`RendererHandle`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::geometry::{LogicalSize, ViewportSize};
use crate::types::{ActiveVideoSlot, AssetImageMap, PeerMap, RenderSources};

/// Failure surfaced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    /// The asynchronous startup call failed.
    #[error("renderer startup failed: {0}")]
    Startup(String),
    /// The running renderer reported a failure.
    #[error("renderer runtime error: {0}")]
    Runtime(String),
}

/// Sender half through which a running renderer reports failures.
#[derive(Debug, Clone)]
pub struct RendererErrorSink {
    tx: UnboundedSender<RendererError>,
}

impl RendererErrorSink {
    /// Create a sink and the receiver the compositor drains.
    pub fn channel() -> (Self, UnboundedReceiver<RendererError>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report a failure. Dropped silently once the compositor is gone.
    pub fn report(&self, err: RendererError) {
        let _ = self.tx.send(err);
    }
}

/// Shared cell holding the committed image map.
///
/// The image pipeline is the only writer; renderers read through
/// [`AssetUrlResolver`].
#[derive(Debug, Clone, Default)]
pub struct AssetImageCell {
    images: Arc<RwLock<AssetImageMap>>,
}

impl AssetImageCell {
    /// Empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed map.
    pub fn snapshot(&self) -> AssetImageMap {
        self.read().clone()
    }

    /// Swap in a new committed map.
    pub fn replace(&self, images: AssetImageMap) {
        *self.write() = images;
    }

    /// Read-only view for renderers.
    pub fn resolver(&self) -> AssetUrlResolver {
        AssetUrlResolver {
            images: Arc::clone(&self.images),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AssetImageMap> {
        self.images.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AssetImageMap> {
        self.images.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-only view of the committed image map handed to renderers.
#[derive(Debug, Clone)]
pub struct AssetUrlResolver {
    images: Arc<RwLock<AssetImageMap>>,
}

impl AssetUrlResolver {
    /// Committed URL for `name`, or `fallback` when none is committed.
    pub fn resolve(&self, name: &str, fallback: &str) -> String {
        self.images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// Options bundle passed to [`RendererEngine::start`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target frame rate.
    pub fps: u32,
    /// Initial logical-to-display scale.
    pub scale_factor: f64,
    /// Ask the renderer to preload assets before first frame.
    pub enable_preload: bool,
    /// Where runtime failures go.
    pub errors: RendererErrorSink,
    /// Asset URL lookup backed by the committed image map.
    pub asset_urls: AssetUrlResolver,
}

/// Everything a renderer needs to start.
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Display rectangle the renderer is mounted into.
    pub viewport: ViewportSize,
    /// Logical composition resolution.
    pub logical: LogicalSize,
    /// Initial sources.
    pub sources: RenderSources,
    /// Options bundle.
    pub options: RenderOptions,
}

/// Control handle of a started renderer.
pub trait RendererHandle {
    /// Replace the active slot array.
    fn set_active_video_input_slots(&mut self, slots: &[Option<ActiveVideoSlot>]);

    /// Set one named parameter.
    fn set_param_value(&mut self, key: &str, value: &serde_json::Value);

    /// Set the logical-to-display scale.
    fn set_scale_factor(&mut self, scale: f64);

    /// Replace the renderer's sources object.
    fn update_image_sources(&mut self, sources: &RenderSources);

    /// Replace the peer descriptions.
    fn set_room_peer_descriptions_by_id(&mut self, peers: &PeerMap);

    /// Stop rendering and release renderer resources.
    fn stop(&mut self);
}

/// Renderer engine: starts a renderer and yields its control handle.
#[allow(async_fn_in_trait)]
pub trait RendererEngine {
    /// Control handle returned on successful startup.
    type Handle: RendererHandle;

    /// Start rendering. No reconciliation runs while this is pending.
    async fn start(&mut self, request: StartRequest) -> Result<Self::Handle, RendererError>;
}
