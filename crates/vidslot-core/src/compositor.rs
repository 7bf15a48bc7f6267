// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compositor orchestrator.
//!
//! Owns the lifecycle (`idle → started → stopped`, `started → error`), wires
//! roster events into the [`SlotReconciler`], and forwards committed results
//! to the renderer's control handle.
//!
//! Everything runs on the caller's event loop. The only suspension points are
//! renderer startup and image probing; `&mut self` on both guarantees no
//! reconciliation pass runs while either is pending.

use core::fmt;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, trace, warn};
use vidslot_port::{
    ActiveSlotArray, AssetImageMap, BoxSize, CallEvent, CallEventKind, CallTransport, ImageProbe,
    ParamMap, PeerMap, RenderOptions, RenderSources, RendererEngine, RendererError,
    RendererErrorSink, RendererHandle, StartRequest, SurfacePort, ViewportSize,
};

use crate::active::build_active_array;
use crate::config::{
    validate_aspect_ratio, CompositorConfig, ConfigError, ConfigService, ConfigStore,
};
use crate::error::CompositorError;
use crate::filter::ParticipantFilter;
use crate::images::{ImagePipeline, ImageUpdate};
use crate::merge::MergeMode;
use crate::observer::{CompositorObserver, NoopObserver};
use crate::params::ParamStore;
use crate::projection::collect_candidates;
use crate::reconcile::{Slot, SlotReconciler};
use crate::viewport::{fit, ScaleFactor};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositorState {
    /// Constructed, never started.
    #[default]
    Idle,
    /// Renderer running, roster events wired.
    Started,
    /// Stopped by the caller.
    Stopped,
    /// The renderer reported a failure; stop before starting again.
    Error,
}

impl fmt::Display for CompositorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompositorState::Idle => "idle",
            CompositorState::Started => "started",
            CompositorState::Stopped => "stopped",
            CompositorState::Error => "error",
        })
    }
}

/// Assembles a [`Compositor`]. Missing collaborators yield an inert instance.
pub struct CompositorBuilder<R, T, S, P> {
    config: CompositorConfig,
    renderer: Option<R>,
    transport: Option<T>,
    surfaces: Option<S>,
    probe: Option<P>,
    observer: Option<Box<dyn CompositorObserver>>,
    container: BoxSize,
}

impl<R, T, S, P> CompositorBuilder<R, T, S, P> {
    /// Start from `config`.
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            config,
            renderer: None,
            transport: None,
            surfaces: None,
            probe: None,
            observer: None,
            container: BoxSize::default(),
        }
    }

    /// Start from the config persisted in `service`; defaults when none is stored.
    pub fn from_store<C: ConfigStore>(service: &ConfigService<C>) -> Result<Self, ConfigError> {
        service.load_compositor().map(Self::new)
    }

    /// Renderer engine.
    pub fn renderer(mut self, renderer: R) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Call transport.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Surface factory.
    pub fn surfaces(mut self, surfaces: S) -> Self {
        self.surfaces = Some(surfaces);
        self
    }

    /// Image probe.
    pub fn probe(mut self, probe: P) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Lifecycle observer.
    pub fn observer(mut self, observer: impl CompositorObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Initial container measurement.
    pub fn container(mut self, container: BoxSize) -> Self {
        self.container = container;
        self
    }
}

impl<R, T, S, P> CompositorBuilder<R, T, S, P>
where
    R: RendererEngine,
    T: CallTransport,
    S: SurfacePort,
    P: ImageProbe,
{
    /// Build the compositor.
    ///
    /// Never fails: configuration problems are reported to the observer and
    /// leave the instance inert, so every later operation returns
    /// [`CompositorError::Inert`].
    pub fn build(self) -> Compositor<R, T, S, P> {
        let mut observer = self
            .observer
            .unwrap_or_else(|| Box::new(NoopObserver));

        let inert = if let Err(err) = self.config.validate() {
            Some(err.to_string())
        } else if self.renderer.is_none() {
            Some("missing renderer".to_owned())
        } else if self.transport.is_none() {
            Some("missing call transport".to_owned())
        } else if self.surfaces.is_none() {
            Some("missing surface port".to_owned())
        } else if self.probe.is_none() {
            Some("missing image probe".to_owned())
        } else {
            None
        };
        if let Some(reason) = &inert {
            error!(%reason, "compositor constructed inert");
            observer.on_error(&CompositorError::Inert(reason.clone()));
        }

        Compositor {
            filter: ParticipantFilter::new(self.config.participant_ids.clone()),
            config: self.config,
            inert,
            renderer: self.renderer,
            transport: self.transport,
            surfaces: self.surfaces,
            probe: self.probe,
            observer,
            handle: None,
            errors: None,
            state: CompositorState::Idle,
            reconciler: SlotReconciler::new(),
            params: ParamStore::new(),
            images: ImagePipeline::new(),
            scale: ScaleFactor::default(),
            container: self.container,
            viewport: ViewportSize::ZERO,
            active_speaker: None,
            last_peers: None,
        }
    }
}

/// The video slot compositor.
pub struct Compositor<R: RendererEngine, T, S, P> {
    config: CompositorConfig,
    inert: Option<String>,
    renderer: Option<R>,
    transport: Option<T>,
    surfaces: Option<S>,
    probe: Option<P>,
    observer: Box<dyn CompositorObserver>,
    handle: Option<R::Handle>,
    errors: Option<UnboundedReceiver<RendererError>>,
    state: CompositorState,
    reconciler: SlotReconciler,
    filter: ParticipantFilter,
    params: ParamStore,
    images: ImagePipeline,
    scale: ScaleFactor,
    container: BoxSize,
    viewport: ViewportSize,
    active_speaker: Option<String>,
    last_peers: Option<PeerMap>,
}

impl<R, T, S, P> Compositor<R, T, S, P>
where
    R: RendererEngine,
    T: CallTransport,
    S: SurfacePort,
    P: ImageProbe,
{
    /// Current lifecycle state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Why the instance is inert, if it is.
    pub fn inert_reason(&self) -> Option<&str> {
        self.inert.as_deref()
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Committed slots, in slot order.
    pub fn slots(&self) -> &[Slot] {
        self.reconciler.slots()
    }

    /// Current active slot array.
    pub fn active_slots(&self) -> ActiveSlotArray {
        build_active_array(self.reconciler.slots(), self.config.max_video_input_slots).slots
    }

    /// Accumulated parameters.
    pub fn params(&self) -> &ParamMap {
        self.params.values()
    }

    /// Committed image map.
    pub fn images(&self) -> AssetImageMap {
        self.images.committed()
    }

    /// Participant allow-list.
    pub fn participant_ids(&self) -> &[String] {
        self.filter.ids()
    }

    /// Committed logical-to-display scale.
    pub fn scale_factor(&self) -> f64 {
        self.scale.value()
    }

    /// Last fitted viewport.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Renderer control handle while started.
    pub fn handle(&self) -> Option<&R::Handle> {
        self.handle.as_ref()
    }

    /// Surface factory.
    pub fn surfaces(&self) -> Option<&S> {
        self.surfaces.as_ref()
    }

    /// Call transport.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Mutable call transport, for hosts that own roster state through it.
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    fn inert_error(&self) -> Option<CompositorError> {
        self.inert
            .as_ref()
            .map(|reason| CompositorError::Inert(reason.clone()))
    }

    /// Start the renderer and wire roster events.
    ///
    /// Valid from `idle` or `stopped`. On renderer failure the state becomes
    /// `error` and the failure is both returned and sent to `on_error`.
    pub async fn start(&mut self) -> Result<(), CompositorError> {
        if let Some(err) = self.inert_error() {
            return Err(err);
        }
        if !matches!(self.state, CompositorState::Idle | CompositorState::Stopped) {
            return Err(CompositorError::InvalidState {
                op: "start",
                state: self.state,
            });
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return Err(CompositorError::Inert("missing renderer".into()));
        };

        let logical = self.config.logical_size();
        self.viewport = fit(self.container, self.config.aspect_ratio);
        self.scale.update(self.viewport.into(), logical);

        let (sink, errors) = RendererErrorSink::channel();
        let request = StartRequest {
            viewport: self.viewport,
            logical,
            sources: RenderSources {
                video_slots: vec![None; self.config.max_video_input_slots],
                asset_images: self.images.committed(),
            },
            options: RenderOptions {
                fps: self.config.fps,
                scale_factor: self.scale.value(),
                enable_preload: self.config.enable_preload,
                errors: sink,
                asset_urls: self.images.resolver(),
            },
        };

        debug!(?logical, viewport = ?self.viewport, "starting renderer");
        let mut handle = match renderer.start(request).await {
            Ok(handle) => handle,
            Err(err) => {
                self.state = CompositorState::Error;
                let err = CompositorError::Renderer(err);
                error!(%err, "renderer failed to start");
                self.observer.on_error(&err);
                return Err(err);
            }
        };

        self.params.replay(&mut handle);
        self.handle = Some(handle);
        self.errors = Some(errors);
        if let Some(transport) = self.transport.as_mut() {
            transport.subscribe(&CallEventKind::ALL);
            self.active_speaker = transport.active_speaker_id();
        }
        self.state = CompositorState::Started;
        self.reconcile_pass(true);

        info!(slots = self.reconciler.slots().len(), "compositor started");
        self.observer.on_start();
        Ok(())
    }

    /// Stop the renderer, unwire roster events, and release every surface.
    ///
    /// Valid from `started` or `error`.
    pub fn stop(&mut self) -> Result<(), CompositorError> {
        if !matches!(self.state, CompositorState::Started | CompositorState::Error) {
            return Err(CompositorError::InvalidState {
                op: "stop",
                state: self.state,
            });
        }
        if let Some(transport) = self.transport.as_mut() {
            transport.unsubscribe(&CallEventKind::ALL);
        }
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
        self.errors = None;
        if let Some(surfaces) = self.surfaces.as_mut() {
            let released = self.reconciler.release_all(surfaces);
            debug!(released = released.len(), "released surfaces on stop");
        }
        self.last_peers = None;
        self.state = CompositorState::Stopped;
        info!("compositor stopped");
        self.observer.on_stop();
        Ok(())
    }

    /// Feed one roster event. Returns whether the slot list changed.
    ///
    /// Events outside `started` are ignored; the next start re-derives
    /// everything from the current roster.
    pub fn handle_call_event(&mut self, event: &CallEvent) -> bool {
        if self.state != CompositorState::Started {
            trace!(kind = ?event.kind(), state = %self.state, "ignoring call event");
            return false;
        }
        if let CallEvent::ActiveSpeakerChange { peer_id } = event {
            self.active_speaker.clone_from(peer_id);
        }
        self.reconcile_pass(false)
    }

    /// One reconciliation pass. Slots, sources, and scale are pushed only when
    /// the slot list changed; `force` pushes everything (used right after startup).
    fn reconcile_pass(&mut self, force: bool) -> bool {
        let (Some(transport), Some(surfaces)) = (self.transport.as_ref(), self.surfaces.as_mut())
        else {
            return false;
        };
        let participants = transport.participants();
        let candidates =
            collect_candidates(&participants, self.active_speaker.as_deref(), &self.filter);
        let outcome = self.reconciler.reconcile(candidates.inputs, surfaces);

        let Some(handle) = self.handle.as_mut() else {
            return outcome.changed;
        };
        if outcome.changed || force {
            let active =
                build_active_array(self.reconciler.slots(), self.config.max_video_input_slots);
            if !active.overflow.is_empty() {
                warn!(
                    capacity = self.config.max_video_input_slots,
                    dropped = ?active.overflow,
                    "more video inputs than slots; dropping lowest priority"
                );
            }
            handle.set_active_video_input_slots(&active.slots);
            handle.update_image_sources(&RenderSources {
                video_slots: active.slots,
                asset_images: self.images.committed(),
            });
            handle.set_scale_factor(self.scale.value());
        }
        if force || self.last_peers.as_ref() != Some(&candidates.peers) {
            handle.set_room_peer_descriptions_by_id(&candidates.peers);
            self.last_peers = Some(candidates.peers);
        }
        outcome.changed
    }

    /// Container resized. Returns whether the committed scale changed.
    pub fn on_resize(&mut self, container: BoxSize) -> bool {
        self.container = container;
        let viewport = fit(container, self.config.aspect_ratio);
        if viewport.is_zero() {
            debug!(?container, "container not measurable yet");
            return false;
        }
        self.viewport = viewport;
        let changed = self
            .scale
            .update(viewport.into(), self.config.logical_size());
        if changed {
            if let Some(handle) = self.handle.as_mut() {
                handle.set_scale_factor(self.scale.value());
            }
        }
        changed
    }

    /// Send one parameter. See [`Compositor::send_params`].
    pub fn send_param(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.send_params(ParamMap::from([(key.into(), value)]));
    }

    /// Send parameters: recorded for replay, forwarded to a running
    /// renderer, and reported through exactly one `on_params_changed`.
    pub fn send_params(&mut self, params: ParamMap) {
        if params.is_empty() {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            for (key, value) in &params {
                handle.set_param_value(key, value);
            }
        }
        self.params.merge(params);
        self.observer.on_params_changed(self.params.values());
    }

    /// Verify and commit image sources, then push them to a running renderer.
    ///
    /// A failed probe leaves the committed map untouched and is reported to
    /// `on_error` as well as returned.
    pub async fn update_image_sources(
        &mut self,
        images: AssetImageMap,
        mode: MergeMode,
    ) -> Result<ImageUpdate, CompositorError> {
        if let Some(err) = self.inert_error() {
            return Err(err);
        }
        let Some(probe) = self.probe.as_ref() else {
            return Err(CompositorError::Inert("missing image probe".into()));
        };
        let update = match self.images.update(probe, images, mode).await {
            Ok(update) => update,
            Err(err) => {
                let err = CompositorError::Image(err);
                self.observer.on_error(&err);
                return Err(err);
            }
        };
        if let ImageUpdate::Committed(committed) = &update {
            if let Some(handle) = self.handle.as_mut() {
                handle.update_image_sources(&RenderSources {
                    video_slots: build_active_array(
                        self.reconciler.slots(),
                        self.config.max_video_input_slots,
                    )
                    .slots,
                    asset_images: committed.clone(),
                });
            }
        }
        Ok(update)
    }

    /// Update the participant allow-list. Returns whether the list changed.
    pub fn update_participant_ids(&mut self, ids: Vec<String>, mode: MergeMode) -> bool {
        let changed = self.filter.update(ids, mode);
        if changed && self.state == CompositorState::Started {
            self.reconcile_pass(false);
        }
        changed
    }

    /// Change the target aspect ratio; a running compositor restarts to re-measure.
    pub async fn update_aspect_ratio(&mut self, aspect_ratio: f64) -> Result<(), CompositorError> {
        validate_aspect_ratio(aspect_ratio)?;
        self.config.aspect_ratio = aspect_ratio;
        if self.state == CompositorState::Started {
            self.stop()?;
            self.start().await?;
        }
        Ok(())
    }

    /// Handle one renderer failure: `started` becomes `error`, `on_error` fires.
    pub fn on_renderer_error(&mut self, err: RendererError) {
        if self.state == CompositorState::Started {
            self.state = CompositorState::Error;
        }
        let err = CompositorError::Renderer(err);
        error!(%err, "renderer reported failure");
        self.observer.on_error(&err);
    }

    /// Drain failures the renderer reported through its error sink.
    /// Returns how many were handled.
    pub fn poll_renderer_errors(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.errors.as_mut() {
            while let Ok(err) = rx.try_recv() {
                pending.push(err);
            }
        }
        let handled = pending.len();
        for err in pending {
            self.on_renderer_error(err);
        }
        handled
    }
}
