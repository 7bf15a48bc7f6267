// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Video-input slot reconciliation engine.
//!
//! Turns a live call roster into a stable, bounded list of video slots and
//! keeps a renderer in sync with it:
//! - [`projection`] normalizes transport records into typed inputs
//! - [`reconcile`] diffs inputs against committed slots and manages surfaces
//! - [`compositor`] owns the lifecycle and drives everything from roster events
//!
//! The engine is single-threaded and free of I/O. Renderers, transports,
//! surfaces, and image probes are reached only through the traits in
//! `vidslot-port`.

pub mod active;
pub mod compositor;
pub mod config;
pub mod error;
pub mod filter;
pub mod images;
pub mod merge;
pub mod observer;
pub mod params;
pub mod projection;
pub mod reconcile;
pub mod viewport;

pub use active::{build_active_array, ActiveSlots};
pub use compositor::{Compositor, CompositorBuilder, CompositorState};
pub use config::{CompositorConfig, ConfigError, ConfigService, ConfigStore};
pub use error::{CompositorError, ImageError};
pub use filter::ParticipantFilter;
pub use images::{ImageBatch, ImagePipeline, ImageUpdate};
pub use merge::MergeMode;
pub use observer::{CompositorObserver, NoopObserver};
pub use params::ParamStore;
pub use projection::{collect_candidates, Candidates};
pub use reconcile::{ReconcileOutcome, Slot, SlotReconciler, SurfaceAction};
pub use viewport::{fit, ScaleFactor};
