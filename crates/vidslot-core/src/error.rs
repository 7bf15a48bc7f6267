// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types surfaced by the compositor.

use thiserror::Error;
use vidslot_port::{ProbeError, RendererError};

use crate::compositor::CompositorState;
use crate::config::ConfigError;

/// Image batch rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// One image in the batch failed to load; nothing was committed.
    #[error("image {name:?} failed to load")]
    AssetLoad {
        /// Logical image name that failed (first in key order).
        name: String,
        /// Probe failure.
        #[source]
        source: ProbeError,
    },
}

/// Top-level compositor error.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// Construction was missing a collaborator or had invalid config; the
    /// instance exists but cannot run.
    #[error("compositor is inert: {0}")]
    Inert(String),
    /// Merge mode was neither `merge` nor `replace`.
    #[error("invalid merge mode {0:?}; expected \"merge\" or \"replace\"")]
    InvalidMergeMode(String),
    /// Lifecycle operation not valid in the current state.
    #[error("cannot {op} while {state}")]
    InvalidState {
        /// Operation attempted.
        op: &'static str,
        /// State at the time.
        state: CompositorState,
    },
    /// Image batch rejected.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// Renderer startup or runtime failure.
    #[error(transparent)]
    Renderer(#[from] RendererError),
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
