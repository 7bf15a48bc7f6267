// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Image load probe port.

use thiserror::Error;

/// An image URL could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {url}: {reason}")]
pub struct ProbeError {
    /// URL that failed.
    pub url: String,
    /// Loader-specific reason.
    pub reason: String,
}

/// Verifies that an image URL loads before it is committed.
#[allow(async_fn_in_trait)]
pub trait ImageProbe {
    /// Resolve once `url` has loaded (or failed to).
    async fn probe(&self, name: &str, url: &str) -> Result<(), ProbeError>;
}
