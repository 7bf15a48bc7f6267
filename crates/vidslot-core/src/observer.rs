// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lifecycle notifications for application callers.

use vidslot_port::ParamMap;

use crate::error::CompositorError;

/// Receives compositor lifecycle notifications. Every method defaults to a no-op.
pub trait CompositorObserver {
    /// The compositor entered `started`.
    fn on_start(&mut self) {}

    /// The compositor entered `stopped`.
    fn on_stop(&mut self) {}

    /// A configuration or renderer failure occurred.
    fn on_error(&mut self, _error: &CompositorError) {}

    /// Parameters were sent; carries the full accumulated map.
    fn on_params_changed(&mut self, _params: &ParamMap) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CompositorObserver for NoopObserver {}
