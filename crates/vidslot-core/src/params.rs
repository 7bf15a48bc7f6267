// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accumulated renderer parameters, replayed into every new renderer.

use vidslot_port::{ParamMap, RendererHandle};

/// Every parameter ever sent, latest value per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamStore {
    values: ParamMap,
}

impl ParamStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated parameters.
    pub fn values(&self) -> &ParamMap {
        &self.values
    }

    /// Merge `params` in; later values win.
    pub fn merge(&mut self, params: ParamMap) {
        self.values.extend(params);
    }

    /// Send every accumulated parameter to `handle`, in key order.
    pub fn replay<H: RendererHandle>(&self, handle: &mut H) {
        for (key, value) in &self.values {
            handle.set_param_value(key, value);
        }
    }
}
