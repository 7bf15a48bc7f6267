// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock image probe.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use vidslot_port::{ImageProbe, ProbeError};

/// Image probe that succeeds for every URL except a configured failing set.
///
/// Clones share the probe log, so a test can keep one clone and hand the
/// other to the compositor.
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    failing: BTreeSet<String>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl MockProbe {
    /// Probe where every URL loads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe where the given URLs fail to load.
    pub fn failing<I, U>(urls: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            failing: urls.into_iter().map(Into::into).collect(),
            probed: Arc::default(),
        }
    }

    /// URLs probed so far, in probe order.
    pub fn probed(&self) -> Vec<String> {
        self.probed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ImageProbe for MockProbe {
    async fn probe(&self, _name: &str, url: &str) -> Result<(), ProbeError> {
        self.probed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());
        if self.failing.contains(url) {
            return Err(ProbeError {
                url: url.to_owned(),
                reason: "mock load failure".into(),
            });
        }
        Ok(())
    }
}
