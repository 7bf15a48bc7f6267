// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Image-source merge pipeline.
//!
//! A batch of requested images is probed in full before anything is
//! committed. Either every URL loads and the batch is swapped in atomically,
//! or nothing changes.
//!
//! Overlapping batches are sequenced by a generation counter: each batch is
//! stamped when it begins, and a batch that finishes after a newer one has
//! already committed is discarded as superseded.

use futures_util::future::join_all;
use tracing::{debug, warn};
use vidslot_port::{AssetImageCell, AssetImageMap, AssetUrlResolver, ImageProbe};

use crate::error::ImageError;
use crate::merge::MergeMode;

/// A stamped, not-yet-verified image batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBatch {
    generation: u64,
    mode: MergeMode,
    requested: AssetImageMap,
}

impl ImageBatch {
    /// Stamp assigned when the batch began.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Requested images.
    pub fn requested(&self) -> &AssetImageMap {
        &self.requested
    }

    /// Probe every requested URL, waiting for all probes to settle.
    ///
    /// On failure the error names the first failing image in key order.
    pub async fn verify<P: ImageProbe>(&self, probe: &P) -> Result<(), ImageError> {
        let results = join_all(self.requested.iter().map(|(name, url)| async move {
            (name, probe.probe(name, url).await)
        }))
        .await;

        let mut failures = results
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|err| (name, err)));
        match failures.next() {
            None => Ok(()),
            Some((name, source)) => {
                let more = failures.count();
                warn!(
                    image = %name,
                    additional_failures = more,
                    generation = self.generation,
                    "image batch rejected"
                );
                Err(ImageError::AssetLoad {
                    name: name.clone(),
                    source,
                })
            }
        }
    }
}

/// Outcome of committing a verified batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    /// The batch was committed; carries the new committed map.
    Committed(AssetImageMap),
    /// A newer batch committed first; this one was discarded.
    Superseded,
}

/// Owns the committed image map.
#[derive(Debug, Default)]
pub struct ImagePipeline {
    cell: AssetImageCell,
    issued: u64,
    committed: u64,
}

impl ImagePipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed map.
    pub fn committed(&self) -> AssetImageMap {
        self.cell.snapshot()
    }

    /// Read-only view for renderers.
    pub fn resolver(&self) -> AssetUrlResolver {
        self.cell.resolver()
    }

    /// Stamp a new batch. Nothing is probed or committed yet.
    pub fn begin(&mut self, requested: AssetImageMap, mode: MergeMode) -> ImageBatch {
        self.issued += 1;
        ImageBatch {
            generation: self.issued,
            mode,
            requested,
        }
    }

    /// Commit a verified batch unless a newer one already committed.
    pub fn commit(&mut self, batch: ImageBatch) -> ImageUpdate {
        if batch.generation <= self.committed {
            debug!(
                generation = batch.generation,
                committed = self.committed,
                "discarding superseded image batch"
            );
            return ImageUpdate::Superseded;
        }
        let next = match batch.mode {
            MergeMode::Merge => {
                let mut merged = self.cell.snapshot();
                merged.extend(batch.requested);
                merged
            }
            MergeMode::Replace => batch.requested,
        };
        self.cell.replace(next.clone());
        self.committed = batch.generation;
        debug!(generation = batch.generation, images = next.len(), "committed image batch");
        ImageUpdate::Committed(next)
    }

    /// Begin, verify, and commit one batch.
    pub async fn update<P: ImageProbe>(
        &mut self,
        probe: &P,
        requested: AssetImageMap,
        mode: MergeMode,
    ) -> Result<ImageUpdate, ImageError> {
        let batch = self.begin(requested, mode);
        batch.verify(probe).await?;
        Ok(self.commit(batch))
    }
}
