// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compositor configuration and the storage port it is loaded through.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use vidslot_port::LogicalSize;

use crate::viewport::logical_size;

/// Key the compositor config is stored under.
pub const COMPOSITOR_CONFIG_KEY: &str = "compositor";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Load the compositor config, falling back to defaults, and validate it.
    pub fn load_compositor(&self) -> Result<CompositorConfig, ConfigError> {
        let config = self
            .load::<CompositorConfig>(COMPOSITOR_CONFIG_KEY)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

/// Tunables for one compositor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositorConfig {
    /// Capacity of the active slot array.
    pub max_video_input_slots: usize,
    /// Renderer frame rate.
    pub fps: u32,
    /// Target viewport aspect ratio (width / height).
    pub aspect_ratio: f64,
    /// Logical resolution of the shorter side.
    pub logical_short_side: u32,
    /// Ask the renderer to preload assets.
    pub enable_preload: bool,
    /// Initial participant allow-list; empty admits everyone.
    pub participant_ids: Vec<String>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_video_input_slots: 20,
            fps: 30,
            aspect_ratio: 16.0 / 9.0,
            logical_short_side: 720,
            enable_preload: true,
            participant_ids: Vec::new(),
        }
    }
}

impl CompositorConfig {
    /// Reject values the compositor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_video_input_slots == 0 {
            return Err(ConfigError::Invalid(
                "maxVideoInputSlots must be at least 1".into(),
            ));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be at least 1".into()));
        }
        validate_aspect_ratio(self.aspect_ratio)?;
        if self.logical_short_side == 0 {
            return Err(ConfigError::Invalid(
                "logicalShortSide must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Logical render size implied by the aspect ratio.
    pub fn logical_size(&self) -> LogicalSize {
        logical_size(self.aspect_ratio, self.logical_short_side)
    }
}

/// Aspect ratios must be finite and positive.
pub fn validate_aspect_ratio(aspect_ratio: f64) -> Result<(), ConfigError> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "aspectRatio must be finite and positive, got {aspect_ratio}"
        )))
    }
}
