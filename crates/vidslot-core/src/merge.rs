// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Combination mode shared by image and allow-list updates.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompositorError;

/// How an update combines with the committed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Union with the committed value; incoming entries win.
    Merge,
    /// Incoming value becomes the entire committed value.
    Replace,
}

impl FromStr for MergeMode {
    type Err = CompositorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(MergeMode::Merge),
            "replace" => Ok(MergeMode::Replace),
            other => Err(CompositorError::InvalidMergeMode(other.to_owned())),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MergeMode::Merge => "merge",
            MergeMode::Replace => "replace",
        })
    }
}
