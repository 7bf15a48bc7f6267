// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sizes exchanged between the host, the compositor, and renderers.

use serde::{Deserialize, Serialize};

/// Measured box of the host container, in display units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    /// Measured width.
    pub width: f64,
    /// Measured height.
    pub height: f64,
}

impl BoxSize {
    /// Box of the given dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is unmeasured (zero or negative).
    pub fn is_unmeasured(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Integer viewport rectangle that fits inside a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in whole display units.
    pub w: u32,
    /// Height in whole display units.
    pub h: u32,
}

impl ViewportSize {
    /// The "not yet measurable" result.
    pub const ZERO: Self = Self { w: 0, h: 0 };

    /// Whether this is the "not yet measurable" result.
    pub const fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl From<ViewportSize> for BoxSize {
    fn from(v: ViewportSize) -> Self {
        BoxSize::new(f64::from(v.w), f64::from(v.h))
    }
}

/// Logical render resolution the renderer composes at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalSize {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
}
