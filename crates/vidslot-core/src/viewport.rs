// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Viewport sizing and logical-to-display scale.

use vidslot_port::{BoxSize, LogicalSize, ViewportSize};

/// Largest integer rectangle of `aspect_ratio` that fits inside `container`.
///
/// Returns [`ViewportSize::ZERO`] when the aspect ratio is zero or non-finite,
/// or when the container has no measured size yet. Callers treat a zero
/// result as "not yet measurable" and retry on the next resize.
pub fn fit(container: BoxSize, aspect_ratio: f64) -> ViewportSize {
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return ViewportSize::ZERO;
    }
    if container.is_unmeasured() || !container.width.is_finite() || !container.height.is_finite() {
        return ViewportSize::ZERO;
    }

    let container_ratio = container.width / container.height;
    if container_ratio > aspect_ratio {
        // Container is wider than the target: height binds.
        ViewportSize {
            w: (container.height * aspect_ratio).floor() as u32,
            h: container.height.floor() as u32,
        }
    } else {
        ViewportSize {
            w: container.width.floor() as u32,
            h: (container.width / aspect_ratio).floor() as u32,
        }
    }
}

/// Scale mapping `logical` onto `display`, or `None` while `display` is unmeasured.
///
/// Landscape-or-square logical sizes scale by width; portrait by height.
pub fn rescale(display: BoxSize, logical: LogicalSize) -> Option<f64> {
    if display.is_unmeasured() || logical.width == 0 || logical.height == 0 {
        return None;
    }
    let logical_w = f64::from(logical.width);
    let logical_h = f64::from(logical.height);
    if logical_w / logical_h >= 1.0 {
        Some(display.width / logical_w)
    } else {
        Some(display.height / logical_h)
    }
}

/// Logical render size for an aspect ratio, with `short_side` on the shorter axis.
pub fn logical_size(aspect_ratio: f64, short_side: u32) -> LogicalSize {
    let short = f64::from(short_side);
    if aspect_ratio >= 1.0 {
        LogicalSize {
            width: (short * aspect_ratio).round() as u32,
            height: short_side,
        }
    } else {
        LogicalSize {
            width: short_side,
            height: (short / aspect_ratio).round() as u32,
        }
    }
}

/// Committed render scale; an unmeasured display never overwrites it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    value: f64,
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl ScaleFactor {
    /// Current scale.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Recompute from a display box. Returns whether the committed value changed.
    pub fn update(&mut self, display: BoxSize, logical: LogicalSize) -> bool {
        match rescale(display, logical) {
            Some(next) if (next - self.value).abs() > f64::EPSILON => {
                self.value = next;
                true
            }
            _ => false,
        }
    }
}
