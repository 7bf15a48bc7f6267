// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless test harness for vidslot-port implementations.
//!
//! This crate provides:
//! - MockSurfaces: records surface creation, binding, and release
//! - MockRenderer / MockHandle: records every renderer control call
//! - MockTransport: an in-memory roster
//! - MockProbe: image probe with configurable failures
//! - fixtures for building participants
//!
//! # Design
//!
//! Mocks never render or load anything. They keep just enough state to let
//! tests assert on what the compositor asked for.

mod fixtures;
mod probe;
mod renderer;
mod surfaces;
mod transport;

pub use fixtures::*;
pub use probe::*;
pub use renderer::*;
pub use surfaces::*;
pub use transport::*;
