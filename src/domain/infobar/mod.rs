// SPDX-License-Identifier: MPL-2.0
//! Infobar domain types.
//!
//! Identity and timing value objects shared by the container, the
//! sequencer and the configuration layer.

pub mod newtypes;

pub use newtypes::{animation_bounds, AnimationDuration, BarId, BarIdSource, TabId};
