// SPDX-License-Identifier: MPL-2.0
//! Diagnostics domain types.
//!
//! - [`BufferCapacity`]: how many events the diagnostics collector retains

mod newtypes;

pub use newtypes::{buffer_capacity_bounds, BufferCapacity};
