// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration constants.

use crate::domain::diagnostics::buffer_capacity_bounds;
use crate::domain::infobar::animation_bounds;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Default duration of a show or hide transition (milliseconds).
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = animation_bounds::DEFAULT_MS;

/// Maximum accepted transition duration (milliseconds).
pub const MAX_ANIMATION_DURATION_MS: u64 = animation_bounds::MAX_MS;

// ==========================================================================
// Auto-login Defaults
// ==========================================================================

/// Auto-login bars are offered unless the user turned them off.
pub const DEFAULT_AUTO_LOGIN_ENABLED: bool = true;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::DEFAULT;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::MIN;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::MAX;
