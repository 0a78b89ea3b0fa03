// SPDX-License-Identifier: MPL-2.0
//! Infobar newtypes.
//!
//! This module provides type-safe wrappers for bar identity and
//! animation timing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// =============================================================================
// BarId
// =============================================================================

/// Opaque identity of a bar, unique for the lifetime of its [`BarIdSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BarId(u64);

impl BarId {
    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bar#{}", self.0)
    }
}

/// Allocator for [`BarId`]s.
///
/// Owned by the application and shared with every container it creates, so
/// ids stay unique even when bars move between containers.
#[derive(Debug)]
pub struct BarIdSource {
    next: AtomicU64,
}

impl BarIdSource {
    /// Creates a source whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocates the next id.
    pub fn next_id(&self) -> BarId {
        BarId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for BarIdSource {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TabId
// =============================================================================

/// Identifier of the tab (document) that owns a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u32);

impl TabId {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

// =============================================================================
// Animation Bounds
// =============================================================================

/// Animation duration bounds (0 to 5000 milliseconds).
pub mod animation_bounds {
    /// Minimum duration; zero means transitions complete on the next frame.
    pub const MIN_MS: u64 = 0;
    /// Maximum duration.
    pub const MAX_MS: u64 = 5000;
    /// Default duration of a show or hide transition.
    pub const DEFAULT_MS: u64 = 500;
}

// =============================================================================
// AnimationDuration
// =============================================================================

/// Duration of one show or hide transition, clamped to
/// [`animation_bounds::MIN_MS`]..=[`animation_bounds::MAX_MS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDuration(u64);

impl AnimationDuration {
    /// Creates a new duration, clamping to the valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(animation_bounds::MIN_MS, animation_bounds::MAX_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for AnimationDuration {
    fn default() -> Self {
        Self(animation_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_ids_are_unique_and_increasing() {
        let source = BarIdSource::new();
        let a = source.next_id();
        let b = source.next_id();
        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(a.value(), 1);
    }

    #[test]
    fn bar_id_display() {
        let source = BarIdSource::new();
        assert_eq!(source.next_id().to_string(), "bar#1");
    }

    #[test]
    fn animation_duration_clamps() {
        assert_eq!(
            AnimationDuration::from_millis(60_000).millis(),
            animation_bounds::MAX_MS
        );
        assert_eq!(AnimationDuration::from_millis(250).millis(), 250);
    }

    #[test]
    fn animation_duration_default() {
        assert_eq!(
            AnimationDuration::default().as_duration(),
            Duration::from_millis(animation_bounds::DEFAULT_MS)
        );
    }
}
