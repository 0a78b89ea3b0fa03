// SPDX-License-Identifier: MPL-2.0
//! Linkage between a local bar and a resource owned by the counterpart.
//!
//! Both sides may initiate closure. The handle value moves to zero exactly
//! once, through an atomic swap, so whichever path runs first wins and the
//! other observes zero and does nothing.

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::infobar::BarId;
use crate::error::ProtocolError;

use super::host::Counterpart;

/// Opaque, non-zero token referencing a counterpart resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteHandle(NonZeroU64);

impl RemoteHandle {
    /// Wraps a raw token received from the counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ZeroHandle`] for the zero token.
    pub fn new(raw: u64) -> Result<Self, ProtocolError> {
        NonZeroU64::new(raw).map(Self).ok_or(ProtocolError::ZeroHandle)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Close-once pairing of a bar with one counterpart resource.
#[derive(Debug)]
pub struct PairedHandle {
    remote: AtomicU64,
    bound: Option<BarId>,
}

impl PairedHandle {
    #[must_use]
    pub fn new(remote: RemoteHandle) -> Self {
        Self {
            remote: AtomicU64::new(remote.get()),
            bound: None,
        }
    }

    /// Builds a handle from a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ZeroHandle`] for the zero token.
    pub fn from_raw(raw: u64) -> Result<Self, ProtocolError> {
        RemoteHandle::new(raw).map(Self::new)
    }

    /// Binds the handle to its bar. Rebinding to the same bar is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AlreadyBound`] if bound to a different bar.
    pub fn bind(&mut self, bar: BarId) -> Result<(), ProtocolError> {
        match self.bound {
            Some(bound) if bound != bar => Err(ProtocolError::AlreadyBound {
                bound,
                requested: bar,
            }),
            _ => {
                self.bound = Some(bar);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn bound_bar(&self) -> Option<BarId> {
        self.bound
    }

    /// The live handle, or `None` once either side has closed it.
    #[must_use]
    pub fn current(&self) -> Option<RemoteHandle> {
        RemoteHandle::new(self.remote.load(Ordering::Acquire)).ok()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.current().is_none()
    }

    /// Zeroes the handle and returns the value it held, if it was live.
    ///
    /// Only one caller ever receives `Some`.
    pub fn take(&self) -> Option<RemoteHandle> {
        RemoteHandle::new(self.remote.swap(0, Ordering::AcqRel)).ok()
    }

    /// Local side closes: tells the counterpart unless it already closed.
    ///
    /// Returns the handle the counterpart was notified about, if any.
    pub fn close_from_local<C: Counterpart + ?Sized>(
        &self,
        counterpart: &mut C,
    ) -> Option<RemoteHandle> {
        let handle = self.take()?;
        counterpart.notify_closed(handle);
        Some(handle)
    }
}

/// Allocator of counterpart tokens, owned by whoever plays the counterpart.
///
/// Never hands out zero and never reuses a value.
#[derive(Debug)]
pub struct HandleRegistry {
    next: NonZeroU64,
    live: HashSet<u64>,
}

impl HandleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: NonZeroU64::MIN,
            live: HashSet::new(),
        }
    }

    pub fn allocate(&mut self) -> RemoteHandle {
        let handle = RemoteHandle(self.next);
        self.next = self.next.saturating_add(1);
        self.live.insert(handle.get());
        handle
    }

    /// Releases a handle. Returns `false` if it was not live.
    pub fn release(&mut self, handle: RemoteHandle) -> bool {
        self.live.remove(&handle.get())
    }

    #[must_use]
    pub fn is_live(&self, handle: RemoteHandle) -> bool {
        self.live.contains(&handle.get())
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
