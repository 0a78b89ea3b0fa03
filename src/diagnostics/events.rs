// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for infobar activity tracking.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Categories of warnings raised by the container and its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// `add` was called for a bar that is already present.
    DuplicateBar,
    /// `remove` or a bar action targeted a bar that is not present.
    UnknownBar,
    /// A counterpart handle was zero at construction.
    ZeroHandle,
    /// The counterpart closed a handle no live bar is paired with.
    UnknownHandle,
    /// A mutation was attempted after the container was destroyed.
    Destroyed,
    /// A hide transition found no attached view for its bar.
    StaleView,
    /// A completion arrived for a transition that is no longer valid.
    DroppedCompletion,
    /// The counterpart sent a header or payload that could not be used.
    MalformedPayload,
    /// An auto-login attempt failed.
    AutoLoginFailed,
    /// Other warning type not covered by specific categories.
    Other,
}

/// A warning with its category and a short description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// Milestones in a bar's life, recorded as they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "lifecycle", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A show transition completed.
    Shown { bar: u64, tab: Option<u32> },
    /// A hide transition completed.
    Hidden { bar: u64, tab: Option<u32> },
    /// A bar was removed before its show transition started.
    Cancelled { bar: u64 },
    /// The counterpart closed its side of a paired bar.
    CounterpartClosed { bar: u64 },
    /// The container was destroyed, discarding this many bars.
    ContainerDestroyed { tab: Option<u32>, discarded: usize },
}

/// A single diagnostic event with its capture time.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }
}

/// The different kinds of diagnostic events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    Warning { event: WarningEvent },
    Lifecycle { event: LifecycleEvent },
}
