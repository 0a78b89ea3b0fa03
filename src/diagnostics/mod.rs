// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording protocol warnings and bar lifecycle
//! milestones.
//!
//! # Architecture
//!
//! - [`DiagnosticsHandle`]: cloneable sender held by containers and workers
//! - [`DiagnosticsCollector`]: owner of the channel receiver and ring buffer
//! - [`CircularBuffer`]: generic ring buffer with bounded capacity
//! - [`DiagnosticReport`]: JSON export format

mod buffer;
mod collector;
mod events;
mod report;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{DiagnosticEvent, DiagnosticEventKind, LifecycleEvent, WarningEvent, WarningType};
pub use report::{DiagnosticReport, ReportMetadata, SerializableEvent};
