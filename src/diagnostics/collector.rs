// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! Containers hold a [`DiagnosticsHandle`] and report through it; the
//! application owns the [`DiagnosticsCollector`] and drains the channel into
//! its ring buffer whenever it is convenient.

use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

use super::report::{DiagnosticReport, ReportMetadata, SerializableEvent};
use super::{
    BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, LifecycleEvent,
    WarningEvent, WarningType,
};

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and `Send`; sends never block and drop the event when
/// the channel is full.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Logs a warning event.
    pub fn log_warning(&self, warning_event: WarningEvent) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Warning {
            event: warning_event,
        });
        let _ = self.event_tx.try_send(event);
    }

    /// Logs a warning from a category and message.
    pub fn log_warning_with(&self, warning_type: WarningType, message: impl Into<String>) {
        self.log_warning(WarningEvent::new(warning_type, message));
    }

    /// Logs a lifecycle milestone.
    pub fn log_lifecycle(&self, lifecycle: LifecycleEvent) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Lifecycle { event: lifecycle });
        let _ = self.event_tx.try_send(event);
    }
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    /// Monotonic start, for relative offsets.
    collection_started_at: Instant,
    /// Wall-clock start, for report metadata.
    collection_started_at_utc: DateTime<Utc>,
}

/// Events buffered in the channel between two `process_pending` calls.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every pending event from the channel into the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    /// Returns the stored warnings of one category.
    pub fn warnings_of(&self, warning_type: WarningType) -> impl Iterator<Item = &WarningEvent> {
        self.buffer.iter().filter_map(move |event| match &event.kind {
            DiagnosticEventKind::Warning { event } if event.warning_type == warning_type => {
                Some(event)
            }
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Exports the buffer as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms = self.collection_started_at.elapsed().as_millis() as u64;

        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();

        DiagnosticReport {
            metadata: ReportMetadata::new(
                self.collection_started_at_utc,
                collection_duration_ms,
                events.len(),
            ),
            events,
        }
    }
}
