// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report structures for JSON export.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DiagnosticEventKind;

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// When the report was generated (RFC 3339)
    pub generated_at: String,
    /// Version of the crate that generated the report
    pub version: String,
    /// When collection started (RFC 3339)
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
        }
    }
}

/// An event with its time expressed relative to the start of collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub offset_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(timestamp: Instant, started_at: Instant, kind: DiagnosticEventKind) -> Self {
        Self {
            offset_ms: timestamp.saturating_duration_since(started_at).as_millis() as u64,
            kind,
        }
    }
}

/// The exported report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub events: Vec<SerializableEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LifecycleEvent;
    use std::time::Duration;

    #[test]
    fn offset_is_relative_to_start() {
        let start = Instant::now();
        let event = SerializableEvent::new(
            start + Duration::from_millis(40),
            start,
            DiagnosticEventKind::Lifecycle {
                event: LifecycleEvent::Cancelled { bar: 1 },
            },
        );
        assert_eq!(event.offset_ms, 40);
    }

    #[test]
    fn event_before_start_saturates_to_zero() {
        let early = Instant::now();
        let start = early + Duration::from_millis(5);
        let event = SerializableEvent::new(
            early,
            start,
            DiagnosticEventKind::Lifecycle {
                event: LifecycleEvent::Cancelled { bar: 1 },
            },
        );
        assert_eq!(event.offset_ms, 0);
    }

    #[test]
    fn metadata_carries_crate_version() {
        let metadata = ReportMetadata::new(Utc::now(), 10, 2);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(metadata.event_count, 2);
    }
}
