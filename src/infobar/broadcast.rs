// SPDX-License-Identifier: MPL-2.0
//! Observer notifications for completed transitions.

use tokio::sync::broadcast;

use crate::domain::infobar::{BarId, TabId};

/// Events kept for slow receivers before they start lagging.
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoBarEventKind {
    Added,
    Removed,
}

/// Sent once per completed show or hide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoBarEvent {
    pub kind: InfoBarEventKind,
    pub tab_id: TabId,
    pub bar_id: BarId,
}

impl InfoBarEvent {
    #[must_use]
    pub fn added(tab_id: TabId, bar_id: BarId) -> Self {
        Self {
            kind: InfoBarEventKind::Added,
            tab_id,
            bar_id,
        }
    }

    #[must_use]
    pub fn removed(tab_id: TabId, bar_id: BarId) -> Self {
        Self {
            kind: InfoBarEventKind::Removed,
            tab_id,
            bar_id,
        }
    }
}

/// Fan-out of [`InfoBarEvent`]s to any number of observers.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<InfoBarEvent>,
}

impl EventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InfoBarEvent> {
        self.tx.subscribe()
    }

    /// Sends to current subscribers. Having none is not an error.
    pub fn emit(&self, event: InfoBarEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(?event, "no observers for info bar event");
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains everything currently buffered for `rx`.
///
/// Lagged receivers skip what they missed.
pub fn drain_events(rx: &mut broadcast::Receiver<InfoBarEvent>) -> Vec<InfoBarEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "info bar observer lagged");
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::infobar::BarIdSource;

    #[test]
    fn every_subscriber_sees_every_event() {
        let broadcaster = EventBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();
        let bar = BarIdSource::new().next_id();
        let tab = TabId::new(1);

        broadcaster.emit(InfoBarEvent::added(tab, bar));
        broadcaster.emit(InfoBarEvent::removed(tab, bar));

        let expected = vec![InfoBarEvent::added(tab, bar), InfoBarEvent::removed(tab, bar)];
        assert_eq!(drain_events(&mut first), expected);
        assert_eq!(drain_events(&mut second), expected);
    }

    #[test]
    fn emit_without_subscribers_is_silent() {
        let broadcaster = EventBroadcaster::new();
        broadcaster.emit(InfoBarEvent::added(TabId::new(1), BarIdSource::new().next_id()));
    }
}
