// SPDX-License-Identifier: MPL-2.0
//! The scheduling context and the one handle other threads get to it.

use tokio::sync::mpsc;

use super::container::InfoBarContainer;
use super::host::{Counterpart, HostView};
use super::message::Message;

/// Sending half given to workers and hosts. Clone + Send.
#[derive(Debug, Clone)]
pub struct Poster {
    tx: mpsc::UnboundedSender<Message>,
}

impl Poster {
    /// Queues a message. Returns `false` if the context was dropped.
    pub fn post(&self, message: Message) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Queue of messages waiting to be applied on the owning thread.
#[derive(Debug)]
pub struct SchedulingContext {
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl SchedulingContext {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    #[must_use]
    pub fn poster(&self) -> Poster {
        Poster {
            tx: self.tx.clone(),
        }
    }

    /// Applies every message queued so far, in order. Returns how many.
    pub fn run_pending<H: HostView, C: Counterpart>(
        &mut self,
        container: &mut InfoBarContainer<H, C>,
    ) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            container.update(message);
            applied += 1;
        }
        applied
    }

    /// Waits for the next message.
    pub async fn next(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Blocks the current thread until a message arrives.
    ///
    /// Must not be called from inside an async runtime.
    pub fn recv_blocking(&mut self) -> Option<Message> {
        self.rx.blocking_recv()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for SchedulingContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::infobar::BarIdSource;

    #[test]
    fn poster_reports_dropped_context() {
        let context = SchedulingContext::new();
        let poster = context.poster();
        drop(context);

        let bar = BarIdSource::new().next_id();
        assert!(!poster.post(Message::Dismiss(bar)));
    }

    #[test]
    fn posts_from_other_threads_keep_their_order() {
        let mut context = SchedulingContext::new();
        let poster = context.poster();
        let ids = BarIdSource::new();
        let bars: Vec<_> = (0..5).map(|_| ids.next_id()).collect();

        let expected = bars.clone();
        std::thread::spawn(move || {
            for bar in bars {
                poster.post(Message::Dismiss(bar));
            }
        })
        .join()
        .expect("thread panicked");

        let mut received = Vec::new();
        while !context.is_empty() {
            if let Some(Message::Dismiss(bar)) = context.recv_blocking() {
                received.push(bar);
            }
        }
        assert_eq!(received, expected);
    }
}
