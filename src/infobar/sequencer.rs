// SPDX-License-Identifier: MPL-2.0
//! One-at-a-time transition scheduling.
//!
//! The sequencer owns the show and hide queues and knows which transition,
//! if any, is in flight. It never talks to the host; the container asks it
//! for the next piece of work and reports completions back through the
//! token each transition was started with.

use std::collections::VecDeque;
use std::fmt;

use crate::domain::infobar::BarId;

use super::bar::InfoBar;

/// Identifies one started transition. Completions carrying any other token
/// are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken(u64);

impl TransitionToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowPhase {
    /// Attached hidden, waiting for the host's layout pass.
    AwaitingLayout,
    Entering,
}

#[derive(Debug)]
pub enum Work {
    Show { bar: BarId, phase: ShowPhase },
    /// Hidden bars have already left the container's bar list.
    Hide { bar: InfoBar },
}

#[derive(Debug)]
pub struct InFlight {
    pub token: TransitionToken,
    pub work: Work,
}

#[derive(Debug, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    Animating(InFlight),
}

/// Work popped from the queues, hides first.
#[derive(Debug)]
pub enum Next {
    Hide(InfoBar),
    Show(BarId),
}

/// A transition that ran to completion.
#[derive(Debug)]
pub enum Finished {
    Shown(BarId),
    Hidden(InfoBar),
}

#[derive(Debug, Default)]
pub struct Sequencer {
    show_queue: VecDeque<BarId>,
    hide_queue: VecDeque<InfoBar>,
    state: SequencerState,
    next_token: u64,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, SequencerState::Animating(_))
    }

    pub fn enqueue_show(&mut self, bar: BarId) {
        self.show_queue.push_back(bar);
    }

    pub fn enqueue_hide(&mut self, bar: InfoBar) {
        self.hide_queue.push_back(bar);
    }

    /// Drops a bar whose show has not started. Returns whether it was queued.
    pub fn cancel_show(&mut self, bar: BarId) -> bool {
        match self.show_queue.iter().position(|queued| *queued == bar) {
            Some(index) => {
                self.show_queue.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn queued_shows(&self) -> impl Iterator<Item = BarId> + '_ {
        self.show_queue.iter().copied()
    }

    pub fn queued_hides(&self) -> impl Iterator<Item = BarId> + '_ {
        self.hide_queue.iter().map(InfoBar::id)
    }

    /// Bars waiting to hide plus the one hiding now.
    pub fn hiding(&self) -> impl Iterator<Item = &InfoBar> {
        let in_flight = match &self.state {
            SequencerState::Animating(InFlight {
                work: Work::Hide { bar },
                ..
            }) => Some(bar),
            _ => None,
        };
        self.hide_queue.iter().chain(in_flight)
    }

    pub fn hiding_mut(&mut self) -> impl Iterator<Item = &mut InfoBar> {
        let in_flight = match &mut self.state {
            SequencerState::Animating(InFlight {
                work: Work::Hide { bar },
                ..
            }) => Some(bar),
            _ => None,
        };
        self.hide_queue.iter_mut().chain(in_flight)
    }

    /// Pops the next piece of work while idle.
    pub fn next_work(&mut self) -> Option<Next> {
        if self.is_animating() {
            return None;
        }
        if let Some(bar) = self.hide_queue.pop_front() {
            return Some(Next::Hide(bar));
        }
        self.show_queue.pop_front().map(Next::Show)
    }

    pub fn begin_show(&mut self, bar: BarId) -> TransitionToken {
        self.begin(Work::Show {
            bar,
            phase: ShowPhase::AwaitingLayout,
        })
    }

    pub fn begin_hide(&mut self, bar: InfoBar) -> TransitionToken {
        self.begin(Work::Hide { bar })
    }

    fn begin(&mut self, work: Work) -> TransitionToken {
        self.next_token += 1;
        let token = TransitionToken(self.next_token);
        self.state = SequencerState::Animating(InFlight { token, work });
        token
    }

    /// Moves a show from layout to animation. Returns the bar, or `None`
    /// if `token` is not a show waiting for layout.
    pub fn layout_ready(&mut self, token: TransitionToken) -> Option<BarId> {
        match &mut self.state {
            SequencerState::Animating(InFlight {
                token: current,
                work: Work::Show { bar, phase },
            }) if *current == token && *phase == ShowPhase::AwaitingLayout => {
                *phase = ShowPhase::Entering;
                Some(*bar)
            }
            _ => None,
        }
    }

    /// Ends the in-flight transition if `token` names it and it is animating.
    pub fn finish(&mut self, token: TransitionToken) -> Option<Finished> {
        let is_current = match &self.state {
            SequencerState::Animating(InFlight {
                token: current,
                work,
            }) => {
                *current == token
                    && !matches!(
                        work,
                        Work::Show {
                            phase: ShowPhase::AwaitingLayout,
                            ..
                        }
                    )
            }
            SequencerState::Idle => false,
        };
        if !is_current {
            return None;
        }
        match std::mem::take(&mut self.state) {
            SequencerState::Animating(InFlight { work, .. }) => Some(match work {
                Work::Show { bar, .. } => Finished::Shown(bar),
                Work::Hide { bar } => Finished::Hidden(bar),
            }),
            SequencerState::Idle => None,
        }
    }

    /// Abandons the in-flight transition without finishing it.
    pub fn abort(&mut self, token: TransitionToken) -> Option<Work> {
        match &self.state {
            SequencerState::Animating(InFlight { token: current, .. }) if *current == token => {}
            _ => return None,
        }
        match std::mem::take(&mut self.state) {
            SequencerState::Animating(InFlight { work, .. }) => Some(work),
            SequencerState::Idle => None,
        }
    }

    /// Clears queues and state. Returns every bar that was hiding.
    pub fn reset(&mut self) -> Vec<InfoBar> {
        self.show_queue.clear();
        let mut hiding: Vec<InfoBar> = self.hide_queue.drain(..).collect();
        if let SequencerState::Animating(InFlight {
            work: Work::Hide { bar },
            ..
        }) = std::mem::take(&mut self.state)
        {
            hiding.push(bar);
        }
        hiding
    }
}
