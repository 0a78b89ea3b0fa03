// SPDX-License-Identifier: MPL-2.0
//! Collaborators the container drives but does not implement.
//!
//! Hosts report completions asynchronously: `request_layout` is answered by
//! [`Message::LayoutReady`](super::Message::LayoutReady) and
//! `start_transition` by
//! [`Message::TransitionFinished`](super::Message::TransitionFinished), both
//! carrying the token they were given.

use crate::domain::infobar::{AnimationDuration, BarId};

use super::bar::BarContent;
use super::paired::RemoteHandle;
use super::sequencer::TransitionToken;

/// Where a new bar view goes in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachPosition {
    /// Index 0.
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Show,
    Hide,
}

/// One enter or exit animation of a single bar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub token: TransitionToken,
    pub bar: BarId,
    pub kind: TransitionKind,
    /// Vertical offset in pixels at the start.
    pub from_offset: i32,
    pub to_offset: i32,
    pub duration: AnimationDuration,
}

/// The view system that renders bars.
pub trait HostView {
    /// Height of an attached bar view, in pixels.
    fn measure(&mut self, bar: BarId) -> u32;

    /// Attaches a bar view, hidden until its show transition starts.
    fn attach(&mut self, bar: BarId, content: &BarContent, position: AttachPosition);

    /// Replaces the content of an attached view.
    fn refresh(&mut self, bar: BarId, content: &BarContent);

    fn detach(&mut self, bar: BarId);

    fn is_attached(&self, bar: BarId) -> bool;

    fn attached_count(&self) -> usize;

    /// Asks for a single `LayoutReady(token)` after the next layout pass.
    fn request_layout(&mut self, token: TransitionToken);

    /// Starts an animation; `TransitionFinished(transition.token)` follows.
    fn start_transition(&mut self, transition: Transition);

    /// Attaches the container view that holds the bar stack.
    fn attach_container(&mut self);

    fn detach_container(&mut self);
}

/// The subsystem on the far side of a [`PairedHandle`](super::PairedHandle).
pub trait Counterpart {
    fn notify_closed(&mut self, handle: RemoteHandle);

    fn notify_confirmed(&mut self, handle: RemoteHandle, accepted: bool);

    fn notify_auto_login_result(&mut self, handle: RemoteHandle, result: &str);

    /// Text of an auto-login bar offering to sign in as `account`.
    fn display_message(&mut self, handle: RemoteHandle, account: &str) -> String;
}

/// Platform accounts, queried for auto-login bars.
///
/// `auth_token` may block and is only called from a worker.
pub trait AccountService: Send + Sync {
    fn signed_in_account(&self) -> Option<String>;

    fn auth_token(&self, account: &str, token_type: &str) -> Option<String>;
}
