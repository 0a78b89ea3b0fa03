// SPDX-License-Identifier: MPL-2.0
//! In-memory collaborators for driving a container without a real view
//! system or counterpart: the demo binary, tests and benchmarks use them.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::infobar::BarId;
use crate::i18n::I18n;

use super::bar::{BarContent, BarText};
use super::container::InfoBarContainer;
use super::dispatch::Poster;
use super::host::{AccountService, AttachPosition, Counterpart, HostView, Transition, TransitionKind};
use super::message::Message;
use super::paired::{HandleRegistry, RemoteHandle};
use super::sequencer::TransitionToken;

/// Height reported for bars without an explicit one.
pub const DEFAULT_BAR_HEIGHT: u32 = 48;

/// A bar view as the headless host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedView {
    pub bar: BarId,
    pub text: String,
    pub height: u32,
    /// False until the show transition starts.
    pub revealed: bool,
    pub buttons_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AttachContainer,
    DetachContainer,
    Attach { bar: BarId, position: AttachPosition },
    Refresh { bar: BarId },
    Detach { bar: BarId },
    RequestLayout(TransitionToken),
    StartTransition(Transition),
}

/// A [`HostView`] that keeps views in a list and answers every request
/// with a completion message.
///
/// Completions are queued locally and handed out by
/// [`HeadlessHost::next_completion`], or posted to a scheduling context
/// when built [`with_poster`](HeadlessHost::with_poster).
#[derive(Default)]
pub struct HeadlessHost {
    views: Vec<AttachedView>,
    heights: HashMap<BarId, u32>,
    container_attached: bool,
    calls: Vec<HostCall>,
    completions: VecDeque<Message>,
    poster: Option<Poster>,
    i18n: Option<I18n>,
    transitions_in_flight: usize,
    max_transitions_in_flight: usize,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves bar text with `i18n` instead of showing raw keys.
    #[must_use]
    pub fn with_i18n(mut self, i18n: I18n) -> Self {
        self.i18n = Some(i18n);
        self
    }

    #[must_use]
    pub fn with_poster(mut self, poster: Poster) -> Self {
        self.poster = Some(poster);
        self
    }

    #[must_use]
    pub fn i18n(&self) -> Option<&I18n> {
        self.i18n.as_ref()
    }

    pub fn set_height(&mut self, bar: BarId, height: u32) {
        self.heights.insert(bar, height);
    }

    /// Views in stacking order.
    #[must_use]
    pub fn views(&self) -> &[AttachedView] {
        &self.views
    }

    #[must_use]
    pub fn view(&self, bar: BarId) -> Option<&AttachedView> {
        self.views.iter().find(|view| view.bar == bar)
    }

    #[must_use]
    pub fn attached_ids(&self) -> Vec<BarId> {
        self.views.iter().map(|view| view.bar).collect()
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    #[must_use]
    pub fn is_container_attached(&self) -> bool {
        self.container_attached
    }

    /// Transitions started, in order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.calls.iter().filter_map(|call| match call {
            HostCall::StartTransition(transition) => Some(transition),
            _ => None,
        })
    }

    /// Removes a view behind the container's back.
    pub fn force_detach(&mut self, bar: BarId) -> bool {
        let before = self.views.len();
        self.views.retain(|view| view.bar != bar);
        self.views.len() != before
    }

    /// Most transitions that were ever running at the same time.
    #[must_use]
    pub fn max_transitions_in_flight(&self) -> usize {
        self.max_transitions_in_flight
    }

    pub fn next_completion(&mut self) -> Option<Message> {
        let message = self.completions.pop_front()?;
        if matches!(message, Message::TransitionFinished(_)) {
            self.transitions_in_flight = self.transitions_in_flight.saturating_sub(1);
        }
        Some(message)
    }

    fn deliver(&mut self, message: Message) {
        match &self.poster {
            Some(poster) => {
                if !poster.post(message) {
                    tracing::debug!("scheduling context gone, dropping host completion");
                }
            }
            None => self.completions.push_back(message),
        }
    }

    fn render(&self, content: &BarContent) -> String {
        match (&self.i18n, &content.message) {
            (Some(i18n), text) => text.resolve(i18n),
            (None, BarText::Literal(text)) => text.clone(),
            (None, BarText::Key { key, .. }) => key.clone(),
        }
    }
}

impl HostView for HeadlessHost {
    fn measure(&mut self, bar: BarId) -> u32 {
        self.view(bar)
            .map(|view| view.height)
            .or_else(|| self.heights.get(&bar).copied())
            .unwrap_or(DEFAULT_BAR_HEIGHT)
    }

    fn attach(&mut self, bar: BarId, content: &BarContent, position: AttachPosition) {
        let view = AttachedView {
            bar,
            text: self.render(content),
            height: self.heights.get(&bar).copied().unwrap_or(DEFAULT_BAR_HEIGHT),
            revealed: false,
            buttons_enabled: content.buttons.as_ref().map(|buttons| buttons.enabled),
        };
        match position {
            AttachPosition::Front => self.views.insert(0, view),
            AttachPosition::Back => self.views.push(view),
        }
        self.calls.push(HostCall::Attach { bar, position });
    }

    fn refresh(&mut self, bar: BarId, content: &BarContent) {
        let text = self.render(content);
        if let Some(view) = self.views.iter_mut().find(|view| view.bar == bar) {
            view.text = text;
            view.buttons_enabled = content.buttons.as_ref().map(|buttons| buttons.enabled);
        }
        self.calls.push(HostCall::Refresh { bar });
    }

    fn detach(&mut self, bar: BarId) {
        self.views.retain(|view| view.bar != bar);
        self.calls.push(HostCall::Detach { bar });
    }

    fn is_attached(&self, bar: BarId) -> bool {
        self.view(bar).is_some()
    }

    fn attached_count(&self) -> usize {
        self.views.len()
    }

    fn request_layout(&mut self, token: TransitionToken) {
        self.calls.push(HostCall::RequestLayout(token));
        self.deliver(Message::LayoutReady(token));
    }

    fn start_transition(&mut self, transition: Transition) {
        if transition.kind == TransitionKind::Show {
            if let Some(view) = self.views.iter_mut().find(|view| view.bar == transition.bar) {
                view.revealed = true;
            }
        }
        self.calls.push(HostCall::StartTransition(transition));
        if self.poster.is_none() {
            self.transitions_in_flight += 1;
            self.max_transitions_in_flight = self
                .max_transitions_in_flight
                .max(self.transitions_in_flight);
        }
        self.deliver(Message::TransitionFinished(transition.token));
    }

    fn attach_container(&mut self) {
        self.container_attached = true;
        self.calls.push(HostCall::AttachContainer);
    }

    fn detach_container(&mut self) {
        self.container_attached = false;
        self.calls.push(HostCall::DetachContainer);
    }
}

/// Delivers queued host completions until none are left.
///
/// Returns how many were delivered.
pub fn settle<C: Counterpart>(container: &mut InfoBarContainer<HeadlessHost, C>) -> usize {
    let mut delivered = 0;
    while step(container) {
        delivered += 1;
    }
    delivered
}

/// Delivers a single queued host completion, if any.
pub fn step<C: Counterpart>(container: &mut InfoBarContainer<HeadlessHost, C>) -> bool {
    match container.host_mut().next_completion() {
        Some(message) => {
            container.update(message);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterpartCall {
    Closed(RemoteHandle),
    Confirmed(RemoteHandle, bool),
    AutoLoginResult(RemoteHandle, String),
    DisplayMessage(RemoteHandle, String),
}

/// A [`Counterpart`] that hands out handles and records what it is told.
#[derive(Debug, Default)]
pub struct RecordingCounterpart {
    registry: HandleRegistry,
    calls: Vec<CounterpartCall>,
    double_closes: usize,
}

impl RecordingCounterpart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a resource the local side will be paired with.
    pub fn open_handle(&mut self) -> RemoteHandle {
        self.registry.allocate()
    }

    /// Closes a resource from this side, as the counterpart would before
    /// sending [`Message::CounterpartClosed`].
    pub fn close_handle(&mut self, handle: RemoteHandle) -> bool {
        self.registry.release(handle)
    }

    #[must_use]
    pub fn calls(&self) -> &[CounterpartCall] {
        &self.calls
    }

    /// Handles the local side closed, in order.
    #[must_use]
    pub fn closed(&self) -> Vec<RemoteHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                CounterpartCall::Closed(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn is_open(&self, handle: RemoteHandle) -> bool {
        self.registry.is_live(handle)
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Close notifications for handles that were not open.
    #[must_use]
    pub fn double_closes(&self) -> usize {
        self.double_closes
    }
}

impl Counterpart for RecordingCounterpart {
    fn notify_closed(&mut self, handle: RemoteHandle) {
        if !self.registry.release(handle) {
            tracing::warn!(%handle, "close notification for a handle that is not open");
            self.double_closes += 1;
        }
        self.calls.push(CounterpartCall::Closed(handle));
    }

    fn notify_confirmed(&mut self, handle: RemoteHandle, accepted: bool) {
        self.calls.push(CounterpartCall::Confirmed(handle, accepted));
    }

    fn notify_auto_login_result(&mut self, handle: RemoteHandle, result: &str) {
        self.calls
            .push(CounterpartCall::AutoLoginResult(handle, result.to_string()));
    }

    fn display_message(&mut self, handle: RemoteHandle, account: &str) -> String {
        self.calls
            .push(CounterpartCall::DisplayMessage(handle, account.to_string()));
        format!("Sign in to this site as {account}?")
    }
}

/// An [`AccountService`] with a fixed set of tokens.
#[derive(Debug, Default)]
pub struct FixedAccounts {
    signed_in: Mutex<Option<String>>,
    tokens: HashMap<String, String>,
}

impl FixedAccounts {
    pub fn signed_in(account: impl Into<String>) -> Self {
        Self {
            signed_in: Mutex::new(Some(account.into())),
            tokens: HashMap::new(),
        }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Registers the token returned for `token_type`.
    #[must_use]
    pub fn with_token(mut self, token_type: impl Into<String>, token: impl Into<String>) -> Self {
        self.tokens.insert(token_type.into(), token.into());
        self
    }

    /// Simulates the user signing in or out.
    pub fn set_signed_in(&self, account: Option<&str>) {
        if let Ok(mut signed_in) = self.signed_in.lock() {
            *signed_in = account.map(str::to_string);
        }
    }
}

impl AccountService for FixedAccounts {
    fn signed_in_account(&self) -> Option<String> {
        self.signed_in.lock().ok().and_then(|signed_in| signed_in.clone())
    }

    fn auth_token(&self, account: &str, token_type: &str) -> Option<String> {
        if self.signed_in_account().as_deref() != Some(account) {
            return None;
        }
        self.tokens.get(token_type).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::infobar::{AnimationDuration, BarIdSource};
    use crate::infobar::bar::{BarKind, MessageBar};

    #[test]
    fn attach_positions_follow_the_request() {
        let ids = BarIdSource::new();
        let (a, b) = (ids.next_id(), ids.next_id());
        let content = BarKind::Message(MessageBar::info(BarText::literal("x")))
            .content(crate::config::Placement::Bottom);
        let mut host = HeadlessHost::new();

        host.attach(a, &content, AttachPosition::Back);
        host.attach(b, &content, AttachPosition::Front);
        assert_eq!(host.attached_ids(), vec![b, a]);
        assert!(!host.view(a).is_some_and(|view| view.revealed));
    }

    #[test]
    fn host_renders_keys_through_i18n() {
        let ids = BarIdSource::new();
        let bar = ids.next_id();
        let content = BarKind::Message(MessageBar::warning(BarText::key("infobar-auto-login-failed")))
            .content(crate::config::Placement::Bottom);

        let mut raw = HeadlessHost::new();
        raw.attach(bar, &content, AttachPosition::Back);
        assert_eq!(raw.views()[0].text, "infobar-auto-login-failed");

        let mut localized =
            HeadlessHost::new().with_i18n(I18n::new(Some("en-US".into()), &Config::default()));
        localized.attach(bar, &content, AttachPosition::Back);
        assert_eq!(localized.views()[0].text, "Sign-in failed.");
    }

    #[test]
    fn completions_are_queued_in_request_order() {
        let ids = BarIdSource::new();
        let bar = ids.next_id();
        let content = BarKind::Message(MessageBar::info(BarText::literal("x")))
            .content(crate::config::Placement::Bottom);
        let mut host = HeadlessHost::new();
        host.set_height(bar, 30);
        host.attach(bar, &content, AttachPosition::Back);
        assert_eq!(host.measure(bar), 30);

        let mut sequencer = crate::infobar::sequencer::Sequencer::new();
        let token = sequencer.begin_show(bar);
        host.request_layout(token);
        host.start_transition(Transition {
            token,
            bar,
            kind: TransitionKind::Show,
            from_offset: 30,
            to_offset: 0,
            duration: AnimationDuration::default(),
        });

        assert_eq!(host.next_completion(), Some(Message::LayoutReady(token)));
        assert_eq!(host.next_completion(), Some(Message::TransitionFinished(token)));
        assert_eq!(host.next_completion(), None);
        assert!(host.view(bar).is_some_and(|view| view.revealed));
        assert_eq!(host.max_transitions_in_flight(), 1);
    }

    #[test]
    fn recording_counterpart_counts_double_closes() {
        let mut counterpart = RecordingCounterpart::new();
        let handle = counterpart.open_handle();

        counterpart.notify_closed(handle);
        counterpart.notify_closed(handle);
        assert_eq!(counterpart.closed(), vec![handle, handle]);
        assert_eq!(counterpart.double_closes(), 1);
        assert_eq!(counterpart.open_count(), 0);
    }

    #[test]
    fn fixed_accounts_only_issue_tokens_to_the_signed_in_account() {
        let accounts = FixedAccounts::signed_in("fred").with_token("weblogin:a", "tok");
        assert_eq!(accounts.auth_token("fred", "weblogin:a"), Some("tok".into()));
        assert_eq!(accounts.auth_token("wilma", "weblogin:a"), None);

        accounts.set_signed_in(None);
        assert_eq!(accounts.signed_in_account(), None);
        assert_eq!(accounts.auth_token("fred", "weblogin:a"), None);
    }
}
