// SPDX-License-Identifier: MPL-2.0
//! The per-tab container of live bars.
//!
//! `InfoBarContainer` owns the bars, hands transitions to the host one at a
//! time through its [`Sequencer`], and keeps paired handles consistent with
//! the counterpart. All mutation happens on the scheduling context, either
//! through the public operations or through [`InfoBarContainer::update`].
//!
//! A bar is in exactly one place at a time: the bar list (possibly also
//! queued to show, or showing), or the sequencer's hide queue once removed.

use std::collections::HashSet;
use std::sync::Arc;

use url::Url;

use crate::config::{Config, Placement};
use crate::diagnostics::{DiagnosticsHandle, LifecycleEvent, WarningEvent, WarningType};
use crate::domain::infobar::{AnimationDuration, BarId, BarIdSource, TabId};
use crate::error::ProtocolError;

use super::auto_login::{spawn_credential_lookup, AutoLoginParams, AutoLoginResult, AutoLoginState};
use super::bar::{BarKind, BarText, ConfirmBar, InfoBar, MessageBar};
use super::broadcast::{EventBroadcaster, InfoBarEvent};
use super::dispatch::Poster;
use super::host::{AccountService, AttachPosition, Counterpart, HostView, Transition, TransitionKind};
use super::message::Message;
use super::paired::RemoteHandle;
use super::sequencer::{Finished, Next, Sequencer, TransitionToken};

/// i18n key of the bar shown when an auto-login attempt fails.
pub const AUTO_LOGIN_FAILED_KEY: &str = "infobar-auto-login-failed";

/// Per-container behavior derived from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings {
    pub placement: Placement,
    pub duration: AnimationDuration,
    pub auto_login_enabled: bool,
    /// Offered instead of the signed-in account when set.
    pub extra_account: Option<String>,
}

impl ContainerSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            placement: config.placement(),
            duration: config.animation_duration(),
            auto_login_enabled: config.auto_login_enabled(),
            extra_account: config.auto_login.extra_account.clone(),
        }
    }
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct InfoBarContainer<H: HostView, C: Counterpart> {
    /// `None` for a prerender container, which never animates.
    tab: Option<TabId>,
    url: Option<Url>,
    settings: ContainerSettings,
    ids: Arc<BarIdSource>,
    bars: Vec<InfoBar>,
    sequencer: Sequencer,
    /// Handles this side closed, so a crossing counterpart close is expected.
    closed_locally: HashSet<RemoteHandle>,
    destroyed: bool,
    container_attached: bool,
    host: H,
    counterpart: C,
    accounts: Option<Arc<dyn AccountService>>,
    poster: Option<Poster>,
    events: EventBroadcaster,
    diagnostics: Option<DiagnosticsHandle>,
}

impl<H: HostView, C: Counterpart> InfoBarContainer<H, C> {
    pub fn new(tab: Option<TabId>, host: H, counterpart: C) -> Self {
        Self {
            tab,
            url: None,
            settings: ContainerSettings::default(),
            ids: Arc::new(BarIdSource::new()),
            bars: Vec::new(),
            sequencer: Sequencer::new(),
            closed_locally: HashSet::new(),
            destroyed: false,
            container_attached: false,
            host,
            counterpart,
            accounts: None,
            poster: None,
            events: EventBroadcaster::new(),
            diagnostics: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Shares an id source so bars keep unique ids across containers.
    ///
    /// Containers that exchange bars through [`Self::hand_off`] and
    /// [`Self::adopt`] must share one; a colliding id is rejected as a
    /// duplicate.
    #[must_use]
    pub fn with_id_source(mut self, ids: Arc<BarIdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Sets the page new bars are attributed to.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn with_accounts(mut self, accounts: Arc<dyn AccountService>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Where workers started by this container send their results.
    #[must_use]
    pub fn with_poster(mut self, poster: Poster) -> Self {
        self.poster = Some(poster);
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: EventBroadcaster) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn tab(&self) -> Option<TabId> {
        self.tab
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.sequencer.is_animating()
    }

    /// Live bars, in insertion order.
    pub fn bars(&self) -> impl Iterator<Item = &InfoBar> {
        self.bars.iter()
    }

    #[must_use]
    pub fn bar(&self, id: BarId) -> Option<&InfoBar> {
        self.bars.iter().find(|bar| bar.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: BarId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[must_use]
    pub fn queued_shows(&self) -> Vec<BarId> {
        self.sequencer.queued_shows().collect()
    }

    #[must_use]
    pub fn queued_hides(&self) -> Vec<BarId> {
        self.sequencer.queued_hides().collect()
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<InfoBarEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn counterpart(&self) -> &C {
        &self.counterpart
    }

    pub fn counterpart_mut(&mut self) -> &mut C {
        &mut self.counterpart
    }

    // =========================================================================
    // Creating bars
    // =========================================================================

    /// A local bar attributed to the current page.
    pub fn create_bar(&self, kind: BarKind) -> InfoBar {
        InfoBar::new(self.ids.next_id(), kind).with_origin(self.url.as_ref())
    }

    /// Adds a bar and starts showing it when the sequencer is free.
    ///
    /// Duplicates and adds after destruction are logged and ignored.
    pub fn add(&mut self, bar: InfoBar) -> bool {
        match self.try_add(bar) {
            Ok(_) => true,
            Err(err) => self.reject(&err),
        }
    }

    pub fn add_message(&mut self, message: MessageBar) -> Option<BarId> {
        let bar = self.create_bar(BarKind::Message(message));
        self.try_add(bar).map_err(|err| self.reject(&err)).ok()
    }

    /// Adds a confirm bar requested by the counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Destroyed`] after destruction.
    pub fn add_confirm_from_counterpart(
        &mut self,
        remote: RemoteHandle,
        confirm: ConfirmBar,
    ) -> Result<BarId, ProtocolError> {
        self.add_paired(remote, BarKind::Confirm(confirm))
    }

    /// Adds an auto-login bar for an `x-auto-login` header.
    ///
    /// Returns `Ok(None)` when auto-login is disabled or there is no account
    /// to offer; the counterpart then keeps ownership of its resource.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedHeader`] for an unusable header and
    /// [`ProtocolError::Destroyed`] after destruction.
    pub fn add_auto_login_from_counterpart(
        &mut self,
        remote: RemoteHandle,
        header: &str,
    ) -> Result<Option<BarId>, ProtocolError> {
        if self.destroyed {
            return Err(self.logged(ProtocolError::Destroyed));
        }
        if !self.settings.auto_login_enabled {
            tracing::debug!(handle = %remote, "auto-login disabled, not offering a bar");
            return Ok(None);
        }
        let params = AutoLoginParams::parse(header).map_err(|err| self.logged(err))?;

        let account = self.settings.extra_account.clone().or_else(|| {
            self.accounts
                .as_ref()
                .and_then(|accounts| accounts.signed_in_account())
        });
        let Some(account) = account else {
            tracing::debug!(realm = %params.realm, "no account to offer for auto-login");
            return Ok(None);
        };

        let message = self.counterpart.display_message(remote, &account);
        let state = AutoLoginState::new(params, account, message);
        self.add_paired(remote, BarKind::AutoLogin(state)).map(Some)
    }

    fn add_paired(&mut self, remote: RemoteHandle, kind: BarKind) -> Result<BarId, ProtocolError> {
        if self.destroyed {
            return Err(self.logged(ProtocolError::Destroyed));
        }
        let bar = InfoBar::paired(self.ids.next_id(), kind, remote)
            .map_err(|err| self.logged(err))?
            .with_origin(self.url.as_ref());
        self.try_add(bar).map_err(|err| self.logged(err))
    }

    fn try_add(&mut self, bar: InfoBar) -> Result<BarId, ProtocolError> {
        let id = bar.id();
        if self.destroyed {
            self.retire(bar);
            return Err(ProtocolError::Destroyed);
        }
        if self.contains(id) || self.sequencer.hiding().any(|hiding| hiding.id() == id) {
            self.retire(bar);
            return Err(ProtocolError::DuplicateBar(id));
        }
        self.bars.push(bar);
        self.sequencer.enqueue_show(id);
        self.drain();
        Ok(id)
    }

    // =========================================================================
    // Removing bars
    // =========================================================================

    /// Takes a bar out of the container.
    ///
    /// A bar whose show has not started is dropped on the spot with no
    /// transition and no events. Any other bar is queued to hide.
    pub fn remove(&mut self, id: BarId) -> bool {
        if self.destroyed {
            return self.reject(&ProtocolError::Destroyed);
        }
        let Some(index) = self.position(id) else {
            return self.reject(&ProtocolError::UnknownBar(id));
        };
        let bar = self.bars.remove(index);

        if self.sequencer.cancel_show(id) {
            tracing::debug!(bar = %id, "cancelled before its show started");
            self.record(LifecycleEvent::Cancelled { bar: id.value() });
            self.retire(bar);
            return true;
        }

        self.sequencer.enqueue_hide(bar);
        self.drain();
        true
    }

    /// Local dismissal: closes the paired handle, then removes the bar.
    pub fn dismiss(&mut self, id: BarId) -> bool {
        if self.destroyed {
            return self.reject(&ProtocolError::Destroyed);
        }
        let Some(index) = self.position(id) else {
            return self.reject(&ProtocolError::UnknownBar(id));
        };
        let bar = &mut self.bars[index];
        if !bar.mark_dismissed() {
            return false;
        }
        if let Some(closed) = bar
            .paired_handle()
            .and_then(|handle| handle.close_from_local(&mut self.counterpart))
        {
            self.closed_locally.insert(closed);
        }
        self.remove(id)
    }

    /// The counterpart closed `remote`: dismiss its bar without telling the
    /// counterpart again.
    pub fn close_from_remote(&mut self, remote: RemoteHandle) -> bool {
        if self.destroyed {
            tracing::debug!(handle = %remote, "counterpart close after destruction ignored");
            return false;
        }

        let live = self
            .bars
            .iter()
            .chain(self.sequencer.hiding())
            .find(|bar| bar.remote() == Some(remote))
            .map(|bar| {
                // Zero first so the dismissal below does not notify.
                if let Some(handle) = bar.paired_handle() {
                    handle.take();
                }
                bar.id()
            });

        match live {
            Some(id) => {
                self.record(LifecycleEvent::CounterpartClosed { bar: id.value() });
                // A bar that is already hiding only needed its handle zeroed.
                !self.contains(id) || self.dismiss(id)
            }
            None if self.closed_locally.remove(&remote) => {
                tracing::debug!(handle = %remote, "counterpart close crossed a local close");
                false
            }
            None => self.reject(&ProtocolError::UnknownHandle(remote.get())),
        }
    }

    /// Dismisses every bar matching `predicate`.
    ///
    /// Works on a snapshot: bars added by the dismissals themselves are not
    /// visited.
    pub fn dismiss_all(&mut self, predicate: impl Fn(&InfoBar) -> bool) -> usize {
        let snapshot: Vec<BarId> = self
            .bars
            .iter()
            .filter(|&bar| predicate(bar))
            .map(InfoBar::id)
            .collect();
        snapshot
            .into_iter()
            .filter(|id| self.contains(*id) && self.dismiss(*id))
            .count()
    }

    /// Dismisses every bar that should not survive navigating to `next`.
    pub fn sweep_expired(&mut self, next: &Url) -> usize {
        self.dismiss_all(|bar| bar.should_expire(next))
    }

    /// Navigation entry point: expires bars, then attributes new bars to
    /// `url`.
    pub fn on_page_started(&mut self, url: Url) -> usize {
        let expired = self.sweep_expired(&url);
        self.url = Some(url);
        expired
    }

    /// Tears everything down without animation. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        let mut discarded: Vec<InfoBar> = self.bars.drain(..).collect();
        discarded.extend(self.sequencer.reset());
        let count = discarded.len();
        for bar in discarded {
            if self.host.is_attached(bar.id()) {
                self.host.detach(bar.id());
            }
            self.retire(bar);
        }
        if self.container_attached {
            self.host.detach_container();
            self.container_attached = false;
        }

        tracing::debug!(tab = ?self.tab, discarded = count, "info bar container destroyed");
        self.record(LifecycleEvent::ContainerDestroyed {
            tab: self.tab.map(TabId::value),
            discarded: count,
        });
    }

    // =========================================================================
    // Prerender hand-off
    // =========================================================================

    /// Gives up the live bars, in order, to the container that replaces
    /// this one. Paired handles stay open.
    pub fn hand_off(mut self) -> Vec<InfoBar> {
        self.destroyed = true;
        let bars: Vec<InfoBar> = self.bars.drain(..).collect();
        for bar in self.sequencer.reset() {
            self.retire(bar);
        }
        for bar in &bars {
            if self.host.is_attached(bar.id()) {
                self.host.detach(bar.id());
            }
        }
        bars
    }

    /// Takes over bars handed off by a prerender container.
    ///
    /// Bars that should expire on `url` are closed quietly; the rest are
    /// added. Returns how many were added.
    pub fn adopt(&mut self, url: Url, bars: Vec<InfoBar>) -> usize {
        let mut adopted = 0;
        for mut bar in bars {
            if self.destroyed || bar.should_expire(&url) {
                bar.mark_dismissed();
                self.retire(bar);
                continue;
            }
            if self.add(bar) {
                adopted += 1;
            }
        }
        self.url = Some(url);
        adopted
    }

    // =========================================================================
    // Variant actions
    // =========================================================================

    pub fn on_confirm_clicked(&mut self, id: BarId, accepted: bool) -> bool {
        let remote = match self.bar(id).map(|bar| (bar.kind(), bar.remote())) {
            Some((BarKind::Confirm(_), remote)) => remote,
            Some(_) => {
                tracing::warn!(bar = %id, "confirm click on a bar that is not a confirm bar");
                return false;
            }
            None => return self.reject(&ProtocolError::UnknownBar(id)),
        };
        if let Some(remote) = remote {
            self.counterpart.notify_confirmed(remote, accepted);
        }
        self.dismiss(id)
    }

    /// Starts signing in with the bar's account.
    ///
    /// Fails straight away if the signed-in account changed since the bar
    /// was created. Otherwise the buttons are disabled until the credential
    /// worker reports back.
    pub fn on_auto_login_accepted(&mut self, id: BarId) -> bool {
        if self.destroyed {
            return self.reject(&ProtocolError::Destroyed);
        }
        let Some(state) = self.bar(id).and_then(InfoBar::auto_login) else {
            return self.reject(&ProtocolError::UnknownBar(id));
        };
        let request = state.request();

        let signed_in = self
            .accounts
            .as_ref()
            .and_then(|accounts| accounts.signed_in_account());
        if signed_in.as_deref() != Some(request.account.as_str()) {
            tracing::info!(bar = %id, "auto-login failed because the account is no longer valid");
            self.login_failed(id);
            return false;
        }

        let (Some(accounts), Some(poster)) = (self.accounts.clone(), self.poster.clone()) else {
            tracing::warn!(bar = %id, "no worker boundary configured for auto-login");
            self.login_failed(id);
            return false;
        };

        self.set_buttons_enabled(id, false);
        spawn_credential_lookup(accounts, request, poster);
        true
    }

    /// Applies a credential lookup result to every auto-login bar.
    ///
    /// Bars that asked for it are resolved; the others get their buttons
    /// back. Returns how many bars were dismissed.
    pub fn dismiss_auto_logins_for(&mut self, result: &AutoLoginResult) -> usize {
        if self.destroyed {
            tracing::debug!("auto-login result after destruction ignored");
            return 0;
        }
        let snapshot: Vec<(BarId, bool)> = self
            .bars
            .iter()
            .filter_map(|bar| bar.auto_login().map(|state| (bar.id(), state.matches(result))))
            .collect();

        let mut dismissed = 0;
        for (id, matches) in snapshot {
            if !self.contains(id) {
                continue;
            }
            if !matches {
                self.set_buttons_enabled(id, true);
                continue;
            }
            match result.token() {
                Some(token) => {
                    if let Some(remote) = self.bar(id).and_then(InfoBar::remote) {
                        self.counterpart.notify_auto_login_result(remote, token);
                    }
                    if self.dismiss(id) {
                        dismissed += 1;
                    }
                }
                None => {
                    if result.success {
                        self.warn(WarningType::MalformedPayload, "auto-login succeeded without a token");
                    }
                    self.login_failed(id);
                    dismissed += 1;
                }
            }
        }
        dismissed
    }

    pub fn dismiss_auto_logins(&mut self) -> usize {
        self.dismiss_all(|bar| bar.auto_login().is_some())
    }

    fn login_failed(&mut self, id: BarId) {
        self.warn(WarningType::AutoLoginFailed, id.to_string());
        self.dismiss(id);
        self.add_message(MessageBar::warning(BarText::key(AUTO_LOGIN_FAILED_KEY)));
    }

    fn set_buttons_enabled(&mut self, id: BarId, enabled: bool) {
        let Some(index) = self.position(id) else {
            return;
        };
        let bar = &mut self.bars[index];
        if let Some(state) = bar.auto_login_mut() {
            state.set_buttons_enabled(enabled);
        }
        let content = bar.content(self.settings.placement);
        if self.host.is_attached(id) {
            self.host.refresh(id, &content);
        }
    }

    // =========================================================================
    // Scheduling context entry point
    // =========================================================================

    pub fn update(&mut self, message: Message) {
        match message {
            Message::LayoutReady(token) => self.on_layout_ready(token),
            Message::TransitionFinished(token) => self.on_transition_finished(token),
            Message::CounterpartClosed(remote) => {
                self.close_from_remote(remote);
            }
            Message::ConfirmClicked { bar, accepted } => {
                self.on_confirm_clicked(bar, accepted);
            }
            Message::AutoLoginAccepted(bar) => {
                self.on_auto_login_accepted(bar);
            }
            Message::AutoLoginResult(result) => {
                self.dismiss_auto_logins_for(&result);
            }
            Message::Dismiss(bar) => {
                self.dismiss(bar);
            }
            Message::PageStarted(url) => {
                self.on_page_started(url);
            }
        }
    }

    // =========================================================================
    // Sequencing
    // =========================================================================

    /// Starts queued work until a transition is in flight or nothing is left.
    fn drain(&mut self) {
        if self.destroyed || self.tab.is_none() {
            return;
        }
        while let Some(next) = self.sequencer.next_work() {
            match next {
                Next::Hide(bar) => self.start_hide(bar),
                Next::Show(id) => self.start_show(id),
            }
        }
    }

    fn start_show(&mut self, id: BarId) {
        let Some(bar) = self.bar(id) else {
            tracing::debug!(bar = %id, "queued bar is gone, skipping its show");
            return;
        };
        let content = bar.content(self.settings.placement);
        let position = match self.settings.placement {
            Placement::Top => AttachPosition::Back,
            Placement::Bottom => AttachPosition::Front,
        };

        if !self.container_attached {
            self.host.attach_container();
            self.container_attached = true;
        }
        self.host.attach(id, &content, position);
        let token = self.sequencer.begin_show(id);
        self.host.request_layout(token);
    }

    fn start_hide(&mut self, bar: InfoBar) {
        let id = bar.id();
        if !self.host.is_attached(id) {
            if bar.was_revealed() {
                self.warn(WarningType::StaleView, format!("{id} lost its view before hiding"));
                self.finish_hide(bar);
            } else {
                tracing::debug!(bar = %id, "bar was never revealed, discarding without transition");
                self.retire(bar);
                self.detach_container_if_empty();
            }
            return;
        }
        let offset = self.offscreen_offset(id);
        let token = self.sequencer.begin_hide(bar);
        self.host.start_transition(Transition {
            token,
            bar: id,
            kind: TransitionKind::Hide,
            from_offset: 0,
            to_offset: offset,
            duration: self.settings.duration,
        });
    }

    fn on_layout_ready(&mut self, token: TransitionToken) {
        let Some(id) = self.sequencer.layout_ready(token) else {
            self.drop_completion(token);
            return;
        };

        if !self.contains(id) {
            // Removed while waiting for layout; its queued hide finds no view.
            tracing::debug!(bar = %id, "bar removed before layout, not revealing it");
            self.sequencer.abort(token);
            self.host.detach(id);
            self.detach_container_if_empty();
            self.drain();
            return;
        }

        let offset = self.offscreen_offset(id);
        self.host.start_transition(Transition {
            token,
            bar: id,
            kind: TransitionKind::Show,
            from_offset: offset,
            to_offset: 0,
            duration: self.settings.duration,
        });
    }

    fn on_transition_finished(&mut self, token: TransitionToken) {
        let Some(finished) = self.sequencer.finish(token) else {
            self.drop_completion(token);
            return;
        };

        match finished {
            Finished::Shown(id) => {
                let shown = self
                    .bars
                    .iter_mut()
                    .chain(self.sequencer.hiding_mut())
                    .find(|bar| bar.id() == id);
                if let Some(bar) = shown {
                    bar.mark_revealed();
                    self.emit(InfoBarEvent::added, id);
                    self.record(LifecycleEvent::Shown {
                        bar: id.value(),
                        tab: self.tab.map(TabId::value),
                    });
                } else {
                    tracing::debug!(bar = %id, "show finished for a bar that is gone");
                }
            }
            Finished::Hidden(bar) => {
                let id = bar.id();
                if self.host.is_attached(id) {
                    self.host.detach(id);
                } else {
                    self.warn(WarningType::StaleView, format!("{id} had no view to detach"));
                }
                self.finish_hide(bar);
            }
        }

        self.drain();
    }

    /// Reports a revealed bar as gone and lets it go.
    fn finish_hide(&mut self, bar: InfoBar) {
        let id = bar.id();
        self.emit(InfoBarEvent::removed, id);
        self.record(LifecycleEvent::Hidden {
            bar: id.value(),
            tab: self.tab.map(TabId::value),
        });
        self.retire(bar);
        self.detach_container_if_empty();
    }

    fn drop_completion(&mut self, token: TransitionToken) {
        tracing::debug!(%token, "dropping completion for a transition that is no longer current");
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_warning(WarningEvent::new(
                WarningType::DroppedCompletion,
                token.to_string(),
            ));
        }
        self.drain();
    }

    fn offscreen_offset(&mut self, id: BarId) -> i32 {
        let height = i32::try_from(self.host.measure(id)).unwrap_or(i32::MAX);
        match self.settings.placement {
            Placement::Top => -height,
            Placement::Bottom => height,
        }
    }

    fn detach_container_if_empty(&mut self) {
        if self.container_attached && self.host.attached_count() == 0 {
            self.host.detach_container();
            self.container_attached = false;
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn position(&self, id: BarId) -> Option<usize> {
        self.bars.iter().position(|bar| bar.id() == id)
    }

    /// Final step for a bar leaving the container: make sure the
    /// counterpart hears about it once.
    fn retire(&mut self, bar: InfoBar) {
        if let Some(closed) = bar
            .paired_handle()
            .and_then(|handle| handle.close_from_local(&mut self.counterpart))
        {
            tracing::debug!(bar = %bar.id(), "closed counterpart handle of retired bar");
            self.closed_locally.insert(closed);
        }
    }

    fn emit(&self, event: fn(TabId, BarId) -> InfoBarEvent, id: BarId) {
        if let Some(tab) = self.tab {
            self.events.emit(event(tab, id));
        }
    }

    fn record(&self, event: LifecycleEvent) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_lifecycle(event);
        }
    }

    fn warn(&self, warning_type: WarningType, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(tab = ?self.tab, ?warning_type, "{message}");
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_warning(WarningEvent::new(warning_type, message));
        }
    }

    /// Logs a protocol violation and hands it back.
    fn logged(&self, err: ProtocolError) -> ProtocolError {
        self.warn(warning_type_for(&err), err.to_string());
        err
    }

    /// Logs a protocol violation. Always `false`.
    fn reject(&self, err: &ProtocolError) -> bool {
        self.warn(warning_type_for(err), err.to_string());
        false
    }
}

fn warning_type_for(err: &ProtocolError) -> WarningType {
    match err {
        ProtocolError::DuplicateBar(_) => WarningType::DuplicateBar,
        ProtocolError::UnknownBar(_) => WarningType::UnknownBar,
        ProtocolError::ZeroHandle => WarningType::ZeroHandle,
        ProtocolError::Destroyed => WarningType::Destroyed,
        ProtocolError::UnknownHandle(_) => WarningType::UnknownHandle,
        ProtocolError::MalformedHeader(_) => WarningType::MalformedPayload,
        ProtocolError::AlreadyBound { .. } => WarningType::Other,
    }
}
