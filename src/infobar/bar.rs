// SPDX-License-Identifier: MPL-2.0
//! Bar entities and their variant capabilities.

use std::sync::Arc;

use url::Url;

use crate::config::Placement;
use crate::domain::infobar::BarId;
use crate::error::ProtocolError;
use crate::i18n::I18n;

use super::auto_login::AutoLoginState;
use super::paired::{PairedHandle, RemoteHandle};

/// Text shown on a bar, either ready to display or resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarText {
    Literal(String),
    Key {
        key: String,
        args: Vec<(String, String)>,
    },
}

impl BarText {
    pub fn literal(text: impl Into<String>) -> Self {
        BarText::Literal(text.into())
    }

    pub fn key(key: impl Into<String>) -> Self {
        BarText::Key {
            key: key.into(),
            args: Vec::new(),
        }
    }

    /// Adds an interpolation argument. No effect on literal text.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let BarText::Key { args, .. } = &mut self {
            args.push((name.into(), value.into()));
        }
        self
    }

    #[must_use]
    pub fn resolve(&self, i18n: &I18n) -> String {
        match self {
            BarText::Literal(text) => text.clone(),
            BarText::Key { key, args } => {
                let args: Vec<(&str, &str)> = args
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                i18n.tr_with_args(key, &args)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    None,
    Info,
    Warning,
    AutoLogin,
    /// Encoded image supplied by the counterpart.
    Bitmap(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buttons {
    pub ok: Option<BarText>,
    pub cancel: Option<BarText>,
    pub enabled: bool,
}

/// Everything a host needs to build a bar view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarContent {
    pub icon: Icon,
    pub center_icon: bool,
    pub message: BarText,
    pub buttons: Option<Buttons>,
}

/// Severity of a plain message bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
}

/// A question with optional OK/Cancel answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmBar {
    pub message: BarText,
    pub ok: Option<BarText>,
    pub cancel: Option<BarText>,
    pub icon: Option<Arc<[u8]>>,
}

impl ConfirmBar {
    pub fn new(message: BarText) -> Self {
        Self {
            message,
            ok: None,
            cancel: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn with_buttons(mut self, ok: Option<BarText>, cancel: Option<BarText>) -> Self {
        self.ok = ok;
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<Arc<[u8]>>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBar {
    pub severity: Severity,
    pub text: BarText,
}

impl MessageBar {
    pub fn info(text: BarText) -> Self {
        Self {
            severity: Severity::Info,
            text,
        }
    }

    pub fn warning(text: BarText) -> Self {
        Self {
            severity: Severity::Warning,
            text,
        }
    }
}

/// The closed set of bar variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarKind {
    Confirm(ConfirmBar),
    AutoLogin(AutoLoginState),
    Message(MessageBar),
}

impl BarKind {
    #[must_use]
    pub fn icon(&self) -> Icon {
        match self {
            BarKind::Confirm(confirm) => confirm
                .icon
                .as_ref()
                .map_or(Icon::None, |bytes| Icon::Bitmap(Arc::clone(bytes))),
            BarKind::AutoLogin(_) => Icon::AutoLogin,
            BarKind::Message(message) => match message.severity {
                Severity::Info => Icon::Info,
                Severity::Warning => Icon::Warning,
            },
        }
    }

    /// Auto-login bars fit on one line when stacked at the top.
    #[must_use]
    pub fn should_center_icon(&self, placement: Placement) -> bool {
        matches!(self, BarKind::AutoLogin(_)) && placement == Placement::Top
    }

    #[must_use]
    pub fn content(&self, placement: Placement) -> BarContent {
        let (message, buttons) = match self {
            BarKind::Confirm(confirm) => {
                let buttons = (confirm.ok.is_some() || confirm.cancel.is_some()).then(|| Buttons {
                    ok: confirm.ok.clone(),
                    cancel: confirm.cancel.clone(),
                    enabled: true,
                });
                (confirm.message.clone(), buttons)
            }
            BarKind::AutoLogin(state) => (
                BarText::literal(state.message()),
                Some(Buttons {
                    ok: Some(BarText::key("infobar-auto-login-ok")),
                    cancel: Some(BarText::key("infobar-auto-login-cancel")),
                    enabled: state.buttons_enabled(),
                }),
            ),
            BarKind::Message(message) => (message.text.clone(), None),
        };
        BarContent {
            icon: self.icon(),
            center_icon: self.should_center_icon(placement),
            message,
            buttons,
        }
    }
}

/// One notification bar.
#[derive(Debug)]
pub struct InfoBar {
    id: BarId,
    kind: BarKind,
    paired: Option<PairedHandle>,
    expires_on_navigation: bool,
    origin: Option<Url>,
    dismissed: bool,
    /// Set once its show finished and `Added` went out.
    revealed: bool,
}

impl InfoBar {
    /// A local bar; it expires on navigation away from its origin.
    #[must_use]
    pub fn new(id: BarId, kind: BarKind) -> Self {
        Self {
            id,
            kind,
            paired: None,
            expires_on_navigation: true,
            origin: None,
            dismissed: false,
            revealed: false,
        }
    }

    /// A bar linked to a counterpart resource. The counterpart expires it.
    pub fn paired(id: BarId, kind: BarKind, remote: RemoteHandle) -> Result<Self, ProtocolError> {
        let mut handle = PairedHandle::new(remote);
        handle.bind(id)?;
        Ok(Self {
            paired: Some(handle),
            expires_on_navigation: false,
            ..Self::new(id, kind)
        })
    }

    /// Sets the page the bar belongs to. The fragment is ignored.
    #[must_use]
    pub fn with_origin(mut self, url: Option<&Url>) -> Self {
        self.origin = url.map(without_fragment);
        self
    }

    #[must_use]
    pub fn id(&self) -> BarId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &BarKind {
        &self.kind
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    #[must_use]
    pub fn auto_login(&self) -> Option<&AutoLoginState> {
        match &self.kind {
            BarKind::AutoLogin(state) => Some(state),
            _ => None,
        }
    }

    pub fn auto_login_mut(&mut self) -> Option<&mut AutoLoginState> {
        match &mut self.kind {
            BarKind::AutoLogin(state) => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub fn paired_handle(&self) -> Option<&PairedHandle> {
        self.paired.as_ref()
    }

    /// The counterpart token, while both sides are still open.
    #[must_use]
    pub fn remote(&self) -> Option<RemoteHandle> {
        self.paired.as_ref().and_then(PairedHandle::current)
    }

    pub fn set_expire_on_navigation(&mut self, expires: bool) {
        self.expires_on_navigation = expires;
    }

    #[must_use]
    pub fn expires_on_navigation(&self) -> bool {
        self.expires_on_navigation
    }

    /// True when navigating to `next` should dismiss this bar.
    ///
    /// Reloads and fragment changes keep the bar.
    #[must_use]
    pub fn should_expire(&self, next: &Url) -> bool {
        if !self.expires_on_navigation {
            return false;
        }
        match &self.origin {
            Some(origin) => *origin != without_fragment(next),
            None => true,
        }
    }

    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Returns `false` if the bar was already dismissed.
    pub fn mark_dismissed(&mut self) -> bool {
        !std::mem::replace(&mut self.dismissed, true)
    }

    #[must_use]
    pub fn was_revealed(&self) -> bool {
        self.revealed
    }

    pub fn mark_revealed(&mut self) {
        self.revealed = true;
    }

    #[must_use]
    pub fn content(&self, placement: Placement) -> BarContent {
        self.kind.content(placement)
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::infobar::BarIdSource;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    fn message_bar(ids: &BarIdSource) -> InfoBar {
        InfoBar::new(
            ids.next_id(),
            BarKind::Message(MessageBar::info(BarText::literal("hello"))),
        )
    }

    #[test]
    fn reload_and_fragment_change_do_not_expire() {
        let ids = BarIdSource::new();
        let bar = message_bar(&ids).with_origin(Some(&url("https://a.example/page#top")));

        assert!(!bar.should_expire(&url("https://a.example/page")));
        assert!(!bar.should_expire(&url("https://a.example/page#bottom")));
        assert!(bar.should_expire(&url("https://a.example/other")));
    }

    #[test]
    fn bar_without_origin_expires_on_any_navigation() {
        let ids = BarIdSource::new();
        assert!(message_bar(&ids).should_expire(&url("https://a.example/")));
    }

    #[test]
    fn paired_bars_do_not_expire_by_default() {
        let ids = BarIdSource::new();
        let remote = RemoteHandle::new(3).expect("non-zero");
        let mut bar = InfoBar::paired(
            ids.next_id(),
            BarKind::Confirm(ConfirmBar::new(BarText::literal("?"))),
            remote,
        )
        .expect("fresh handle binds");

        assert!(!bar.should_expire(&url("https://b.example/")));
        assert_eq!(bar.remote(), Some(remote));
        assert_eq!(bar.paired_handle().and_then(PairedHandle::bound_bar), Some(bar.id()));

        bar.set_expire_on_navigation(true);
        assert!(bar.should_expire(&url("https://b.example/")));
    }

    #[test]
    fn dismissed_flag_is_monotonic() {
        let ids = BarIdSource::new();
        let mut bar = message_bar(&ids);
        assert!(bar.mark_dismissed());
        assert!(!bar.mark_dismissed());
        assert!(bar.is_dismissed());
        assert!(!bar.was_revealed());
    }

    #[test]
    fn warning_message_uses_warning_icon_and_no_buttons() {
        let kind = BarKind::Message(MessageBar::warning(BarText::key("infobar-auto-login-failed")));
        let content = kind.content(Placement::Bottom);
        assert_eq!(content.icon, Icon::Warning);
        assert!(content.buttons.is_none());
        assert!(!content.center_icon);
    }

    #[test]
    fn confirm_without_labels_has_no_buttons() {
        let bare = BarKind::Confirm(ConfirmBar::new(BarText::literal("Allow?")));
        assert!(bare.content(Placement::Top).buttons.is_none());

        let with_ok = BarKind::Confirm(
            ConfirmBar::new(BarText::literal("Allow?"))
                .with_buttons(Some(BarText::literal("Yes")), None)
                .with_icon(vec![1_u8, 2, 3]),
        );
        let content = with_ok.content(Placement::Top);
        assert!(matches!(content.icon, Icon::Bitmap(ref bytes) if bytes.len() == 3));
        assert_eq!(
            content.buttons.and_then(|buttons| buttons.ok),
            Some(BarText::literal("Yes"))
        );
    }

    #[test]
    fn literal_text_ignores_args() {
        let text = BarText::literal("plain").with_arg("x", "y");
        assert_eq!(text, BarText::literal("plain"));
    }
}
