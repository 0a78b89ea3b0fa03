// SPDX-License-Identifier: MPL-2.0
//! Inputs applied to a container on its scheduling context.

use url::Url;

use crate::domain::infobar::BarId;

use super::auto_login::AutoLoginResult;
use super::paired::RemoteHandle;
use super::sequencer::TransitionToken;

/// Everything that can change container state.
///
/// Host completions, counterpart requests, user actions on bars and worker
/// results all arrive as messages, so state only ever changes inside
/// [`InfoBarContainer::update`](super::InfoBarContainer::update).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The layout pass requested for a show transition has run.
    LayoutReady(TransitionToken),
    /// A show or hide animation ended.
    TransitionFinished(TransitionToken),
    /// The counterpart closed its side of a paired bar.
    CounterpartClosed(RemoteHandle),
    ConfirmClicked { bar: BarId, accepted: bool },
    /// The sign-in button of an auto-login bar was pressed.
    AutoLoginAccepted(BarId),
    AutoLoginResult(AutoLoginResult),
    /// Close button or cancel.
    Dismiss(BarId),
    /// Navigation to a new page started.
    PageStarted(Url),
}
