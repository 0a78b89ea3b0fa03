// SPDX-License-Identifier: MPL-2.0
//! Per-tab notification bars.
//!
//! An [`InfoBarContainer`] owns the bars of one tab and shows or hides them
//! one transition at a time. Bars created on behalf of a counterpart carry a
//! [`PairedHandle`] whose close notification is delivered at most once,
//! whichever side closes first.
//!
//! # Example
//!
//! ```
//! use infobars::domain::infobar::TabId;
//! use infobars::infobar::headless::{settle, HeadlessHost, RecordingCounterpart};
//! use infobars::infobar::{BarText, InfoBarContainer, InfoBarEventKind, MessageBar};
//!
//! let mut container =
//!     InfoBarContainer::new(Some(TabId::new(1)), HeadlessHost::new(), RecordingCounterpart::new());
//! let mut events = container.subscribe();
//!
//! let bar = container
//!     .add_message(MessageBar::info(BarText::literal("Saved")))
//!     .expect("container accepts bars");
//! settle(&mut container);
//!
//! let event = events.try_recv().expect("shown");
//! assert_eq!(event.kind, InfoBarEventKind::Added);
//! assert_eq!(event.bar_id, bar);
//! ```

mod auto_login;
mod bar;
mod broadcast;
mod container;
mod dispatch;
pub mod headless;
mod host;
mod message;
mod paired;
mod sequencer;

pub use auto_login::{
    spawn_credential_lookup, AutoLoginParams, AutoLoginResult, AutoLoginState, CredentialRequest,
};
pub use bar::{BarContent, BarKind, BarText, Buttons, ConfirmBar, Icon, InfoBar, MessageBar, Severity};
pub use broadcast::{drain_events, EventBroadcaster, InfoBarEvent, InfoBarEventKind};
pub use container::{ContainerSettings, InfoBarContainer, AUTO_LOGIN_FAILED_KEY};
pub use dispatch::{Poster, SchedulingContext};
pub use host::{AccountService, AttachPosition, Counterpart, HostView, Transition, TransitionKind};
pub use message::Message;
pub use paired::{HandleRegistry, PairedHandle, RemoteHandle};
pub use sequencer::{Sequencer, TransitionToken};
