// SPDX-License-Identifier: MPL-2.0
//! `infobars` manages the notification bars of a tabbed document view.
//!
//! Each tab owns an [`infobar::InfoBarContainer`] that shows and hides bars
//! strictly one transition at a time, keeps bars linked to an out-of-process
//! counterpart closed exactly once, and tells observers when a bar has been
//! added or removed. Rendering is left to a [`infobar::HostView`].

#![doc(html_root_url = "https://docs.rs/infobars/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infobar;
