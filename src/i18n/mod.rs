// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! Bar text is stored as [`crate::infobar::BarText`] and resolved here, at
//! the host boundary, so containers never depend on the active locale.
//!
//! Locale resolution order: CLI flag, `[general] language` in the config,
//! the OS locale, then `en-US`.

pub mod fluent;

pub use fluent::I18n;
