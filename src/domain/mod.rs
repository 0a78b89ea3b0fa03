// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects with no dependencies beyond `std`.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`infobar`]: Bar identity and timing ([`BarId`](infobar::BarId),
//!   [`TabId`](infobar::TabId), [`AnimationDuration`](infobar::AnimationDuration))

pub mod diagnostics;
pub mod infobar;
