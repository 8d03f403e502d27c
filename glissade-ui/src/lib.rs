//! Shared primitives for glissade components.
//!
//! glissade components are headless: they own interaction state and
//! geometry, and a host toolkit feeds them input events and measured sizes.
//! This crate holds the vocabulary both sides agree on.
//!
//! - [`Px`] / [`PxSize`] for measured geometry and [`Dp`] for design
//!   constants.
//! - [`Callback`] / [`CallbackWith`] for event handlers stored in args.
//! - [`KeyEvent`] and [`KeyboardState`] for keyboard input.
//! - [`Instant`], which resolves to `web_time::Instant` on wasm targets.
//!
//! ```
//! use glissade_ui::{CallbackWith, Px};
//!
//! let on_change = CallbackWith::new(|width: Px| assert_eq!(width, Px(300)));
//! on_change.call(Px(300));
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod dp;
pub mod keyboard;
pub mod prop;
pub mod px;

pub use crate::{
    dp::{Dp, SCALE_FACTOR, scale_factor, set_scale_factor},
    keyboard::{KeyEvent, KeyboardState, Modifiers, NamedKey},
    prop::{Callback, CallbackWith},
    px::{Px, PxSize},
};

#[cfg(not(target_family = "wasm"))]
pub use std::time::Instant;
#[cfg(target_family = "wasm")]
pub use web_time::Instant;
