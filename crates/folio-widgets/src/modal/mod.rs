#![forbid(unsafe_code)]

//! Modal overlays: the generic [`ModalController`] lifecycle and the
//! [`Lightbox`] built on it.
//!
//! # Focus Management
//!
//! - **Auto-focus**: the first focusable descendant receives focus on open,
//!   or the overlay itself when there is none.
//! - **Focus trap**: Tab/Shift+Tab wrap at the edges (see
//!   [`crate::focus::trap`]).
//! - **Focus restore**: the element focused before opening gets focus back
//!   on close, if it is still in the document.
//! - **Escape to close**: handled by the runtime dispatcher, which routes it
//!   to the topmost open overlay.
//!
//! Overlays are not stacked: at most one is open at a time, and the
//! dispatcher closes the other before opening one.

mod controller;
mod lightbox;

pub use controller::{CloseTarget, ModalController, ModalState, ModalTransition, OverlayParts};
pub use lightbox::{Lightbox, MediaClear, MediaParts};
