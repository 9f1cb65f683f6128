#![forbid(unsafe_code)]

//! Stateful components for folio: focus management, disclosure drawers and
//! modal overlays.
//!
//! Every component is driven through `&mut P where P: Platform` and owns only
//! its own state. Nothing here binds events; see `folio-runtime` for the
//! dispatcher that does.

pub mod disclosure;
pub mod focus;
pub mod modal;

pub use disclosure::{DisclosureObserver, DisclosureRegistry, Drawer, DrawerMarkup, DrawerOutcome};
pub use focus::{FocusManager, FocusToken, FocusTrap, TrapMove};
pub use modal::{
    CloseTarget, Lightbox, MediaClear, MediaParts, ModalController, ModalState, ModalTransition,
    OverlayParts,
};
