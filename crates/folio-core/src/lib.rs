#![forbid(unsafe_code)]

//! Core types for folio: input events, element handles, address-fragment
//! parsing and the platform capability traits the rest of the workspace is
//! written against.
//!
//! Nothing in this crate touches a real document. A host (browser adapter,
//! headless test document) implements [`platform::Platform`] and feeds
//! [`event::Event`]s to the runtime.

pub mod element;
pub mod event;
pub mod fragment;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod miss;
pub mod platform;

pub use element::ElementId;
pub use event::{ClickEvent, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use fragment::FragmentValue;
pub use miss::Miss;
pub use platform::{Document, Location, OverlayHost, Platform, ScrollBehavior, Scroller};
