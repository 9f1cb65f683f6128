#![forbid(unsafe_code)]

//! Event dispatch for folio.
//!
//! [`Page`] wires the widgets together: it owns the drawer registry, the
//! address-fragment sync, the focus manager, the navigation modal and the
//! lightbox, and routes host [`Event`](folio_core::Event)s to them.
//!
//! # Role in folio
//! `folio-core` defines what the host provides, `folio-widgets` implements
//! the state machines, and this crate decides which state machine an event
//! belongs to and when deferred work runs.
//!
//! # Logging
//! Every dispatch runs inside a `folio.dispatch` debug span. Enable the
//! `tracing` feature to also get widget-level events.

pub mod address;
pub mod config;
pub mod dispatch;
pub mod schedule;

pub use address::{AddressSync, FragmentTarget};
#[cfg(feature = "policy-config")]
pub use config::ConfigError;
pub use config::{DEFAULT_LIGHTBOX_CLEAR_DELAY, LoadDefer, MarkupConfig, PageConfig, TrapPolicy};
pub use dispatch::{EventOutcome, Page};
pub use schedule::{Due, TaskQueue};
