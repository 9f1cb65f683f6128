#![forbid(unsafe_code)]

//! Test harness for folio.
//!
//! Provides [`HeadlessDocument`], an in-memory implementation of every
//! platform capability the core needs, and [`fixtures`] that build the
//! reference page used across the workspace's tests.

pub mod document;
pub mod fixtures;
mod selector;

pub use document::{ElementSpec, HeadlessDocument, ScrollRecord};
pub use fixtures::{PageFixture, STANDARD_DRAWERS, standard_fixture, standard_page};
