#![forbid(unsafe_code)]

//! JSON log output for production hosts.
//!
//! Filtering is read from `FOLIO_LOG`, then `RUST_LOG`, defaulting to
//! `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted first for the log filter.
pub const FILTER_ENV: &str = "FOLIO_LOG";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already set; the existing one
/// is left in place.
pub fn init_json() -> bool {
    let filter = EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
