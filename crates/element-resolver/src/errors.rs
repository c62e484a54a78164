//! Error types for the resolution engine

use std::time::Duration;
use thiserror::Error;
use wd_adapter::DriverError;

/// The only failures that escape the engine.
///
/// Strategy faults, frame-switch faults and transient driver errors are all
/// absorbed during polling; a page that has not rendered the element yet is
/// normal operation, not an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No displayed element matched the search string at any point before
    /// the deadline elapsed.
    #[error("no displayed element matched `{search}` within {timeout:?}")]
    NotFound {
        search: String,
        timeout: Duration,
        /// Last driver fault absorbed while polling, kept for diagnostics.
        #[source]
        cause: Option<DriverError>,
    },

    /// More than one displayed element matched a single-element lookup.
    #[error("{count} elements match `{search}`, expected exactly one")]
    Ambiguous { search: String, count: usize },
}

impl ResolveError {
    /// The search string the failed lookup was given.
    pub fn search(&self) -> &str {
        match self {
            ResolveError::NotFound { search, .. } | ResolveError::Ambiguous { search, .. } => {
                search
            }
        }
    }
}
