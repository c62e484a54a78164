//! Error types for the session facade

use element_resolver::ResolveError;
use std::time::Duration;
use thiserror::Error;
use wd_adapter::DriverError;

/// Session error enumeration
#[derive(Debug, Error)]
pub enum SessionError {
    /// Element resolution failed (not found or ambiguous)
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A driver command outside the resolution loop failed
    #[error("driver command failed: {0}")]
    Driver(#[from] DriverError),

    /// A select element has no option matching the written text
    #[error("element {element} has no option matching `{text}`")]
    OptionNotFound { element: String, text: String },

    /// Refusing to clear a readonly element
    #[error("cannot clear readonly element {0}")]
    ReadOnly(String),

    /// `Session::retry` ran out of time
    #[error("condition not satisfied within {0:?}")]
    RetryTimeout(Duration),

    /// Navigation target failed URL validation
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}
