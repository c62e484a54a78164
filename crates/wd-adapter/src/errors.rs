//! Error types surfaced by the driver boundary

use thiserror::Error;

/// Driver error enumeration
///
/// Mirrors the failure categories of a remote WebDriver endpoint. The
/// resolution layers treat most of these as transient page state rather than
/// hard failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The query expression could not be parsed by the remote end
    #[error("invalid {language} query `{query}`: {reason}")]
    InvalidQuery {
        language: String,
        query: String,
        reason: String,
    },

    /// No element matched a query that requires a match
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// The element handle no longer refers to a live DOM node
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Frame switch target is not a frame or no longer exists
    #[error("no such frame: {0}")]
    NoSuchFrame(String),

    /// In-page script raised or failed to serialize its result
    #[error("script execution failed: {0}")]
    Script(String),

    /// Network-level failure talking to the remote driver
    #[error("transport failure: {0}")]
    Transport(String),

    /// The driver session is gone or in an unusable state
    #[error("session error: {0}")]
    Session(String),
}

impl DriverError {
    /// Whether a retry against the same page may succeed without intervention.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DriverError::Transport(_) | DriverError::StaleElement(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(DriverError::Transport("connection reset".into()).is_transient());
        assert!(DriverError::StaleElement("e-1".into()).is_transient());
        assert!(!DriverError::InvalidQuery {
            language: "xpath".into(),
            query: "///".into(),
            reason: "unexpected token".into(),
        }
        .is_transient());
        assert!(!DriverError::Session("closed".into()).is_transient());
    }
}
