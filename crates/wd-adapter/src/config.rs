//! Driver connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a concrete driver implementation.
///
/// The wire client itself lives outside this workspace; this struct fixes the
/// knobs every implementation is expected to honor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Remote driver endpoint, e.g. `http://localhost:4444`
    pub endpoint: String,

    /// Per-command I/O deadline (milliseconds)
    pub command_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4444".to_string(),
            command_timeout_ms: 10_000,
        }
    }
}

impl DriverConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}
