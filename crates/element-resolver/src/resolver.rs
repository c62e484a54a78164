//! Resolution facade: `find_all` / `find_one`

use crate::chain::FinderChain;
use crate::errors::ResolveError;
use crate::finders::{default_finders, Finder};
use crate::frames;
use crate::retry::{retry_until, Deadline};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use wd_adapter::{ElementHandle, Scope, WebDriver};

/// Polling knobs for the resolution facade.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How long to wait for elements to appear (milliseconds)
    pub timeout_ms: u64,

    /// Pause between polling attempts (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            poll_interval_ms: 50,
        }
    }
}

impl ResolverConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// The public resolution surface.
///
/// Composes the polling retrier, the frame-aware descent and the finder
/// chain, filters to currently-displayed elements, and enforces the
/// exactly-one contract for single-element lookups. The finder list and the
/// polling knobs are both caller-mutable.
///
/// Not thread-safe for a single driver session: frame switching is global
/// mutable state on the driver, so concurrent resolutions against one
/// session must be externally serialized.
#[derive(Clone)]
pub struct ElementResolver {
    finders: Vec<Arc<dyn Finder>>,
    config: ResolverConfig,
}

impl Default for ElementResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementResolver {
    pub fn new() -> Self {
        Self::with_finders(default_finders())
    }

    pub fn with_finders(finders: Vec<Arc<dyn Finder>>) -> Self {
        Self {
            finders,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ResolverConfig {
        &mut self.config
    }

    pub fn finders(&self) -> &[Arc<dyn Finder>] {
        &self.finders
    }

    pub fn finders_mut(&mut self) -> &mut Vec<Arc<dyn Finder>> {
        &mut self.finders
    }

    pub fn set_finders(&mut self, finders: Vec<Arc<dyn Finder>>) {
        self.finders = finders;
    }

    /// Find all currently-displayed elements matching `search`.
    ///
    /// Polls until at least one displayed match exists or the timeout
    /// elapses. Handles are never cached across attempts: every poll re-runs
    /// the full resolution against the live page.
    pub async fn find_all(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, ResolveError> {
        let deadline = Deadline::from_timeout(self.config.timeout());
        let chain = FinderChain::new(self.finders.clone());

        let outcome = retry_until(deadline, self.config.poll_interval(), || {
            let chain = &chain;
            async move {
                let handles = frames::find_in_frames(driver, chain, scope, search).await;
                let mut displayed = Vec::with_capacity(handles.len());
                for handle in handles {
                    // A failing display probe aborts the whole attempt; the
                    // retrier absorbs it and polls again from the top.
                    if driver.is_displayed(&handle).await? {
                        displayed.push(handle);
                    } else {
                        debug!(element = %handle, "match not displayed, dropped");
                    }
                }
                Ok((!displayed.is_empty()).then_some(displayed))
            }
        })
        .await;

        match outcome {
            Ok(handles) => {
                info!(search, matches = handles.len(), "resolved");
                Ok(handles)
            }
            Err(expired) => Err(ResolveError::NotFound {
                search: search.to_string(),
                timeout: self.config.timeout(),
                cause: expired.cause,
            }),
        }
    }

    /// Find exactly one currently-displayed element matching `search`.
    pub async fn find_one(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<ElementHandle, ResolveError> {
        let mut handles = self.find_all(driver, scope, search).await?;
        if handles.len() > 1 {
            return Err(ResolveError::Ambiguous {
                search: search.to_string(),
                count: handles.len(),
            });
        }
        Ok(handles.remove(0))
    }
}
