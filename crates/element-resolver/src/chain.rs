//! Finder chain: an ordered priority list, not a union

use crate::finders::{default_finders, Finder};
use std::sync::Arc;
use tracing::debug;
use wd_adapter::{ElementHandle, Scope, WebDriver};

/// Tries finders in order and returns the first non-empty result set.
///
/// A finder that fails is treated as having found nothing; results are never
/// merged across finders, so a precise interpretation is never polluted with
/// duplicate matches from a looser one. Never fails.
#[derive(Clone)]
pub struct FinderChain {
    finders: Vec<Arc<dyn Finder>>,
}

impl Default for FinderChain {
    fn default() -> Self {
        Self::new(default_finders())
    }
}

impl FinderChain {
    pub fn new(finders: Vec<Arc<dyn Finder>>) -> Self {
        Self { finders }
    }

    pub fn finders(&self) -> &[Arc<dyn Finder>] {
        &self.finders
    }

    /// Find all matching elements. Returns empty when every finder comes up
    /// empty or fails.
    pub async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Vec<ElementHandle> {
        for finder in &self.finders {
            match finder.find(driver, scope, search).await {
                Ok(found) if !found.is_empty() => {
                    debug!(
                        finder = finder.name(),
                        matches = found.len(),
                        "finder matched"
                    );
                    return found;
                }
                Ok(_) => {
                    debug!(finder = finder.name(), "no matches");
                }
                Err(error) => {
                    debug!(
                        finder = finder.name(),
                        error = %error,
                        "finder failed, treating as no matches"
                    );
                }
            }
        }
        Vec::new()
    }
}
