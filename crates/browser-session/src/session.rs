//! The `Session`: one driver connection plus its resolution configuration

use crate::element::Element;
use crate::errors::SessionError;
use element_resolver::{retry_until, Deadline, ElementResolver, Finder};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;
use wd_adapter::{Scope, ScriptArg, ScriptOutcome, WebDriver};

/// A browser session: an explicit handle to one driver connection.
///
/// Cheap to clone; clones share the driver and the resolution configuration.
/// The finder list and the polling knobs are caller-mutable at any time and
/// take effect on the next lookup. Concurrent use of one session must be
/// externally serialized.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    driver: Arc<dyn WebDriver>,
    resolver: RwLock<ElementResolver>,
}

impl Session {
    /// Create a session with the default finder chain and timeouts.
    pub fn new(driver: Arc<dyn WebDriver>) -> Self {
        Self::with_resolver(driver, ElementResolver::new())
    }

    /// Create a session around a pre-configured resolver.
    pub fn with_resolver(driver: Arc<dyn WebDriver>, resolver: ElementResolver) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                driver,
                resolver: RwLock::new(resolver),
            }),
        }
    }

    /// The underlying driver.
    pub fn driver(&self) -> &Arc<dyn WebDriver> {
        &self.inner.driver
    }

    /// How long lookups wait for elements to appear. Default 30 seconds.
    pub fn timeout(&self) -> Duration {
        self.inner.resolver.read().config().timeout()
    }

    pub fn set_timeout(&self, timeout: Duration) {
        self.inner.resolver.write().config_mut().timeout_ms = timeout.as_millis() as u64;
    }

    /// Pause between resolution attempts. Default 50 milliseconds.
    pub fn poll_interval(&self) -> Duration {
        self.inner.resolver.read().config().poll_interval()
    }

    pub fn set_poll_interval(&self, interval: Duration) {
        self.inner.resolver.write().config_mut().poll_interval_ms =
            interval.as_millis() as u64;
    }

    /// Snapshot of the finder chain used to evaluate search strings.
    pub fn finders(&self) -> Vec<Arc<dyn Finder>> {
        self.inner.resolver.read().finders().to_vec()
    }

    /// Replace the finder chain.
    pub fn set_finders(&self, finders: Vec<Arc<dyn Finder>>) {
        self.inner.resolver.write().set_finders(finders);
    }

    fn resolver(&self) -> ElementResolver {
        self.inner.resolver.read().clone()
    }

    /// URL of the page the session is currently on.
    pub async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.inner.driver.current_url().await?)
    }

    /// Navigate to a new URL.
    pub async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let parsed = Url::parse(url).map_err(|error| SessionError::InvalidUrl {
            url: url.to_string(),
            reason: error.to_string(),
        })?;
        info!(url = %parsed, "navigating");
        Ok(self.inner.driver.navigate(parsed.as_str()).await?)
    }

    /// Execute JavaScript in the session's active browsing context.
    pub async fn execute_script(
        &self,
        source: &str,
        args: Vec<ScriptArg>,
    ) -> Result<ScriptOutcome, SessionError> {
        Ok(self.inner.driver.execute_script(source, args).await?)
    }

    /// Find all displayed elements matching `search`, anywhere in the page
    /// (including nested frames). Polls until at least one match or timeout.
    pub async fn find_all(&self, search: &str) -> Result<Vec<Element>, SessionError> {
        self.find_all_in(&Scope::Document, search).await
    }

    /// Find exactly one displayed element matching `search`.
    pub async fn find_one(&self, search: &str) -> Result<Element, SessionError> {
        self.find_one_in(&Scope::Document, search).await
    }

    /// Find all displayed matches within an element's subtree.
    pub async fn find_all_within(
        &self,
        scope: &Element,
        search: &str,
    ) -> Result<Vec<Element>, SessionError> {
        self.find_all_in(&Scope::Element(scope.handle().clone()), search)
            .await
    }

    /// Find exactly one displayed match within an element's subtree.
    pub async fn find_one_within(
        &self,
        scope: &Element,
        search: &str,
    ) -> Result<Element, SessionError> {
        self.find_one_in(&Scope::Element(scope.handle().clone()), search)
            .await
    }

    async fn find_all_in(
        &self,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<Element>, SessionError> {
        let resolver = self.resolver();
        let handles = resolver
            .find_all(self.inner.driver.as_ref(), scope, search)
            .await?;
        Ok(handles
            .into_iter()
            .map(|handle| Element::new(self.clone(), handle))
            .collect())
    }

    async fn find_one_in(&self, scope: &Scope, search: &str) -> Result<Element, SessionError> {
        let resolver = self.resolver();
        let handle = resolver
            .find_one(self.inner.driver.as_ref(), scope, search)
            .await?;
        Ok(Element::new(self.clone(), handle))
    }

    /// Repeatedly evaluate `condition` until it returns true or the session
    /// timeout expires. Driver faults during evaluation are absorbed and
    /// retried like any other not-yet state.
    pub async fn retry<F, Fut>(&self, mut condition: F) -> Result<(), SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, wd_adapter::DriverError>>,
    {
        let timeout = self.timeout();
        let deadline = Deadline::from_timeout(timeout);
        retry_until(deadline, self.poll_interval(), || {
            let fut = condition();
            async move { Ok(fut.await?.then_some(())) }
        })
        .await
        .map_err(|_| SessionError::RetryTimeout(timeout))
    }

    /// Write text into every element matching `search`.
    pub async fn write(&self, search: &str, text: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.write(text).await?;
        }
        Ok(())
    }

    /// Clear the value of every element matching `search`.
    pub async fn clear(&self, search: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.clear().await?;
        }
        Ok(())
    }

    /// Click every element matching `search`.
    pub async fn click(&self, search: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.click().await?;
        }
        Ok(())
    }

    /// Double-click every element matching `search`.
    pub async fn double_click(&self, search: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.double_click().await?;
        }
        Ok(())
    }

    /// Ensure every element matching `search` is checked.
    pub async fn check(&self, search: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.check().await?;
        }
        Ok(())
    }

    /// Ensure every element matching `search` is unchecked.
    pub async fn uncheck(&self, search: &str) -> Result<(), SessionError> {
        for element in self.find_all(search).await? {
            element.uncheck().await?;
        }
        Ok(())
    }

    /// Drag the element matching `source_search` onto the element matching
    /// `target_search`. Both search strings must match exactly one element.
    pub async fn drag_drop(
        &self,
        source_search: &str,
        target_search: &str,
    ) -> Result<(), SessionError> {
        let source = self.find_one(source_search).await?;
        let target = self.find_one(target_search).await?;
        source.drag_drop_to(&target).await
    }
}
