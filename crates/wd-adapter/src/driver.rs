//! The `WebDriver` trait: everything the engine consumes from the remote end

use crate::errors::DriverError;
use crate::types::{By, ElementHandle, Scope, ScriptArg, ScriptOutcome};
use async_trait::async_trait;

/// Narrow interface to a remote browser-automation driver.
///
/// Every method may block on a network round-trip to the remote browser
/// process. Implementations hold the session's shared mutable state (current
/// URL, current active frame); callers must serialize concurrent use of one
/// session.
#[async_trait]
pub trait WebDriver: Send + Sync {
    /// URL of the page the session is currently on.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Navigate the session to a new URL.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Run a DOM query inside `scope`, returning all matches in document
    /// order. An empty result is not an error.
    async fn find_elements(
        &self,
        scope: &Scope,
        by: &By,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    /// Lower-cased tag name of the element.
    async fn tag_name(&self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Attribute value, or `None` when the attribute is absent.
    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Visible text content of the element.
    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Whether the element is currently rendered.
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Whether the element (option, checkbox, radio) is selected.
    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Point the session's active browsing context at the top-level document.
    async fn switch_to_top(&self) -> Result<(), DriverError>;

    /// Point the session's active browsing context into a frame element.
    /// Relative to the current context: `frame` must be a frame of the
    /// document the session is currently pointed at.
    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<(), DriverError>;

    /// Simulate keystrokes into the element.
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Clear the element's value.
    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Click the element.
    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Drag one element onto another.
    async fn drag_and_drop(
        &self,
        source: &ElementHandle,
        target: &ElementHandle,
    ) -> Result<(), DriverError>;

    /// Execute JavaScript in the page, in the session's active browsing
    /// context. Scripts returning DOM nodes come back as
    /// [`ScriptOutcome::Elements`].
    async fn execute_script(
        &self,
        source: &str,
        args: Vec<ScriptArg>,
    ) -> Result<ScriptOutcome, DriverError>;
}
