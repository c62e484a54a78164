//! Resolved element wrapper

use crate::errors::SessionError;
use crate::session::Session;
use element_resolver::xpath_literal;
use tracing::info;
use wd_adapter::{By, ElementHandle, Scope, ScriptArg};

/// Synthesize a double-click; remote drivers expose no native primitive for
/// it on every backend.
const DBLCLICK_SCRIPT: &str = "\
var evt = document.createEvent('MouseEvents');\
 evt.initMouseEvent('dblclick', true, true, window, 0, 0, 0, 0, 0,\
 false, false, false, false, 0, null);\
 arguments[0].dispatchEvent(evt);";

/// An element on a web page, paired with the session that resolved it.
///
/// The handle is only as live as the page it came from; a re-rendered page
/// invalidates it, and the recovery is to resolve again through the session.
#[derive(Clone)]
pub struct Element {
    session: Session,
    handle: ElementHandle,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl Element {
    pub(crate) fn new(session: Session, handle: ElementHandle) -> Self {
        Self { session, handle }
    }

    /// The underlying driver handle.
    pub fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    pub async fn tag_name(&self) -> Result<String, SessionError> {
        Ok(self.session.driver().tag_name(&self.handle).await?)
    }

    pub async fn text(&self) -> Result<String, SessionError> {
        Ok(self.session.driver().text(&self.handle).await?)
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.session.driver().attribute(&self.handle, name).await?)
    }

    pub async fn is_displayed(&self) -> Result<bool, SessionError> {
        Ok(self.session.driver().is_displayed(&self.handle).await?)
    }

    pub async fn is_selected(&self) -> Result<bool, SessionError> {
        Ok(self.session.driver().is_selected(&self.handle).await?)
    }

    /// Find all displayed matches within this element's subtree.
    pub async fn find_all(&self, search: &str) -> Result<Vec<Element>, SessionError> {
        self.session.find_all_within(self, search).await
    }

    /// Find exactly one displayed match within this element's subtree.
    pub async fn find(&self, search: &str) -> Result<Element, SessionError> {
        self.session.find_one_within(self, search).await
    }

    /// The parent element.
    pub async fn parent(&self) -> Result<Element, SessionError> {
        self.find("..").await
    }

    /// Read the value or text of the element: the `value` of inputs and
    /// textareas, the selected option's text for selects, the text content
    /// otherwise.
    pub async fn read(&self) -> Result<String, SessionError> {
        let driver = self.session.driver();
        let tag = self.tag_name().await?;

        let mut result = String::new();
        if tag == "input" || tag == "textarea" {
            result = self.attribute("value").await?.unwrap_or_default();
        }
        if tag == "select" {
            if let Some(value) = self.attribute("value").await? {
                let options = driver
                    .find_elements(&Scope::Element(self.handle.clone()), &By::css("option"))
                    .await?;
                for option in options {
                    if driver.attribute(&option, "value").await?.as_deref() == Some(value.as_str()) {
                        result = driver.text(&option).await?;
                        break;
                    }
                }
            }
        }
        if result.is_empty() {
            result = self.text().await?;
        }
        Ok(result)
    }

    /// Send text to the element via keystrokes. A select element picks the
    /// option whose text or value matches instead of receiving keystrokes.
    pub async fn write(&self, text: &str) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, text, "writing");
        let driver = self.session.driver();
        if self.tag_name().await? != "select" {
            self.clear().await?;
            driver.send_keys(&self.handle, text).await?;
            return Ok(());
        }

        let literal = xpath_literal(text);
        let by = By::xpath(format!(
            "./option[text() = {literal} or @value = {literal}]"
        ));
        let options = driver
            .find_elements(&Scope::Element(self.handle.clone()), &by)
            .await?;
        match options.into_iter().next() {
            Some(option) => Ok(driver.click(&option).await?),
            None => Err(SessionError::OptionNotFound {
                element: label,
                text: text.to_string(),
            }),
        }
    }

    /// Clear the element's value. Refuses readonly elements.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, "clearing");
        if self.attribute("readonly").await?.as_deref() == Some("true") {
            return Err(SessionError::ReadOnly(label));
        }
        Ok(self.session.driver().clear(&self.handle).await?)
    }

    /// Click the element.
    pub async fn click(&self) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, "clicking");
        Ok(self.session.driver().click(&self.handle).await?)
    }

    /// Double-click the element.
    pub async fn double_click(&self) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, "double-clicking");
        self.session
            .driver()
            .execute_script(
                DBLCLICK_SCRIPT,
                vec![ScriptArg::Element(self.handle.clone())],
            )
            .await?;
        Ok(())
    }

    /// Ensure the element is checked.
    pub async fn check(&self) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, "checking");
        if !self.is_selected().await? {
            self.session.driver().click(&self.handle).await?;
        }
        Ok(())
    }

    /// Ensure the element is unchecked.
    pub async fn uncheck(&self) -> Result<(), SessionError> {
        let label = self.describe().await;
        info!(element = %label, "unchecking");
        if self.is_selected().await? {
            self.session.driver().click(&self.handle).await?;
        }
        Ok(())
    }

    /// Drag this element onto another. Retried against the session timeout:
    /// mid-animation layouts make the gesture flaky on real pages.
    pub async fn drag_drop_to(&self, target: &Element) -> Result<(), SessionError> {
        let source_label = self.describe().await;
        let target_label = target.describe().await;
        info!(source = %source_label, target = %target_label, "dragging");
        let driver = self.session.driver().clone();
        let source_handle = self.handle.clone();
        let target_handle = target.handle.clone();
        self.session
            .retry(move || {
                let driver = driver.clone();
                let source = source_handle.clone();
                let target = target_handle.clone();
                async move {
                    driver.drag_and_drop(&source, &target).await?;
                    Ok(true)
                }
            })
            .await
    }

    /// Human-readable interpretation of the element: its id, its text, or
    /// its tag. Introspection faults fall through to the next alternative.
    pub async fn describe(&self) -> String {
        let driver = self.session.driver();
        if let Ok(Some(id)) = driver.attribute(&self.handle, "id").await {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        if let Ok(text) = driver.text(&self.handle).await {
            if !text.is_empty() {
                return format!("\"{text}\"");
            }
        }
        match driver.tag_name(&self.handle).await {
            Ok(tag) => format!("<{tag}>"),
            Err(_) => format!("element {}", self.handle),
        }
    }
}
