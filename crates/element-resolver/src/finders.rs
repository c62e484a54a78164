//! Finder strategies.
//!
//! A finder knows how to interpret a search string against a scope. Finders
//! may fail (malformed query syntax, backend faults); the chain absorbs
//! those failures, so implementations just propagate driver errors with `?`.

use crate::escape::{css_literal, xpath_literal};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use wd_adapter::{By, DriverError, ElementHandle, Scope, ScriptArg, ScriptOutcome, WebDriver};

/// One heuristic for matching elements against a search string.
///
/// Read-only with respect to the page: finders only query, never mutate.
#[async_trait]
pub trait Finder: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Find all matching elements within `scope`. May fail on error.
    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError>;
}

/// The default finder order: precise, widely-used interpretations first so
/// that looser heuristics never shadow them with duplicate matches.
pub fn default_finders() -> Vec<Arc<dyn Finder>> {
    vec![
        Arc::new(FindBySizzleCss),
        Arc::new(FindByXPath),
        Arc::new(FindByValue),
        Arc::new(FindByLabel),
        Arc::new(FindByText),
        Arc::new(FindByCss),
    ]
}

/// Probe for the in-page Sizzle library.
const SIZZLE_PROBE: &str = "return typeof window.Sizzle === 'function';";

/// Inject the Sizzle library via a script tag. Fire-and-forget: the finder
/// reports no matches until the library has finished loading and the polling
/// loop retries.
const SIZZLE_INJECT: &str = "\
if (!document.getElementById('pagegrip-sizzle')) {\
 var s = document.createElement('script');\
 s.id = 'pagegrip-sizzle';\
 s.src = 'https://cdn.jsdelivr.net/npm/sizzle@2.3.10/dist/sizzle.min.js';\
 (document.head || document.documentElement).appendChild(s);\
}";

/// Evaluate a selector with Sizzle, scoped to an optional context node.
const SIZZLE_QUERY: &str = "return window.Sizzle(arguments[0], arguments[1] || document);";

/// Finds elements by Sizzle-extended CSS selectors, evaluated in-page.
///
/// Supports the Sizzle superset of CSS (`:visible`, `:contains(...)`, and
/// friends). The library is injected lazily the first time the finder runs
/// on a page that does not already carry it.
pub struct FindBySizzleCss;

#[async_trait]
impl Finder for FindBySizzleCss {
    fn name(&self) -> &'static str {
        "sizzle-css"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let probe = driver.execute_script(SIZZLE_PROBE, Vec::new()).await?;
        if !probe.is_truthy() {
            debug!("sizzle not present, injecting");
            driver.execute_script(SIZZLE_INJECT, Vec::new()).await?;
            return Ok(Vec::new());
        }

        let mut args = vec![ScriptArg::Value(json!(search))];
        if let Some(root) = scope.root() {
            args.push(ScriptArg::Element(root.clone()));
        }
        match driver.execute_script(SIZZLE_QUERY, args).await? {
            ScriptOutcome::Elements(handles) => Ok(handles),
            ScriptOutcome::Value(_) => Ok(Vec::new()),
        }
    }
}

/// Finds elements by XPath expressions.
pub struct FindByXPath;

#[async_trait]
impl Finder for FindByXPath {
    fn name(&self) -> &'static str {
        "xpath"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        driver.find_elements(scope, &By::xpath(search)).await
    }
}

/// Finds elements whose `value` attribute equals the search string.
pub struct FindByValue;

#[async_trait]
impl Finder for FindByValue {
    fn name(&self) -> &'static str {
        "value"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let by = By::css(format!("*[value={}]", css_literal(search)));
        driver.find_elements(scope, &by).await
    }
}

/// Finds form controls through their `<label>`.
///
/// The search string is the label text. A label carrying a `for` attribute
/// resolves to the referenced control; otherwise the first following sibling
/// that is a select, textarea, or non-hidden input is taken.
pub struct FindByLabel;

#[async_trait]
impl Finder for FindByLabel {
    fn name(&self) -> &'static str {
        "label"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let label_query = By::xpath(format!(".//label[text() = {}]", xpath_literal(search)));
        let labels = driver.find_elements(scope, &label_query).await?;

        let mut controls = Vec::new();
        for label in labels {
            match driver.attribute(&label, "for").await? {
                Some(target) => {
                    let by = By::xpath(format!(".//*[@id = {}]", xpath_literal(&target)));
                    controls.extend(driver.find_elements(scope, &by).await?);
                }
                None => {
                    let siblings = driver
                        .find_elements(
                            &Scope::Element(label.clone()),
                            &By::xpath("./following-sibling::*[1]"),
                        )
                        .await?;
                    for sibling in siblings {
                        if is_form_control(driver, &sibling).await? {
                            controls.push(sibling);
                        }
                    }
                }
            }
        }
        Ok(controls)
    }
}

async fn is_form_control(
    driver: &dyn WebDriver,
    element: &ElementHandle,
) -> Result<bool, DriverError> {
    let tag = driver.tag_name(element).await?;
    Ok(match tag.as_str() {
        "select" | "textarea" => true,
        "input" => driver.attribute(element, "type").await?.as_deref() != Some("hidden"),
        _ => false,
    })
}

/// Finds elements whose text content equals the search string.
pub struct FindByText;

#[async_trait]
impl Finder for FindByText {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let by = By::xpath(format!(".//*[text() = {}]", xpath_literal(search)));
        driver.find_elements(scope, &by).await
    }
}

/// Whitespace-tolerant variant of [`FindByText`]: both sides are
/// space-normalized before comparing. Not in the default chain.
pub struct FindByNormalizeSpaceText;

#[async_trait]
impl Finder for FindByNormalizeSpaceText {
    fn name(&self) -> &'static str {
        "normalize-space-text"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let by = By::xpath(format!(
            ".//*[normalize-space(text()) = normalize-space({})]",
            xpath_literal(search)
        ));
        driver.find_elements(scope, &by).await
    }
}

/// Finds elements by plain CSS selectors, evaluated by the driver itself.
///
/// Last in the default chain: it accepts the same selectors as the Sizzle
/// finder minus the extensions, and exists so selector lookups still work
/// on pages where script injection is unavailable.
pub struct FindByCss;

#[async_trait]
impl Finder for FindByCss {
    fn name(&self) -> &'static str {
        "css"
    }

    async fn find(
        &self,
        driver: &dyn WebDriver,
        scope: &Scope,
        search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        driver.find_elements(scope, &By::css(search)).await
    }
}
