//! Core types shared across the driver boundary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a located DOM node.
///
/// The id is minted by the remote driver and is only meaningful for the
/// lifetime of the page it came from; callers must not cache handles across
/// resolution calls.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query language accepted by [`super::WebDriver::find_elements`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum QueryLanguage {
    /// Style-selector queries
    Css,
    /// Hierarchical path queries
    XPath,
}

impl QueryLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            QueryLanguage::Css => "css",
            QueryLanguage::XPath => "xpath",
        }
    }
}

/// A DOM query: a language plus an expression in that language.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum By {
    Css(String),
    XPath(String),
}

impl By {
    pub fn css(expression: impl Into<String>) -> Self {
        By::Css(expression.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        By::XPath(expression.into())
    }

    pub fn language(&self) -> QueryLanguage {
        match self {
            By::Css(_) => QueryLanguage::Css,
            By::XPath(_) => QueryLanguage::XPath,
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            By::Css(expr) | By::XPath(expr) => expr,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language().name(), self.expression())
    }
}

/// Search scope: the whole current document, or the subtree rooted at one
/// element. The scope is owned by the driver; the engine only borrows it for
/// the duration of one call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scope {
    Document,
    Element(ElementHandle),
}

impl Scope {
    /// The root element when this scope is a subtree.
    pub fn root(&self) -> Option<&ElementHandle> {
        match self {
            Scope::Document => None,
            Scope::Element(handle) => Some(handle),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Document => write!(f, "document"),
            Scope::Element(handle) => write!(f, "element {}", handle),
        }
    }
}

/// Argument passed to an in-page script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptArg {
    /// Plain JSON value
    Value(serde_json::Value),
    /// A previously located element, passed as a live DOM node
    Element(ElementHandle),
}

/// Result of an in-page script.
///
/// Scripts that return DOM nodes come back as element handles, the same way
/// the WebDriver wire protocol encodes them; everything else is plain JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptOutcome {
    Value(serde_json::Value),
    Elements(Vec<ElementHandle>),
}

impl ScriptOutcome {
    /// Interpret the outcome as a JavaScript truthiness check.
    pub fn is_truthy(&self) -> bool {
        match self {
            ScriptOutcome::Elements(handles) => !handles.is_empty(),
            ScriptOutcome::Value(value) => match value {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
                serde_json::Value::String(s) => !s.is_empty(),
                _ => true,
            },
        }
    }
}
