//! Scripted in-memory driver for tests.
//!
//! `FakeDriver` answers DOM queries from canned responses keyed by the
//! session's current frame path, the search scope, and the query text. Tests
//! stage the exact queries they expect the engine to emit, which doubles as
//! an assertion on the generated query strings. Element introspection reads
//! from a flat property map; input simulation mutates it (`click` toggles
//! selection, `send_keys` appends to `value`) and records an action log.

use crate::errors::DriverError;
use crate::types::{By, ElementHandle, Scope, ScriptArg, ScriptOutcome};
use crate::WebDriver;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// One element in the fake DOM.
#[derive(Clone, Debug)]
pub struct FakeElement {
    pub id: String,
    pub tag: String,
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub displayed: bool,
    pub selected: bool,
}

impl FakeElement {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            text: String::new(),
            attrs: HashMap::new(),
            displayed: true,
            selected: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// A canned answer for one staged query or script step.
#[derive(Clone, Debug)]
pub enum Canned {
    Elements(Vec<String>),
    Error(DriverError),
}

impl Canned {
    pub fn elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Canned::Elements(ids.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Canned::Elements(Vec::new())
    }

    pub fn error(error: DriverError) -> Self {
        Canned::Error(error)
    }
}

/// A canned script step: a JSON value, element handles, or a failure.
#[derive(Clone, Debug)]
pub enum CannedScript {
    Outcome(ScriptOutcome),
    Error(DriverError),
}

impl CannedScript {
    pub fn value(value: serde_json::Value) -> Self {
        CannedScript::Outcome(ScriptOutcome::Value(value))
    }

    pub fn elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CannedScript::Outcome(ScriptOutcome::Elements(
            ids.into_iter().map(|id| ElementHandle::new(id)).collect(),
        ))
    }

    pub fn error(error: DriverError) -> Self {
        CannedScript::Error(error)
    }
}

#[derive(Debug)]
struct ResponseSeq<T> {
    steps: Vec<T>,
    index: usize,
}

impl<T: Clone> ResponseSeq<T> {
    fn new(steps: Vec<T>) -> Self {
        Self { steps, index: 0 }
    }

    /// Advance through the staged steps; the last step repeats forever.
    fn next(&mut self) -> Option<T> {
        let step = self.steps.get(self.index.min(self.steps.len().saturating_sub(1)));
        if self.index < self.steps.len() {
            self.index += 1;
        }
        step.cloned()
    }
}

struct ScriptRule {
    needle: String,
    seq: ResponseSeq<CannedScript>,
}

#[derive(Default)]
struct FakeState {
    url: String,
    frame_path: Vec<String>,
    elements: HashMap<String, FakeElement>,
    queries: HashMap<String, ResponseSeq<Canned>>,
    scripts: Vec<ScriptRule>,
    query_log: Vec<String>,
    script_log: Vec<String>,
    action_log: Vec<String>,
}

/// The scripted driver.
pub struct FakeDriver {
    state: Mutex<FakeState>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        let mut state = FakeState::default();
        state.url = "about:blank".to_string();
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add an element to the property map.
    pub fn insert(&self, element: FakeElement) {
        let mut state = self.state.lock();
        state.elements.insert(element.id.clone(), element);
    }

    /// Stage a sticky response for a query issued while the session is inside
    /// `frames` (element ids of entered frames, outermost first; empty for
    /// the top level) with the given scope root (`None` for document scope).
    pub fn stage_query(&self, frames: &[&str], scope: Option<&str>, by: By, canned: Canned) {
        self.stage_query_sequence(frames, scope, by, vec![canned]);
    }

    /// Stage a sequence of responses for one query; the last step repeats.
    pub fn stage_query_sequence(
        &self,
        frames: &[&str],
        scope: Option<&str>,
        by: By,
        steps: Vec<Canned>,
    ) {
        let key = query_key(frames, scope, &by);
        let mut state = self.state.lock();
        state.queries.insert(key, ResponseSeq::new(steps));
    }

    /// Stage script responses for any executed source containing `needle`.
    /// Rules are consulted in insertion order; the first match wins.
    pub fn stage_script(&self, needle: &str, canned: CannedScript) {
        self.stage_script_sequence(needle, vec![canned]);
    }

    pub fn stage_script_sequence(&self, needle: &str, steps: Vec<CannedScript>) {
        let mut state = self.state.lock();
        state.scripts.push(ScriptRule {
            needle: needle.to_string(),
            seq: ResponseSeq::new(steps),
        });
    }

    /// Ordered log of every query key the engine issued.
    pub fn query_log(&self) -> Vec<String> {
        self.state.lock().query_log.clone()
    }

    /// Ordered log of executed script sources.
    pub fn script_log(&self) -> Vec<String> {
        self.state.lock().script_log.clone()
    }

    /// Ordered log of input-simulation actions.
    pub fn action_log(&self) -> Vec<String> {
        self.state.lock().action_log.clone()
    }

    /// Frame path the session is currently pointed at.
    pub fn current_frame_path(&self) -> Vec<String> {
        self.state.lock().frame_path.clone()
    }

    fn with_element<T>(
        &self,
        element: &ElementHandle,
        read: impl FnOnce(&FakeElement) -> T,
    ) -> Result<T, DriverError> {
        let state = self.state.lock();
        state
            .elements
            .get(element.id())
            .map(read)
            .ok_or_else(|| DriverError::StaleElement(element.id().to_string()))
    }
}

fn query_key(frames: &[&str], scope: Option<&str>, by: &By) -> String {
    format!(
        "{}|{}|{}",
        frames.join(">"),
        scope.unwrap_or("document"),
        by
    )
}

fn live_query_key(frame_path: &[String], scope: &Scope, by: &By) -> String {
    format!(
        "{}|{}|{}",
        frame_path.join(">"),
        scope.root().map(|h| h.id()).unwrap_or("document"),
        by
    )
}

#[async_trait]
impl WebDriver for FakeDriver {
    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().url.clone())
    }

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.frame_path.clear();
        state.action_log.push(format!("navigate {url}"));
        Ok(())
    }

    async fn find_elements(
        &self,
        scope: &Scope,
        by: &By,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let mut state = self.state.lock();
        let key = live_query_key(&state.frame_path, scope, by);
        state.query_log.push(key.clone());
        match state.queries.get_mut(&key).and_then(ResponseSeq::next) {
            Some(Canned::Elements(ids)) => {
                Ok(ids.into_iter().map(ElementHandle::new).collect())
            }
            Some(Canned::Error(error)) => Err(error),
            None => {
                debug!(key = %key, "unstaged query, answering empty");
                Ok(Vec::new())
            }
        }
    }

    async fn tag_name(&self, element: &ElementHandle) -> Result<String, DriverError> {
        self.with_element(element, |e| e.tag.clone())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        self.with_element(element, |e| e.attrs.get(name).cloned())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError> {
        self.with_element(element, |e| e.text.clone())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.with_element(element, |e| e.displayed)
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.with_element(element, |e| e.selected)
    }

    async fn switch_to_top(&self) -> Result<(), DriverError> {
        self.state.lock().frame_path.clear();
        Ok(())
    }

    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let is_iframe = state.elements.get(frame.id()).map(|e| e.tag == "iframe");
        match is_iframe {
            Some(true) => {
                state.frame_path.push(frame.id().to_string());
                Ok(())
            }
            Some(false) => Err(DriverError::NoSuchFrame(format!(
                "{} is not a frame",
                frame.id()
            ))),
            None => Err(DriverError::NoSuchFrame(frame.id().to_string())),
        }
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let entry = state
            .elements
            .get_mut(element.id())
            .ok_or_else(|| DriverError::StaleElement(element.id().to_string()))?;
        let value = entry.attrs.entry("value".to_string()).or_default();
        value.push_str(text);
        state
            .action_log
            .push(format!("send_keys {} {text}", element.id()));
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let entry = state
            .elements
            .get_mut(element.id())
            .ok_or_else(|| DriverError::StaleElement(element.id().to_string()))?;
        entry.attrs.insert("value".to_string(), String::new());
        state.action_log.push(format!("clear {}", element.id()));
        Ok(())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let entry = state
            .elements
            .get_mut(element.id())
            .ok_or_else(|| DriverError::StaleElement(element.id().to_string()))?;
        entry.selected = !entry.selected;
        state.action_log.push(format!("click {}", element.id()));
        Ok(())
    }

    async fn drag_and_drop(
        &self,
        source: &ElementHandle,
        target: &ElementHandle,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if !state.elements.contains_key(source.id()) {
            return Err(DriverError::StaleElement(source.id().to_string()));
        }
        if !state.elements.contains_key(target.id()) {
            return Err(DriverError::StaleElement(target.id().to_string()));
        }
        state
            .action_log
            .push(format!("drag_and_drop {} {}", source.id(), target.id()));
        Ok(())
    }

    async fn execute_script(
        &self,
        source: &str,
        _args: Vec<ScriptArg>,
    ) -> Result<ScriptOutcome, DriverError> {
        let mut state = self.state.lock();
        state.script_log.push(source.to_string());
        let rule = state
            .scripts
            .iter_mut()
            .find(|rule| source.contains(&rule.needle));
        match rule.and_then(|rule| rule.seq.next()) {
            Some(CannedScript::Outcome(outcome)) => Ok(outcome),
            Some(CannedScript::Error(error)) => Err(error),
            None => {
                debug!("unstaged script, answering null");
                Ok(ScriptOutcome::Value(serde_json::Value::Null))
            }
        }
    }
}
