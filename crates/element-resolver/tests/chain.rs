//! Finder chain ordering and failure-absorption behavior.

use async_trait::async_trait;
use element_resolver::{Finder, FinderChain};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wd_adapter::fake::FakeDriver;
use wd_adapter::{DriverError, ElementHandle, Scope, WebDriver};

/// Scripted finder for chain tests: returns a fixed answer and counts calls.
struct ScriptedFinder {
    name: &'static str,
    result: Result<Vec<&'static str>, DriverError>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFinder {
    fn new(
        name: &'static str,
        result: Result<Vec<&'static str>, DriverError>,
    ) -> (Arc<dyn Finder>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let finder = Arc::new(Self {
            name,
            result,
            calls: calls.clone(),
        });
        (finder, calls)
    }
}

#[async_trait]
impl Finder for ScriptedFinder {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn find(
        &self,
        _driver: &dyn WebDriver,
        _scope: &Scope,
        _search: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map(|ids| ids.into_iter().map(ElementHandle::new).collect())
    }
}

#[tokio::test]
async fn first_non_empty_result_wins_verbatim() {
    let (empty, _) = ScriptedFinder::new("empty", Ok(vec![]));
    let (hit, _) = ScriptedFinder::new("hit", Ok(vec!["e-1", "e-2"]));
    let (later, later_calls) = ScriptedFinder::new("later", Ok(vec!["e-3"]));

    let chain = FinderChain::new(vec![empty, hit, later]);
    let driver = FakeDriver::new();
    let found = chain.find(&driver, &Scope::Document, "anything").await;

    assert_eq!(
        found,
        vec![ElementHandle::new("e-1"), ElementHandle::new("e-2")],
        "results come from the first matching finder only, never merged"
    );
    assert_eq!(
        later_calls.load(Ordering::SeqCst),
        0,
        "finders after the first match are not consulted"
    );
}

#[tokio::test]
async fn failing_finder_is_absorbed_and_chain_continues() {
    let (broken, broken_calls) = ScriptedFinder::new(
        "broken",
        Err(DriverError::InvalidQuery {
            language: "xpath".into(),
            query: "Submit".into(),
            reason: "unexpected token".into(),
        }),
    );
    let (hit, _) = ScriptedFinder::new("hit", Ok(vec!["e-1"]));

    let chain = FinderChain::new(vec![broken, hit]);
    let driver = FakeDriver::new();
    let found = chain.find(&driver, &Scope::Document, "Submit").await;

    assert_eq!(found, vec![ElementHandle::new("e-1")]);
    assert_eq!(broken_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn all_empty_or_failing_yields_empty_without_error() {
    let (broken, _) = ScriptedFinder::new(
        "broken",
        Err(DriverError::Transport("connection reset".into())),
    );
    let (empty, _) = ScriptedFinder::new("empty", Ok(vec![]));

    let chain = FinderChain::new(vec![broken, empty]);
    let driver = FakeDriver::new();
    let found = chain.find(&driver, &Scope::Document, "nothing").await;

    assert!(found.is_empty());
}
