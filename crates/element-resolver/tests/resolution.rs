//! Facade behavior: polling, displayed filtering, the exactly-one contract,
//! and transparent frame descent.

use element_resolver::{ElementResolver, ResolveError, ResolverConfig};
use std::time::{Duration, Instant};
use wd_adapter::fake::{Canned, FakeDriver, FakeElement};
use wd_adapter::{By, DriverError, ElementHandle, Scope};

fn quick_resolver() -> ElementResolver {
    ElementResolver::new().with_config(
        ResolverConfig::default()
            .with_timeout(Duration::from_millis(200))
            .with_poll_interval(Duration::from_millis(20)),
    )
}

fn text_query(text: &str) -> By {
    By::xpath(format!(".//*[text() = '{text}']"))
}

#[tokio::test]
async fn resolves_displayed_match_at_top_level() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-1", "button").with_text("Save"));
    driver.stage_query(&[], None, text_query("Save"), Canned::elements(["b-1"]));

    let resolver = ElementResolver::new();
    let found = resolver
        .find_all(&driver, &Scope::Document, "Save")
        .await
        .unwrap();

    assert_eq!(found, vec![ElementHandle::new("b-1")]);
    assert!(driver.current_frame_path().is_empty());
    assert!(
        !driver.query_log().iter().any(|k| k.contains("iframe")),
        "no frame descent when the main content matches"
    );
}

#[tokio::test]
async fn hidden_matches_are_filtered_out() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-hidden", "button").with_text("Save").hidden());
    driver.insert(FakeElement::new("b-vis", "button").with_text("Save"));
    driver.stage_query(
        &[],
        None,
        text_query("Save"),
        Canned::elements(["b-hidden", "b-vis"]),
    );

    let found = ElementResolver::new()
        .find_all(&driver, &Scope::Document, "Save")
        .await
        .unwrap();
    assert_eq!(found, vec![ElementHandle::new("b-vis")]);
}

#[tokio::test]
async fn polls_until_the_page_catches_up() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-1", "button").with_text("Done"));
    driver.stage_query_sequence(
        &[],
        None,
        text_query("Done"),
        vec![Canned::none(), Canned::none(), Canned::elements(["b-1"])],
    );

    let resolver = ElementResolver::new().with_config(
        ResolverConfig::default().with_poll_interval(Duration::from_millis(10)),
    );
    let found = resolver
        .find_all(&driver, &Scope::Document, "Done")
        .await
        .unwrap();
    assert_eq!(found, vec![ElementHandle::new("b-1")]);

    let key_hits = driver
        .query_log()
        .iter()
        .filter(|k| k.contains("text() = 'Done'"))
        .count();
    assert!(key_hits >= 3, "expected at least three polls, saw {key_hits}");
}

#[tokio::test]
async fn times_out_with_not_found_when_nothing_matches() {
    let driver = FakeDriver::new();
    let resolver = quick_resolver();

    let started = Instant::now();
    let err = resolver
        .find_all(&driver, &Scope::Document, "Ghost")
        .await
        .unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(200));
    match err {
        ResolveError::NotFound { search, .. } => assert_eq!(search, "Ghost"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn all_hidden_matches_time_out_as_not_found() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-1", "button").with_text("Save").hidden());
    driver.stage_query(&[], None, text_query("Save"), Canned::elements(["b-1"]));

    let err = quick_resolver()
        .find_all(&driver, &Scope::Document, "Save")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }));
}

#[tokio::test]
async fn absorbed_driver_fault_surfaces_as_not_found_cause() {
    let driver = FakeDriver::new();
    // The match resolves, but its displayed probe keeps failing: every
    // attempt aborts and the timeout reports the absorbed fault.
    driver.stage_query(&[], None, text_query("Save"), Canned::elements(["ghost"]));

    let err = quick_resolver()
        .find_all(&driver, &Scope::Document, "Save")
        .await
        .unwrap_err();
    match err {
        ResolveError::NotFound { cause, .. } => {
            assert!(matches!(cause, Some(DriverError::StaleElement(_))));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn find_one_enforces_exactly_one() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-1", "button").with_text("OK"));
    driver.insert(FakeElement::new("b-2", "button").with_text("OK"));
    driver.stage_query(&[], None, text_query("OK"), Canned::elements(["b-1", "b-2"]));

    let resolver = ElementResolver::new();
    let err = resolver
        .find_one(&driver, &Scope::Document, "OK")
        .await
        .unwrap_err();
    match err {
        ResolveError::Ambiguous { search, count } => {
            assert_eq!(search, "OK");
            assert_eq!(count, 2);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn find_one_returns_the_single_match() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("b-1", "button").with_text("OK"));
    driver.stage_query(&[], None, text_query("OK"), Canned::elements(["b-1"]));

    let found = ElementResolver::new()
        .find_one(&driver, &Scope::Document, "OK")
        .await
        .unwrap();
    assert_eq!(found, ElementHandle::new("b-1"));
}

#[tokio::test]
async fn descends_into_first_matching_frame_only() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("f-1", "iframe"));
    driver.insert(FakeElement::new("f-2", "iframe"));
    driver.insert(FakeElement::new("btn-1", "button").with_text("Deep"));

    driver.stage_query(&[], None, By::css("iframe"), Canned::elements(["f-1", "f-2"]));
    driver.stage_query(&["f-1"], None, By::css("html"), Canned::elements(["h-1"]));
    driver.stage_query(
        &["f-1"],
        Some("h-1"),
        text_query("Deep"),
        Canned::elements(["btn-1"]),
    );

    let found = ElementResolver::new()
        .find_all(&driver, &Scope::Document, "Deep")
        .await
        .unwrap();

    assert_eq!(found, vec![ElementHandle::new("btn-1")]);
    assert_eq!(driver.current_frame_path(), vec!["f-1".to_string()]);
    assert!(
        !driver.query_log().iter().any(|k| k.starts_with("f-2|")),
        "the second frame is never inspected once the first matched"
    );
}

#[tokio::test]
async fn descends_through_nested_frames() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("f-1", "iframe"));
    driver.insert(FakeElement::new("f-11", "iframe"));
    driver.insert(FakeElement::new("btn-1", "button").with_text("Deep"));

    driver.stage_query(&[], None, By::css("iframe"), Canned::elements(["f-1"]));
    driver.stage_query(&["f-1"], None, By::css("html"), Canned::elements(["h-1"]));
    driver.stage_query(
        &["f-1"],
        Some("h-1"),
        By::css("iframe"),
        Canned::elements(["f-11"]),
    );
    driver.stage_query(
        &["f-1", "f-11"],
        None,
        By::css("html"),
        Canned::elements(["h-11"]),
    );
    driver.stage_query(
        &["f-1", "f-11"],
        Some("h-11"),
        text_query("Deep"),
        Canned::elements(["btn-1"]),
    );

    let found = ElementResolver::new()
        .find_all(&driver, &Scope::Document, "Deep")
        .await
        .unwrap();

    assert_eq!(found, vec![ElementHandle::new("btn-1")]);
    assert_eq!(
        driver.current_frame_path(),
        vec!["f-1".to_string(), "f-11".to_string()]
    );
}

#[tokio::test]
async fn sibling_frame_is_tried_after_a_fruitless_nested_descent() {
    let driver = FakeDriver::new();
    driver.insert(FakeElement::new("f-1", "iframe"));
    driver.insert(FakeElement::new("f-11", "iframe"));
    driver.insert(FakeElement::new("f-2", "iframe"));
    driver.insert(FakeElement::new("btn-2", "button").with_text("Deep"));

    driver.stage_query(&[], None, By::css("iframe"), Canned::elements(["f-1", "f-2"]));
    // f-1 nests f-11; neither contains a match.
    driver.stage_query(&["f-1"], None, By::css("html"), Canned::elements(["h-1"]));
    driver.stage_query(
        &["f-1"],
        Some("h-1"),
        By::css("iframe"),
        Canned::elements(["f-11"]),
    );
    driver.stage_query(
        &["f-1", "f-11"],
        None,
        By::css("html"),
        Canned::elements(["h-11"]),
    );
    // f-2 has the match.
    driver.stage_query(&["f-2"], None, By::css("html"), Canned::elements(["h-2"]));
    driver.stage_query(
        &["f-2"],
        Some("h-2"),
        text_query("Deep"),
        Canned::elements(["btn-2"]),
    );

    let found = ElementResolver::new()
        .find_all(&driver, &Scope::Document, "Deep")
        .await
        .unwrap();

    assert_eq!(found, vec![ElementHandle::new("btn-2")]);
    assert_eq!(driver.current_frame_path(), vec!["f-2".to_string()]);
}

#[tokio::test]
async fn unswitchable_frame_is_skipped() {
    let driver = FakeDriver::new();
    // f-bad is enumerated but cannot be switched into (not in the DOM map).
    driver.insert(FakeElement::new("f-2", "iframe"));
    driver.insert(FakeElement::new("btn-2", "button").with_text("Deep"));

    driver.stage_query(
        &[],
        None,
        By::css("iframe"),
        Canned::elements(["f-bad", "f-2"]),
    );
    driver.stage_query(&["f-2"], None, By::css("html"), Canned::elements(["h-2"]));
    driver.stage_query(
        &["f-2"],
        Some("h-2"),
        text_query("Deep"),
        Canned::elements(["btn-2"]),
    );

    let found = ElementResolver::new()
        .find_all(&driver, &Scope::Document, "Deep")
        .await
        .unwrap();
    assert_eq!(found, vec![ElementHandle::new("btn-2")]);
}
