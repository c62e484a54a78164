//! Transparent search inside nested frames.
//!
//! When the main content has no match, the search descends into each iframe
//! in document order and repeats the chain there, recursively. The first
//! frame with any match wins and sibling frames after it are never
//! inspected, the same first-match-wins policy the chain applies across
//! finders.

use crate::chain::FinderChain;
use async_recursion::async_recursion;
use tracing::debug;
use wd_adapter::{By, ElementHandle, Scope, WebDriver};

/// Find all matching elements, searching child iframes when the scope itself
/// has no match. Never fails; frame-switch faults skip that frame.
///
/// Every invocation starts by pointing the driver at the top-level document,
/// so no frame state leaks across polling attempts. On return the driver's
/// active context is wherever the last attempt pointed it.
pub async fn find_in_frames(
    driver: &dyn WebDriver,
    chain: &FinderChain,
    scope: &Scope,
    search: &str,
) -> Vec<ElementHandle> {
    descend(driver, chain, scope, search, &[]).await
}

/// Walk from the top-level document back into the frame the path describes.
///
/// Sibling iteration depends on this: after a recursive descent the driver
/// is parked somewhere inside the previous frame, and a frame element handle
/// is only switchable from the document that owns it.
async fn enter(driver: &dyn WebDriver, path: &[ElementHandle]) -> bool {
    if let Err(error) = driver.switch_to_top().await {
        debug!(error = %error, "switch to top level failed");
        return false;
    }
    for frame in path {
        if let Err(error) = driver.switch_to_frame(frame).await {
            debug!(frame = %frame, error = %error, "frame re-entry failed");
            return false;
        }
    }
    true
}

#[async_recursion]
async fn descend(
    driver: &dyn WebDriver,
    chain: &FinderChain,
    scope: &Scope,
    search: &str,
    path: &[ElementHandle],
) -> Vec<ElementHandle> {
    if !enter(driver, path).await {
        return Vec::new();
    }

    let found = chain.find(driver, scope, search).await;
    if !found.is_empty() {
        return found;
    }

    // No match in this document; try its iframes in document order.
    let iframes = match driver.find_elements(scope, &By::css("iframe")).await {
        Ok(iframes) => iframes,
        Err(error) => {
            debug!(error = %error, "iframe enumeration failed");
            return Vec::new();
        }
    };

    for iframe in iframes {
        if !enter(driver, path).await {
            continue;
        }
        if let Err(error) = driver.switch_to_frame(&iframe).await {
            debug!(frame = %iframe, error = %error, "frame switch failed, skipping");
            continue;
        }

        // The frame's own document root becomes the new search scope.
        let roots = match driver
            .find_elements(&Scope::Document, &By::css("html"))
            .await
        {
            Ok(roots) => roots,
            Err(error) => {
                debug!(frame = %iframe, error = %error, "frame root lookup failed");
                continue;
            }
        };
        let Some(root) = roots.into_iter().next() else {
            continue;
        };

        let mut child_path = path.to_vec();
        child_path.push(iframe.clone());
        let found = descend(driver, chain, &Scope::Element(root), search, &child_path).await;
        if !found.is_empty() {
            debug!(frame = %iframe, matches = found.len(), "matched inside frame");
            return found;
        }
    }

    Vec::new()
}
