//! Browser session facade.
//!
//! A [`Session`] pairs a remote driver with the element-resolution engine
//! and exposes the convenience surface callers actually use: search-string
//! driven lookups (`find_one`, `find_all`), navigation, and batch actions
//! (`write`, `click`, `check`, ...). Every lookup polls the live page
//! through the resolver, so actions tolerate asynchronously-rendering pages
//! without explicit waits.
//!
//! Sessions are explicit values: create as many independent sessions as
//! there are driver connections. One session must not be used concurrently;
//! the active-frame context is global mutable state on the driver.

pub mod element;
pub mod errors;
pub mod session;

pub use element::Element;
pub use errors::SessionError;
pub use session::Session;
