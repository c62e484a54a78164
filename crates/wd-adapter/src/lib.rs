//! PageGrip remote WebDriver boundary.
//!
//! This crate hosts the data structures and traits that the resolution and
//! session layers wire against. The concrete wire client (HTTP/WebSocket to a
//! remote driver process) lives outside this workspace; everything the engine
//! needs from it is expressed by the [`WebDriver`] trait. A scripted
//! in-memory driver for tests ships behind the `fake` feature.

pub mod config;
pub mod driver;
pub mod errors;
pub mod types;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use config::DriverConfig;
pub use driver::WebDriver;
pub use errors::DriverError;
pub use types::{By, ElementHandle, QueryLanguage, Scope, ScriptArg, ScriptOutcome};
