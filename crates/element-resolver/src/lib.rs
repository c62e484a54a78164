//! Element resolution engine.
//!
//! Turns an ambiguous, human-authored search string into live page elements:
//! - a configurable chain of finder strategies (Sizzle CSS, XPath, value,
//!   label, text, plain CSS), first non-empty result wins
//! - transparent descent into nested iframes when the main content has no
//!   match
//! - deadline-bounded polling that absorbs transient page and transport
//!   faults
//! - literal escaping so arbitrary strings embed safely into both query
//!   languages
//!
//! Only two failures ever escape: [`ResolveError::NotFound`] and
//! [`ResolveError::Ambiguous`]. Everything below that is treated as an
//! asynchronously-rendering page doing its thing.

pub mod chain;
pub mod errors;
pub mod escape;
pub mod finders;
pub mod frames;
pub mod resolver;
pub mod retry;

pub use chain::FinderChain;
pub use errors::ResolveError;
pub use escape::{css_literal, xpath_literal};
pub use finders::{
    default_finders, FindByCss, FindByLabel, FindByNormalizeSpaceText, FindBySizzleCss,
    FindByText, FindByValue, FindByXPath, Finder,
};
pub use resolver::{ElementResolver, ResolverConfig};
pub use retry::{retry_until, Deadline, DeadlineExpired};
