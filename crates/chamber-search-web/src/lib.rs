#![forbid(unsafe_code)]

//! Browser frontend for `chamber-search-core`.
//!
//! On `wasm32` this crate provides `WebHost`, a [`Host`](chamber_search_core::Host)
//! over the live page (`MutationObserver`, DOM listeners, `setTimeout`), and
//! the `initSessionSearch` export. The module start hook calls it once the
//! document has finished parsing.
//!
//! The page-level helpers in [`page`] are target-independent so they can be
//! tested natively.

pub mod page;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{WebHost, init_session_search};
