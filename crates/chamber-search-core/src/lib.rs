#![forbid(unsafe_code)]

//! `chamber-search-core` adds client-side search to a session sidebar it does
//! not own.
//!
//! Design goals:
//! - **Host-driven**: the embedder (a browser shim, or [`headless`] in tests)
//!   delivers mutation batches, UI events, and timers; the engine never
//!   blocks or spawns.
//! - **Structural contract only**: the host is reached through the
//!   landmarks in [`contract::HostContract`]. A shape mismatch leaves the
//!   feature dormant instead of erroring.
//! - **No stale visibility**: item visibility is recomputed from the live
//!   document and the live input value on every pass.
//!
//! The two components are [`mount::MountObserver`] (one-shot injection of
//! the search control) and [`filter::FilterEngine`] (query state machine),
//! tied together by [`session::SessionSearch`].

pub mod config;
pub mod contract;
pub mod dom;
pub mod filter;
pub mod headless;
pub mod mount;
pub mod selector;
pub mod session;
pub mod state;

pub use config::{ConfigError, FeatureGate, MainTab, SearchConfig, UiConfig};
pub use contract::{CompiledContract, HostContract};
pub use dom::{Document, DomError, Host, HostEvent, SearchControl, TimerTask, UiTrigger, WatchId};
pub use filter::{FilterEngine, FilterOutcome, FilterReport, HIDDEN_CLASS};
pub use mount::{MountObserver, MountStep, Mounted};
pub use selector::{Selector, SelectorError};
pub use session::SessionSearch;
pub use state::SearchState;
