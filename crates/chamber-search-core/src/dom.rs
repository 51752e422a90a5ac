#![forbid(unsafe_code)]

//! Host abstraction.
//!
//! The engine is host-driven: it never owns an event loop. A [`Host`] gives it
//! a document to query and mutate ([`Document`]) plus three ways to be called
//! back later:
//!
//! - structural watches ([`Host::watch`]), delivered as
//!   [`HostEvent::Mutations`] once per mutation batch;
//! - UI listeners ([`Host::listen`]), delivered as [`HostEvent::Ui`];
//! - one-shot timers ([`Host::schedule`]), delivered as [`HostEvent::Timer`].
//!
//! The embedder feeds those events into
//! [`SessionSearch::handle`](crate::session::SessionSearch::handle).

use std::fmt;
use std::time::Duration;

use crate::selector::Selector;

/// DOM operation failure reported by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The host rejected an operation (message from the platform).
    Rejected(String),
    /// A node the engine expected to exist was not found.
    Missing(&'static str),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "host rejected DOM operation: {msg}"),
            Self::Missing(what) => write!(f, "missing element: {what}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Handles to the injected search control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchControl<N> {
    pub container: N,
    pub input: N,
    pub clear_button: N,
}

/// What to build when injecting the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTemplate {
    pub container_id: &'static str,
    pub input_id: &'static str,
    pub clear_class: &'static str,
    pub placeholder: String,
}

/// Tree queries and the few mutations the engine performs.
///
/// Query methods never include `scope` itself in their results.
pub trait Document {
    /// Element handle. Cheap to clone, compared by identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Document root element.
    fn root(&self) -> Self::Node;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First descendant of `scope` matching `selector`, in document order.
    fn query(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    /// Direct children of `parent` matching `selector`.
    fn children(&self, parent: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Add or remove `class` depending on `on`.
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Simulated user activation. The host reacts on its own schedule.
    fn click(&mut self, node: &Self::Node);

    /// Current value of a text input. Empty for non-inputs.
    fn input_value(&self, input: &Self::Node) -> String;

    fn set_input_value(&mut self, input: &Self::Node, value: &str);

    fn focus(&mut self, node: &Self::Node);

    /// Install a stylesheet once; a second call with the same id is a no-op.
    fn install_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError>;

    /// Build the search control and append it as the last child of `parent`.
    fn append_search_control(
        &mut self,
        parent: &Self::Node,
        template: &ControlTemplate,
    ) -> Result<SearchControl<Self::Node>, DomError>;
}

/// Identifies an active structural watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub u32);

/// UI interactions the engine listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiTrigger {
    /// Text typed into (or deleted from) the search input.
    QueryInput,
    /// Clear button clicked.
    ClearClick,
}

/// Deferred work the engine schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Re-apply the live query once forced expansion has had time to render.
    Refilter,
}

/// Callback delivered by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// One batch of child-list changes somewhere under the watched node.
    Mutations(WatchId),
    Ui(UiTrigger),
    Timer(TimerTask),
}

/// A document plus the event sources the engine subscribes to.
pub trait Host: Document {
    /// Observe child-list changes in the subtree rooted at `target`.
    fn watch(&mut self, target: &Self::Node) -> WatchId;

    /// Stop a watch. Unknown or already-stopped ids are ignored.
    fn unwatch(&mut self, id: WatchId);

    /// Deliver `trigger` whenever the matching interaction happens on `target`.
    fn listen(&mut self, target: &Self::Node, trigger: UiTrigger);

    /// Deliver `task` once after `delay`.
    fn schedule(&mut self, delay: Duration, task: TimerTask);
}
