#![forbid(unsafe_code)]

//! Deterministic in-memory host.
//!
//! [`HeadlessHost`] implements [`Host`] over an arena DOM with the same
//! delivery rules a browser gives the engine, minus the nondeterminism:
//!
//! - **Mutations** are recorded as they happen and delivered only on
//!   [`HeadlessHost::flush`], one [`HostEvent::Mutations`] per watch whose
//!   subtree saw a child-list change after the watch was installed (like a
//!   `MutationObserver` batch).
//!   Class changes are attribute changes and are never reported.
//! - **Time** only moves through [`HeadlessHost::advance`]; due timers fire in
//!   deadline order.
//! - **Host UI reactions** to clicks are queued by [`HeadlessHost::on_click`]
//!   and run on [`HeadlessHost::render_pending`], standing in for a framework
//!   that re-renders on its own schedule.
//!
//! [`HeadlessRunner`] pairs a host with a [`SessionSearch`] and routes every
//! produced event into it.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::config::{ConfigError, FeatureGate, SearchConfig};
use crate::dom::{
    ControlTemplate, Document, DomError, Host, HostEvent, SearchControl, TimerTask, UiTrigger,
    WatchId,
};
use crate::selector::Selector;
use crate::session::SessionSearch;

/// Arena index of a headless node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    value: String,
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

type ClickAction = Box<dyn FnMut(&mut HeadlessHost)>;

#[derive(Debug, Clone, Copy)]
struct ActiveWatch {
    id: WatchId,
    target: NodeId,
    /// First mutation sequence number this watch may see.
    since: u64,
}

#[derive(Debug, Clone, Copy)]
struct Mutation {
    seq: u64,
    parent: NodeId,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

/// Landmarks created by [`HeadlessHost::append_sidebar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarNodes {
    pub sidebar: NodeId,
    pub header: NodeId,
    pub list_region: NodeId,
}

/// In-memory [`Host`].
pub struct HeadlessHost {
    nodes: Vec<NodeData>,
    root: NodeId,
    mutations: Vec<Mutation>,
    next_mutation_seq: u64,
    watches: Vec<ActiveWatch>,
    next_watch: u32,
    listeners: Vec<(NodeId, UiTrigger)>,
    timers: Vec<PendingTimer>,
    next_timer_seq: u64,
    now: Duration,
    clicks: Vec<NodeId>,
    click_actions: Vec<(NodeId, ClickAction)>,
    pending_renders: VecDeque<NodeId>,
    focused: Option<NodeId>,
}

impl fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("nodes", &self.nodes.len())
            .field("watches", &self.watches)
            .field("timers", &self.timers.len())
            .field("now", &self.now)
            .finish()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Empty document with an `html` root element.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeData {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element(ElementData {
                tag: "html".into(),
                ..ElementData::default()
            }),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            mutations: Vec::new(),
            next_mutation_seq: 0,
            watches: Vec::new(),
            next_watch: 1,
            listeners: Vec::new(),
            timers: Vec::new(),
            next_timer_seq: 0,
            now: Duration::ZERO,
            clicks: Vec::new(),
            click_actions: Vec::new(),
            pending_renders: VecDeque::new(),
            focused: None,
        }
    }

    // -- building -----------------------------------------------------------

    /// Append an element to `parent` and record the child-list change.
    pub fn append_element(&mut self, parent: &NodeId, tag: &str, classes: &[&str]) -> NodeId {
        self.push_child(
            *parent,
            NodeKind::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                classes: classes.iter().map(|c| (*c).to_owned()).collect(),
                ..ElementData::default()
            }),
        )
    }

    /// Append a text node.
    pub fn append_text(&mut self, parent: &NodeId, text: &str) -> NodeId {
        self.push_child(*parent, NodeKind::Text(text.to_owned()))
    }

    /// Append a `button` with the given label.
    pub fn append_button(&mut self, parent: &NodeId, label: &str) -> NodeId {
        let button = self.append_element(parent, "button", &[]);
        self.append_text(&button, label);
        button
    }

    /// Append a session item (`div > .typography-ui-label > title`).
    pub fn append_session(&mut self, body: &NodeId, title: &str) -> NodeId {
        let item = self.append_element(body, "div", &[]);
        let label = self.append_element(&item, "div", &["typography-ui-label", "truncate"]);
        self.append_text(&label, title);
        item
    }

    /// Append a group and its body under `list_region`.
    pub fn append_group(&mut self, list_region: &NodeId) -> (NodeId, NodeId) {
        let group = self.append_element(list_region, "div", &["oc-group"]);
        let body = self.append_element(&group, "div", &["oc-group-body"]);
        (group, body)
    }

    /// Append the sidebar landmarks in the shape the default contract expects.
    pub fn append_sidebar(&mut self) -> SidebarNodes {
        let root = self.root;
        let sidebar = self.append_element(&root, "aside", &["flex", "flex-col"]);
        let header = self.append_element(&sidebar, "div", &["border-b", "border-border/60", "px-2"]);
        let list_region = self.append_element(&sidebar, "div", &["flex-1", "min-h-0", "overflow-y-auto"]);
        SidebarNodes {
            sidebar,
            header,
            list_region,
        }
    }

    pub fn set_id(&mut self, node: &NodeId, id: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.id = Some(id.to_owned());
        }
    }

    /// Detach `node` from its parent and record the child-list change.
    pub fn remove(&mut self, node: &NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| c != node);
        self.record_mutation(parent);
    }

    /// Run `action` as a deferred host render each time `node` is clicked.
    pub fn on_click(&mut self, node: &NodeId, action: impl FnMut(&mut HeadlessHost) + 'static) {
        self.click_actions.push((*node, Box::new(action)));
    }

    // -- inspection ---------------------------------------------------------

    #[must_use]
    pub fn classes(&self, node: &NodeId) -> &[String] {
        self.element(*node).map_or(&[], |el| el.classes.as_slice())
    }

    #[must_use]
    pub fn attribute(&self, node: &NodeId, name: &str) -> Option<&str> {
        self.element(*node)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn tag(&self, node: &NodeId) -> Option<&str> {
        self.element(*node).map(|el| el.tag.as_str())
    }

    #[must_use]
    pub fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Element children of `node`, in order.
    #[must_use]
    pub fn element_children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    /// Every node the engine (or a test) has clicked, in order.
    #[must_use]
    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }

    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.watches.len()
    }

    #[must_use]
    pub fn is_watching(&self, id: WatchId) -> bool {
        self.watches.iter().any(|w| w.id == id)
    }

    /// Target of an active watch.
    #[must_use]
    pub fn watch_target(&self, id: WatchId) -> Option<NodeId> {
        self.watches.iter().find(|w| w.id == id).map(|w| w.target)
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn pending_renders(&self) -> usize {
        self.pending_renders.len()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    // -- event delivery -----------------------------------------------------

    /// Deliver recorded child-list changes as one batch per affected watch.
    pub fn flush(&mut self) -> Vec<HostEvent> {
        let mutated = std::mem::take(&mut self.mutations);
        if mutated.is_empty() {
            return Vec::new();
        }
        self.watches
            .iter()
            .filter(|watch| {
                mutated.iter().any(|m| {
                    m.seq >= watch.since && self.is_inclusive_ancestor(watch.target, m.parent)
                })
            })
            .map(|watch| HostEvent::Mutations(watch.id))
            .collect()
    }

    /// Move the clock forward and return timers that came due, in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<HostEvent> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| HostEvent::Timer(t.task)).collect()
    }

    /// Run queued host renders triggered by earlier clicks.
    ///
    /// Returns how many renders ran.
    pub fn render_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Some(node) = self.pending_renders.pop_front() {
            let Some(pos) = self.click_actions.iter().position(|(n, _)| *n == node) else {
                continue;
            };
            let (target, mut action) = self.click_actions.remove(pos);
            action(self);
            self.click_actions.insert(pos, (target, action));
            ran += 1;
        }
        ran
    }

    /// Simulate typing: replace the input's value and fire input listeners.
    pub fn type_into(&mut self, input: &NodeId, text: &str) -> Vec<HostEvent> {
        self.set_input_value(input, text);
        self.ui_events(*input, UiTrigger::QueryInput)
    }

    /// Simulate a user click: record it and fire click listeners.
    pub fn user_click(&mut self, node: &NodeId) -> Vec<HostEvent> {
        self.click(node);
        self.ui_events(*node, UiTrigger::ClearClick)
    }

    fn ui_events(&self, node: NodeId, trigger: UiTrigger) -> Vec<HostEvent> {
        self.listeners
            .iter()
            .filter(|(n, t)| *n == node && *t == trigger)
            .map(|(_, t)| HostEvent::Ui(*t))
            .collect()
    }

    // -- internals ----------------------------------------------------------

    fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        self.record_mutation(parent);
        id
    }

    fn record_mutation(&mut self, parent: NodeId) {
        let seq = self.next_mutation_seq;
        self.next_mutation_seq += 1;
        self.mutations.push(Mutation { seq, parent });
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, node)
    }

    /// Pre-order descendants of `scope`, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.element(node)
            .is_some_and(|el| selector.matches(&el.tag, |c| el.classes.iter().any(|k| k == c)))
    }

    fn build_control(&mut self, parent: NodeId, template: &ControlTemplate) -> SearchControl<NodeId> {
        let container = self.append_element(&parent, "div", &[]);
        self.set_id(&container, template.container_id);
        let wrapper = self.append_element(&container, "div", &["search-wrapper"]);
        self.append_element(&wrapper, "svg", &["search-icon"]);
        let input = self.append_element(&wrapper, "input", &[]);
        self.set_id(&input, template.input_id);
        if let Some(el) = self.element_mut(input) {
            el.attributes = vec![
                ("type".into(), "text".into()),
                ("placeholder".into(), template.placeholder.clone()),
                ("autocomplete".into(), "off".into()),
            ];
        }
        let clear_button = self.append_element(&wrapper, "button", &[template.clear_class]);
        if let Some(el) = self.element_mut(clear_button) {
            el.attributes = vec![
                ("type".into(), "button".into()),
                ("aria-label".into(), "Clear search".into()),
            ];
        }
        self.append_element(&clear_button, "svg", &[]);
        SearchControl {
            container,
            input,
            clear_button,
        }
    }
}

impl Document for HeadlessHost {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.element(*n).is_some_and(|el| el.id.as_deref() == Some(id)))
    }

    fn query(&self, scope: &NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    fn query_all(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn children(&self, parent: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn text_content(&self, node: &NodeId) -> String {
        std::iter::once(*node)
            .chain(self.descendants(*node))
            .filter_map(|n| match &self.nodes[n.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(*node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(*node)
            && !el.classes.iter().any(|c| c == class)
        {
            el.classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn click(&mut self, node: &NodeId) {
        self.clicks.push(*node);
        if self.click_actions.iter().any(|(n, _)| n == node) {
            self.pending_renders.push_back(*node);
        }
    }

    fn input_value(&self, input: &NodeId) -> String {
        self.element(*input)
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, input: &NodeId, value: &str) {
        if let Some(el) = self.element_mut(*input) {
            el.value = value.to_owned();
        }
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError> {
        if self.element_by_id(id).is_some() {
            return Ok(());
        }
        let root = self.root;
        let style = self.append_element(&root, "style", &[]);
        self.set_id(&style, id);
        self.append_text(&style, css);
        Ok(())
    }

    fn append_search_control(
        &mut self,
        parent: &NodeId,
        template: &ControlTemplate,
    ) -> Result<SearchControl<NodeId>, DomError> {
        if !self.is_connected(*parent) {
            return Err(DomError::Rejected(format!("{parent:?} is detached")));
        }
        Ok(self.build_control(*parent, template))
    }
}

impl Host for HeadlessHost {
    fn watch(&mut self, target: &NodeId) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch += 1;
        self.watches.push(ActiveWatch {
            id,
            target: *target,
            since: self.next_mutation_seq,
        });
        id
    }

    fn unwatch(&mut self, id: WatchId) {
        self.watches.retain(|w| w.id != id);
    }

    fn listen(&mut self, target: &NodeId, trigger: UiTrigger) {
        self.listeners.push((*target, trigger));
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let seq = self.next_timer_seq;
        self.next_timer_seq += 1;
        self.timers.push(PendingTimer {
            due: self.now.saturating_add(delay),
            seq,
            task,
        });
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Upper bound on flush rounds per [`HeadlessRunner::flush`].
const MAX_FLUSH_ROUNDS: usize = 64;

/// A [`SessionSearch`] wired to a [`HeadlessHost`].
#[derive(Debug)]
pub struct HeadlessRunner {
    host: HeadlessHost,
    search: SessionSearch<NodeId>,
}

impl HeadlessRunner {
    pub fn new(host: HeadlessHost, config: SearchConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            host,
            search: SessionSearch::new(config)?,
        })
    }

    /// Run mount initialization.
    pub fn start(&mut self, gate: &impl FeatureGate) {
        self.search.start(&mut self.host, gate);
    }

    #[must_use]
    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HeadlessHost {
        &mut self.host
    }

    #[must_use]
    pub fn search(&self) -> &SessionSearch<NodeId> {
        &self.search
    }

    /// Feed events into the engine in order.
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        for event in events {
            self.search.handle(&mut self.host, event);
        }
    }

    /// Deliver mutation batches until the document is quiet.
    ///
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_FLUSH_ROUNDS {
            let events = self.host.flush();
            if events.is_empty() {
                break;
            }
            delivered += events.len();
            self.dispatch(events);
        }
        delivered
    }

    /// Advance the clock and deliver due timers.
    pub fn advance(&mut self, dt: Duration) {
        let events = self.host.advance(dt);
        self.dispatch(events);
    }

    /// Run queued host renders, then deliver the resulting mutations.
    pub fn render_host(&mut self) {
        self.host.render_pending();
        self.flush();
    }

    /// Type `text` into the search input (replacing its value).
    ///
    /// No-op until the control is mounted.
    pub fn type_query(&mut self, text: &str) {
        let Some(input) = self.search.control().map(|c| c.input) else {
            return;
        };
        let events = self.host.type_into(&input, text);
        self.dispatch(events);
    }

    /// Click the clear button.
    pub fn click_clear(&mut self) {
        let Some(button) = self.search.control().map(|c| c.clear_button) else {
            return;
        };
        let events = self.host.user_click(&button);
        self.dispatch(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_batches_per_watch() {
        let mut host = HeadlessHost::new();
        let nodes = host.append_sidebar();
        host.flush();

        let root = host.root();
        let doc_watch = host.watch(&root);
        let list_watch = host.watch(&nodes.list_region);

        host.append_element(&nodes.header, "span", &[]);
        host.append_element(&nodes.header, "span", &[]);
        assert_eq!(host.flush(), vec![HostEvent::Mutations(doc_watch)]);

        let (_, body) = host.append_group(&nodes.list_region);
        host.append_session(&body, "a");
        assert_eq!(
            host.flush(),
            vec![
                HostEvent::Mutations(doc_watch),
                HostEvent::Mutations(list_watch)
            ]
        );

        host.unwatch(doc_watch);
        host.add_class(&nodes.list_region, "oc-search-hidden");
        assert!(host.flush().is_empty());
        assert_eq!(host.active_watches(), 1);
    }

    #[test]
    fn changes_before_a_watch_are_not_reported() {
        let mut host = HeadlessHost::new();
        let root = host.root();
        host.append_element(&root, "main", &[]);
        let early = host.watch(&root);
        assert!(host.flush().is_empty());

        host.append_element(&root, "main", &[]);
        let late = host.watch(&root);
        host.append_element(&root, "footer", &[]);
        assert_eq!(
            host.flush(),
            vec![HostEvent::Mutations(early), HostEvent::Mutations(late)]
        );

        host.append_element(&root, "nav", &[]);
        host.watch(&root);
        assert_eq!(host.flush(), vec![HostEvent::Mutations(early), HostEvent::Mutations(late)]);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut host = HeadlessHost::new();
        host.schedule(Duration::from_millis(50), TimerTask::Refilter);
        assert!(host.advance(Duration::from_millis(49)).is_empty());
        assert_eq!(
            host.advance(Duration::from_millis(1)),
            vec![HostEvent::Timer(TimerTask::Refilter)]
        );
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn click_actions_run_only_on_render() {
        let mut host = HeadlessHost::new();
        let nodes = host.append_sidebar();
        let (_, body) = host.append_group(&nodes.list_region);
        let more = host.append_button(&body, "Show 2 more sessions");
        host.on_click(&more, move |h| {
            h.append_session(&body, "late");
        });
        host.flush();

        host.click(&more);
        assert_eq!(host.pending_renders(), 1);
        assert_eq!(host.element_children(&body).len(), 1);
        assert_eq!(host.render_pending(), 1);
        assert_eq!(host.element_children(&body).len(), 2);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let mut host = HeadlessHost::new();
        let root = host.root();
        let div = host.append_element(&root, "div", &[]);
        host.append_text(&div, "Show ");
        let b = host.append_element(&div, "b", &[]);
        host.append_text(&b, "3");
        host.append_text(&div, " more sessions");
        assert_eq!(host.text_content(&div), "Show 3 more sessions");
    }

    #[test]
    fn removed_nodes_are_not_found() {
        let mut host = HeadlessHost::new();
        let root = host.root();
        let div = host.append_element(&root, "div", &[]);
        host.set_id(&div, "gone");
        assert_eq!(host.element_by_id("gone"), Some(div));
        host.remove(&div);
        assert_eq!(host.element_by_id("gone"), None);
        let template = ControlTemplate {
            container_id: "c",
            input_id: "i",
            clear_class: "clear-btn",
            placeholder: String::new(),
        };
        assert!(host.append_search_control(&div, &template).is_err());
    }

    #[test]
    fn stylesheet_is_installed_once() {
        let mut host = HeadlessHost::new();
        host.install_stylesheet("styles", ".x{}").unwrap();
        host.install_stylesheet("styles", ".x{}").unwrap();
        let root = host.root();
        assert_eq!(
            host.query_all(&root, &Selector::tag_only("style")).len(),
            1
        );
    }
}
