#![forbid(unsafe_code)]

//! One-shot injection of the search control.
//!
//! The host sidebar renders asynchronously, so the insertion point usually
//! does not exist when the engine starts. [`MountObserver::initialize`]
//! watches the whole document and every mutation batch retries the lookup.
//! The first successful attempt injects the control, wires its listeners and
//! the list-region watch, and cancels the document watch for good.
//!
//! If the sidebar never appears the watch is never cancelled; it lives as
//! long as the page.

use crate::config::FeatureGate;
use crate::contract::CompiledContract;
use crate::dom::{ControlTemplate, Document, Host, SearchControl, UiTrigger, WatchId};
use crate::filter::HIDDEN_CLASS;
use crate::state::SearchState;

/// Id of the injected container.
pub const CONTAINER_ID: &str = "oc-session-search";
/// Id of the injected text input.
pub const INPUT_ID: &str = "oc-session-search-input";
/// Id of the injected stylesheet.
pub const STYLES_ID: &str = "oc-session-search-styles";
/// Class of the clear button.
pub const CLEAR_CLASS: &str = "clear-btn";
/// Class that shows the clear button while the input is non-empty.
pub const CLEAR_VISIBLE_CLASS: &str = "visible";

/// Style rules for the control and the hidden marker.
#[must_use]
pub fn stylesheet() -> String {
    format!(
        r#"
  .{HIDDEN_CLASS} {{
    display: none !important;
  }}
  #{CONTAINER_ID} {{
    padding: 0.25rem 0.25rem 0;
  }}
  #{CONTAINER_ID} .search-wrapper {{
    position: relative;
    display: flex;
    align-items: center;
  }}
  #{CONTAINER_ID} .search-icon {{
    position: absolute;
    left: 0.5rem;
    width: 0.875rem;
    height: 0.875rem;
    color: var(--muted-foreground, #888);
    pointer-events: none;
  }}
  #{CONTAINER_ID} input {{
    height: 2rem;
    width: 100%;
    border-radius: 0.375rem;
    border: 1px solid var(--border, #333);
    background: transparent;
    padding-left: 1.75rem;
    padding-right: 1.75rem;
    font-size: 0.875rem;
    color: var(--foreground, #fff);
    outline: none;
  }}
  #{CONTAINER_ID} input::placeholder {{
    color: var(--muted-foreground, #888);
  }}
  #{CONTAINER_ID} input:focus {{
    box-shadow: 0 0 0 2px rgba(var(--primary-rgb, 99, 102, 241), 0.5);
  }}
  #{CONTAINER_ID} .{CLEAR_CLASS} {{
    position: absolute;
    right: 0.375rem;
    display: none;
    align-items: center;
    justify-content: center;
    width: 1.25rem;
    height: 1.25rem;
    border-radius: 0.25rem;
    border: none;
    background: transparent;
    color: var(--muted-foreground, #888);
    cursor: pointer;
  }}
  #{CONTAINER_ID} .{CLEAR_CLASS}:hover {{
    color: var(--foreground, #fff);
  }}
  #{CONTAINER_ID} .{CLEAR_CLASS}.{CLEAR_VISIBLE_CLASS} {{
    display: inline-flex;
  }}
"#
    )
}

/// Result of a successful injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mounted<N> {
    pub control: SearchControl<N>,
    /// Watch on the scrollable list region; `None` if the region was absent.
    pub list_watch: Option<WatchId>,
}

/// Result of [`MountObserver::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountStep<N> {
    /// The feature gate turned the search off; nothing was installed.
    Disabled,
    /// A control is already present (or a watch is already running).
    AlreadyMounted,
    /// Waiting for the insertion point.
    Watching(WatchId),
    /// Injected immediately because the sidebar was already rendered.
    Mounted(Mounted<N>),
}

/// Watches for the insertion point and injects the control once.
#[derive(Debug, Clone)]
pub struct MountObserver {
    contract: CompiledContract,
    template: ControlTemplate,
    feature_id: String,
    watch: Option<WatchId>,
}

impl MountObserver {
    #[must_use]
    pub fn new(
        contract: CompiledContract,
        feature_id: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            contract,
            template: ControlTemplate {
                container_id: CONTAINER_ID,
                input_id: INPUT_ID,
                clear_class: CLEAR_CLASS,
                placeholder: placeholder.into(),
            },
            feature_id: feature_id.into(),
            watch: None,
        }
    }

    /// Document watch, while one is active.
    #[must_use]
    pub fn watch_id(&self) -> Option<WatchId> {
        self.watch
    }

    /// Start watching for the insertion point. Idempotent.
    pub fn initialize<H: Host>(
        &mut self,
        host: &mut H,
        gate: &(impl FeatureGate + ?Sized),
        state: &mut SearchState,
    ) -> MountStep<H::Node> {
        if gate.is_feature_disabled(&self.feature_id) {
            tracing::info!(feature = %self.feature_id, "session search disabled by config");
            return MountStep::Disabled;
        }
        if let Some(id) = self.watch {
            return MountStep::Watching(id);
        }
        if state.is_mounted() || host.element_by_id(CONTAINER_ID).is_some() {
            return MountStep::AlreadyMounted;
        }

        if let Err(err) = host.install_stylesheet(STYLES_ID, &stylesheet()) {
            tracing::warn!(error = %err, "failed to install session search styles");
        }

        let root = host.root();
        let id = host.watch(&root);
        self.watch = Some(id);
        tracing::debug!(watch = id.0, "watching document for sidebar");

        match self.try_mount(host, state) {
            Some(mounted) => MountStep::Mounted(mounted),
            None if self.watch.is_some() => MountStep::Watching(id),
            None => MountStep::AlreadyMounted,
        }
    }

    /// Handle one document mutation batch.
    pub fn on_mutations<H: Host>(
        &mut self,
        host: &mut H,
        state: &mut SearchState,
    ) -> Option<Mounted<H::Node>> {
        self.watch?;
        self.try_mount(host, state)
    }

    /// Locate `(sidebar, insertion point)`.
    pub fn locate<D: Document>(&self, doc: &D) -> Option<(D::Node, D::Node)> {
        let sidebar = doc.query(&doc.root(), &self.contract.sidebar)?;
        let header = doc.query(&sidebar, &self.contract.insertion_point)?;
        Some((sidebar, header))
    }

    fn try_mount<H: Host>(
        &mut self,
        host: &mut H,
        state: &mut SearchState,
    ) -> Option<Mounted<H::Node>> {
        let Some((sidebar, insertion_point)) = self.locate(&*host) else {
            tracing::trace!("sidebar not rendered yet");
            return None;
        };
        if host.element_by_id(CONTAINER_ID).is_some() {
            tracing::debug!("search control already present");
            self.stop(host);
            return None;
        }

        let control = match host.append_search_control(&insertion_point, &self.template) {
            Ok(control) => control,
            Err(err) => {
                tracing::warn!(error = %err, "failed to inject search control");
                return None;
            }
        };
        host.listen(&control.input, UiTrigger::QueryInput);
        host.listen(&control.clear_button, UiTrigger::ClearClick);

        let list_watch = host
            .query(&sidebar, &self.contract.list_region)
            .map(|region| host.watch(&region));
        if list_watch.is_none() {
            tracing::debug!("list region not found; reactive re-filtering disabled");
        }

        state.mark_mounted();
        self.stop(host);
        tracing::info!(list_watch = list_watch.map(|w| w.0), "session search mounted");
        Some(Mounted {
            control,
            list_watch,
        })
    }

    fn stop<H: Host>(&mut self, host: &mut H) {
        if let Some(id) = self.watch.take() {
            host.unwatch(id);
        }
    }
}
