#![forbid(unsafe_code)]

//! Event routing between a [`Host`] and the two engine components.
//!
//! [`SessionSearch`] owns the [`SearchState`] and hands it to the
//! [`MountObserver`] and the [`FilterEngine`] by `&mut`. The host calls
//! [`SessionSearch::start`] once and then [`SessionSearch::handle`] for every
//! event it delivers. All handling is synchronous; the only deferred work is
//! the [`TimerTask::Refilter`] scheduled after forcing expansion, and it
//! reads the input's value when it fires, not when it was scheduled.

use std::fmt;

use crate::config::{ConfigError, FeatureGate, SearchConfig};
use crate::dom::{Host, HostEvent, SearchControl, TimerTask, UiTrigger, WatchId};
use crate::filter::{FilterEngine, FilterOutcome};
use crate::mount::{CLEAR_VISIBLE_CLASS, MountObserver, MountStep, Mounted};
use crate::state::SearchState;

/// The session search subsystem.
pub struct SessionSearch<N> {
    state: SearchState,
    mount: MountObserver,
    filter: FilterEngine,
    control: Option<SearchControl<N>>,
    list_watch: Option<WatchId>,
}

impl<N: fmt::Debug> fmt::Debug for SessionSearch<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSearch")
            .field("state", &self.state)
            .field("mount_watch", &self.mount.watch_id())
            .field("list_watch", &self.list_watch)
            .field("control", &self.control)
            .finish()
    }
}

impl<N: Clone + PartialEq + fmt::Debug> SessionSearch<N> {
    /// Validate `config` and build the components.
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        let contract = config.contract.compile()?;
        Ok(Self {
            state: SearchState::new(),
            mount: MountObserver::new(
                contract.clone(),
                config.feature_id.clone(),
                config.placeholder.clone(),
            ),
            filter: FilterEngine::new(contract, config.settle_delay()),
            control: None,
            list_watch: None,
        })
    }

    /// Run mount initialization. Safe to call more than once.
    pub fn start<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        gate: &(impl FeatureGate + ?Sized),
    ) -> MountStep<N> {
        let step = self.mount.initialize(host, gate, &mut self.state);
        if let MountStep::Mounted(mounted) = &step {
            self.adopt(mounted.clone());
        }
        step
    }

    /// Handle one host event. Returns the filter outcome if a pass ran.
    pub fn handle<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        event: HostEvent,
    ) -> Option<FilterOutcome> {
        match event {
            HostEvent::Mutations(id) if Some(id) == self.mount.watch_id() => {
                if let Some(mounted) = self.mount.on_mutations(host, &mut self.state) {
                    self.adopt(mounted);
                }
                None
            }
            HostEvent::Mutations(id) if Some(id) == self.list_watch => {
                let query = self.live_query(host)?;
                if query.is_empty() {
                    return None;
                }
                tracing::trace!("list changed under active query");
                Some(self.run(host, &query))
            }
            HostEvent::Mutations(id) => {
                tracing::trace!(watch = id.0, "ignoring batch from inactive watch");
                None
            }
            HostEvent::Ui(UiTrigger::QueryInput) => {
                let control = self.control.clone()?;
                let query = host.input_value(&control.input);
                let outcome = self.run(host, &query);
                host.set_class(&control.clear_button, CLEAR_VISIBLE_CLASS, !query.is_empty());
                Some(outcome)
            }
            HostEvent::Ui(UiTrigger::ClearClick) => {
                let control = self.control.clone()?;
                host.set_input_value(&control.input, "");
                let outcome = self.run(host, "");
                host.remove_class(&control.clear_button, CLEAR_VISIBLE_CLASS);
                host.focus(&control.input);
                Some(outcome)
            }
            HostEvent::Timer(TimerTask::Refilter) => {
                let query = self.live_query(host)?;
                tracing::trace!("deferred refilter");
                Some(self.run(host, &query))
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    /// Injected control handles, once mounted.
    #[must_use]
    pub fn control(&self) -> Option<&SearchControl<N>> {
        self.control.as_ref()
    }

    /// Watch on the list region, once mounted.
    #[must_use]
    pub fn list_watch(&self) -> Option<WatchId> {
        self.list_watch
    }

    fn adopt(&mut self, mounted: Mounted<N>) {
        self.control = Some(mounted.control);
        self.list_watch = mounted.list_watch;
    }

    fn live_query<H: Host<Node = N>>(&self, host: &H) -> Option<String> {
        self.control
            .as_ref()
            .map(|control| host.input_value(&control.input))
    }

    fn run<H: Host<Node = N>>(&mut self, host: &mut H, query: &str) -> FilterOutcome {
        let outcome = self.filter.apply(host, &mut self.state, query);
        if let FilterOutcome::Expanding { retry_after, .. } = outcome {
            host.schedule(retry_after, TimerTask::Refilter);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::filter::HIDDEN_CLASS;
    use crate::headless::HeadlessHost;
    use std::time::Duration;

    fn enabled(_: &str) -> bool {
        false
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SearchConfig {
            settle_delay_ms: 0,
            ..SearchConfig::default()
        };
        let err = SessionSearch::<u32>::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn ui_events_before_mount_are_ignored() {
        let mut host = HeadlessHost::new();
        let mut search = SessionSearch::new(SearchConfig::default()).unwrap();
        search.start(&mut host, &enabled);
        assert_eq!(search.handle(&mut host, HostEvent::Ui(UiTrigger::QueryInput)), None);
        assert_eq!(search.handle(&mut host, HostEvent::Timer(TimerTask::Refilter)), None);
    }

    #[test]
    fn input_toggles_clear_button_and_clear_focuses_input() {
        let mut host = HeadlessHost::new();
        let nodes = host.append_sidebar();
        let (_, body) = host.append_group(&nodes.list_region);
        let item = host.append_session(&body, "Refactor login");

        let mut search = SessionSearch::new(SearchConfig::default()).unwrap();
        search.start(&mut host, &enabled);
        let control = search.control().cloned().expect("mounted");

        host.set_input_value(&control.input, "zz");
        let outcome = search.handle(&mut host, HostEvent::Ui(UiTrigger::QueryInput));
        assert!(matches!(outcome, Some(FilterOutcome::Expanding { .. })));
        assert!(host.has_class(&control.clear_button, CLEAR_VISIBLE_CLASS));
        assert_eq!(host.pending_timers(), 1);

        let timers = host.advance(Duration::from_millis(50));
        for event in timers {
            search.handle(&mut host, event);
        }
        assert!(host.has_class(&item, HIDDEN_CLASS));

        let outcome = search.handle(&mut host, HostEvent::Ui(UiTrigger::ClearClick));
        assert!(matches!(outcome, Some(FilterOutcome::Cleared(_))));
        assert_eq!(host.input_value(&control.input), "");
        assert!(!host.has_class(&item, HIDDEN_CLASS));
        assert!(!host.has_class(&control.clear_button, CLEAR_VISIBLE_CLASS));
        assert_eq!(host.focused(), Some(control.input));
        assert!(!search.state().is_expanded_by_search());
    }

    #[test]
    fn stale_watch_ids_are_ignored() {
        let mut host = HeadlessHost::new();
        let mut search = SessionSearch::new(SearchConfig::default()).unwrap();
        search.start(&mut host, &enabled);
        assert_eq!(search.handle(&mut host, HostEvent::Mutations(WatchId(999))), None);
        assert!(!search.is_mounted());
    }
}
