#![forbid(unsafe_code)]

//! Query state machine over the host's session list.
//!
//! Each call to [`FilterEngine::apply`] is one query-change event:
//!
//! | Normalized query | Expanded by search | Result |
//! |------------------|--------------------|--------|
//! | empty            | any                | **Idle**: unhide everything, reset expansion |
//! | non-empty        | no                 | **Expanding**: click every "show more" control, defer |
//! | non-empty        | yes                | **Filtering**: recompute item, group, control visibility |
//!
//! Expanding never touches visibility. The host renders the extra items on
//! its own schedule, so the caller re-applies the *live* query after
//! [`FilterOutcome::Expanding::retry_after`]. Filtering reads only the
//! current document and the query it is given, so repeating it is harmless.

use std::time::Duration;

use crate::contract::CompiledContract;
use crate::dom::Document;
use crate::state::SearchState;

/// Marker class applied to filtered-out items, groups, and controls.
pub const HIDDEN_CLASS: &str = "oc-search-hidden";

/// Lower-case and trim, the normalization applied to both queries and labels.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Counts from one visibility pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Normalized query the pass ran with.
    pub query: String,
    pub items: usize,
    pub visible_items: usize,
    pub groups: usize,
    pub hidden_groups: usize,
    /// Expansion controls hidden by this pass.
    pub hidden_controls: usize,
}

/// Result of [`FilterEngine::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Query empty: everything visible again.
    Cleared(FilterReport),
    /// Expansion triggered; re-apply the live query after `retry_after`.
    Expanding { triggered: usize, retry_after: Duration },
    /// Visibility recomputed for a non-empty query.
    Filtered(FilterReport),
}

/// Applies queries to the host list.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    contract: CompiledContract,
    settle_delay: Duration,
}

impl FilterEngine {
    #[must_use]
    pub fn new(contract: CompiledContract, settle_delay: Duration) -> Self {
        Self {
            contract,
            settle_delay,
        }
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Handle one query-change event.
    pub fn apply<D: Document>(
        &self,
        doc: &mut D,
        state: &mut SearchState,
        query: &str,
    ) -> FilterOutcome {
        let query = normalize(query);

        if query.is_empty() {
            state.reset_expansion();
            let report = self.refresh(doc, &query);
            tracing::debug!(items = report.items, "search cleared");
            return FilterOutcome::Cleared(report);
        }

        if !state.is_expanded_by_search() {
            let triggered = self.expand_all(doc);
            state.mark_expanded();
            tracing::debug!(
                triggered,
                retry_after_ms = self.settle_delay.as_millis() as u64,
                "expanding groups before filtering"
            );
            return FilterOutcome::Expanding {
                triggered,
                retry_after: self.settle_delay,
            };
        }

        FilterOutcome::Filtered(self.refresh(doc, &query))
    }

    /// Click every "show more" control under a group body.
    ///
    /// Returns the number of controls activated.
    pub fn expand_all<D: Document>(&self, doc: &mut D) -> usize {
        let controls: Vec<D::Node> = self
            .group_bodies(&*doc)
            .iter()
            .flat_map(|body| doc.children(body, &self.contract.expansion_control))
            .filter(|control| self.contract.is_expand_control(&doc.text_content(control)))
            .collect();
        for control in &controls {
            doc.click(control);
        }
        controls.len()
    }

    /// Normalized label of an item; empty when the title element is missing.
    pub fn label<D: Document>(&self, doc: &D, item: &D::Node) -> String {
        doc.query(item, &self.contract.item_title)
            .map(|title| normalize(&doc.text_content(&title)))
            .unwrap_or_default()
    }

    /// Every item currently in the document.
    pub fn items<D: Document>(&self, doc: &D) -> Vec<D::Node> {
        self.group_bodies(&*doc)
            .iter()
            .flat_map(|body| doc.children(body, &self.contract.item))
            .collect()
    }

    /// Recompute visibility for an already-normalized query.
    fn refresh<D: Document>(&self, doc: &mut D, query: &str) -> FilterReport {
        let active = !query.is_empty();
        let mut report = FilterReport {
            query: query.to_owned(),
            ..FilterReport::default()
        };

        for item in self.items(&*doc) {
            let visible = !active || self.label(&*doc, &item).contains(query);
            doc.set_class(&item, HIDDEN_CLASS, !visible);
            report.items += 1;
            report.visible_items += usize::from(visible);
        }

        for group in doc.query_all(&doc.root(), &self.contract.group) {
            if !active {
                doc.remove_class(&group, HIDDEN_CLASS);
                report.groups += 1;
                continue;
            }
            // A group whose body is gone keeps its current state until the
            // body renders again.
            let Some(body) = doc.query(&group, &self.contract.group_body) else {
                continue;
            };
            let visible_items = doc
                .children(&body, &self.contract.item)
                .iter()
                .filter(|item| !doc.has_class(item, HIDDEN_CLASS))
                .count();
            let hidden = visible_items == 0;
            doc.set_class(&group, HIDDEN_CLASS, hidden);
            report.groups += 1;
            report.hidden_groups += usize::from(hidden);
        }

        for body in self.group_bodies(&*doc) {
            for control in doc.children(&body, &self.contract.expansion_control) {
                if self.contract.is_expansion_control(&doc.text_content(&control)) {
                    doc.set_class(&control, HIDDEN_CLASS, active);
                    report.hidden_controls += usize::from(active);
                }
            }
        }

        tracing::trace!(
            query,
            items = report.items,
            visible = report.visible_items,
            hidden_groups = report.hidden_groups,
            "filter pass"
        );
        report
    }

    fn group_bodies<D: Document>(&self, doc: &D) -> Vec<D::Node> {
        doc.query_all(&doc.root(), &self.contract.group_body)
    }
}
