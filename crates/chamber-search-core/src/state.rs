#![forbid(unsafe_code)]

//! Lifecycle flags shared by the mount observer and the filter engine.

/// Created at subsystem start, never destroyed. Only the expansion flag is
/// ever reset (when the query is cleared).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    mounted: bool,
    expanded_by_search: bool,
}

impl SearchState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mounted: false,
            expanded_by_search: false,
        }
    }

    /// Search control has been injected.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn mark_mounted(&mut self) {
        self.mounted = true;
    }

    /// Groups were force-expanded for the current search.
    #[must_use]
    pub const fn is_expanded_by_search(&self) -> bool {
        self.expanded_by_search
    }

    pub(crate) fn mark_expanded(&mut self) {
        self.expanded_by_search = true;
    }

    pub(crate) fn reset_expansion(&mut self) {
        self.expanded_by_search = false;
    }
}
