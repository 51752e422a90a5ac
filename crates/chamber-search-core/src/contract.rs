#![forbid(unsafe_code)]

//! Structural landmarks of the host sidebar.
//!
//! The engine never inspects the host's data; it only relies on this fixed
//! shape:
//!
//! ```text
//! aside                                   <- sidebar
//! ├── .border-b.border-border/60          <- insertion point (header)
//! └── .flex-1.min-h-0                     <- scrollable list region
//!     └── .oc-group                       <- group
//!         └── .oc-group-body
//!             ├── div                     <- item
//!             │   └── .typography-ui-label  <- title
//!             └── button                  <- "Show 3 more sessions" / "Show fewer sessions"
//! ```
//!
//! If the host renders a different shape, lookups simply come back empty and
//! the feature stays dormant.

use serde::{Deserialize, Serialize};

use crate::selector::{Selector, SelectorError};

/// Serializable description of the host structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostContract {
    /// Root sidebar landmark, searched from the document root.
    pub sidebar: String,
    /// Header region under the sidebar that receives the search control.
    pub insertion_point: String,
    /// Scrollable list region under the sidebar, observed for item churn.
    pub list_region: String,
    /// Group wrapper.
    pub group: String,
    /// Group body holding items and expansion controls as direct children.
    pub group_body: String,
    /// Item element, a direct child of a group body.
    pub item: String,
    /// Expansion control element, a direct child of a group body.
    pub expansion_control: String,
    /// Title-bearing descendant of an item.
    pub item_title: String,
    /// Text fragment identifying a "show more" control.
    pub expand_marker: String,
    /// Text fragment identifying a "show fewer" control.
    pub collapse_marker: String,
}

impl Default for HostContract {
    fn default() -> Self {
        Self {
            sidebar: "aside".into(),
            insertion_point: ".border-b.border-border/60".into(),
            list_region: ".flex-1.min-h-0".into(),
            group: ".oc-group".into(),
            group_body: ".oc-group-body".into(),
            item: "div".into(),
            expansion_control: "button".into(),
            item_title: ".typography-ui-label".into(),
            expand_marker: "more session".into(),
            collapse_marker: "fewer session".into(),
        }
    }
}

impl HostContract {
    /// Parse every selector.
    pub fn compile(&self) -> Result<CompiledContract, SelectorError> {
        Ok(CompiledContract {
            sidebar: Selector::parse(&self.sidebar)?,
            insertion_point: Selector::parse(&self.insertion_point)?,
            list_region: Selector::parse(&self.list_region)?,
            group: Selector::parse(&self.group)?,
            group_body: Selector::parse(&self.group_body)?,
            item: Selector::parse(&self.item)?,
            expansion_control: Selector::parse(&self.expansion_control)?,
            item_title: Selector::parse(&self.item_title)?,
            expand_marker: self.expand_marker.clone(),
            collapse_marker: self.collapse_marker.clone(),
        })
    }

    /// Problems that parsing alone would not catch.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.expand_marker.trim().is_empty() {
            errors.push("contract.expand_marker must not be empty".into());
        }
        if self.collapse_marker.trim().is_empty() {
            errors.push("contract.collapse_marker must not be empty".into());
        }
        if let Err(err) = self.compile() {
            errors.push(format!("contract: {err}"));
        }
        errors
    }
}

/// [`HostContract`] with parsed selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContract {
    pub sidebar: Selector,
    pub insertion_point: Selector,
    pub list_region: Selector,
    pub group: Selector,
    pub group_body: Selector,
    pub item: Selector,
    pub expansion_control: Selector,
    pub item_title: Selector,
    pub expand_marker: String,
    pub collapse_marker: String,
}

impl CompiledContract {
    /// Whether a control's text marks it as a "show more" trigger.
    #[must_use]
    pub fn is_expand_control(&self, text: &str) -> bool {
        text.contains(&self.expand_marker)
    }

    /// Whether a control's text marks it as either kind of expansion control.
    #[must_use]
    pub fn is_expansion_control(&self, text: &str) -> bool {
        text.contains(&self.expand_marker) || text.contains(&self.collapse_marker)
    }
}
