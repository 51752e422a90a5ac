#![forbid(unsafe_code)]

//! UI visibility config and engine tuning.
//!
//! Two layers feed the session search:
//!
//! - [`UiConfig`]: the page-wide visibility config the host exposes as
//!   `window.__OPENCHAMBER_UI_CONFIG__`. It starts from build-time defaults
//!   ([`UiConfig::builtin`]) and may be overridden per field by the
//!   `simplechamber` section of the user's settings file. The engine only
//!   asks it one question, through [`FeatureGate`].
//! - [`SearchConfig`]: tuning for the engine itself (feature id, settle
//!   delay, placeholder, and the [`HostContract`]).
//!
//! Loading is fail-open: a malformed override is logged and ignored, so a
//! broken settings file never disables features on its own.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contract::HostContract;
use crate::selector::SelectorError;

/// Feature id consulted before the search control is installed.
pub const SESSION_SEARCH_FEATURE: &str = "session-search";

/// Default delay between forcing expansion and filtering.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 50;

/// Settings-file section carrying UI overrides.
const SETTINGS_SECTION: &str = "simplechamber";

/// Deserialize `T` from a JSON document that must be an object.
///
/// Serde's derived struct impls also accept the sequence form, which no
/// config source ever produces.
fn from_json_object<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(s)?;
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse error.
    Json(serde_json::Error),
    /// A host-contract selector failed to parse.
    Selector(SelectorError),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Selector(e) => write!(f, "selector error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Selector(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<SelectorError> for ConfigError {
    fn from(e: SelectorError) -> Self {
        Self::Selector(e)
    }
}

// ---------------------------------------------------------------------------
// Feature gate
// ---------------------------------------------------------------------------

/// Read-only "is this feature turned off" lookup.
pub trait FeatureGate {
    fn is_feature_disabled(&self, feature_id: &str) -> bool;
}

impl FeatureGate for UiConfig {
    fn is_feature_disabled(&self, feature_id: &str) -> bool {
        self.is_ui_hidden(feature_id)
    }
}

impl<F: Fn(&str) -> bool> FeatureGate for F {
    fn is_feature_disabled(&self, feature_id: &str) -> bool {
        self(feature_id)
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Main header tabs the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainTab {
    Chat,
    Plan,
    Git,
    Diff,
    Terminal,
    Files,
}

impl MainTab {
    /// Every tab, in header order.
    pub const ALL: [MainTab; 6] = [
        MainTab::Chat,
        MainTab::Plan,
        MainTab::Git,
        MainTab::Diff,
        MainTab::Terminal,
        MainTab::Files,
    ];
}

/// Page-wide UI visibility config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tabs to show in the header; all tabs when absent or empty.
    #[serde(rename = "visibleTabs", default, skip_serializing_if = "Option::is_none")]
    pub visible_tabs: Option<Vec<MainTab>>,
    /// Feature ids to hide.
    #[serde(rename = "hiddenUI", default, skip_serializing_if = "Option::is_none")]
    pub hidden_ui: Option<Vec<String>>,
    /// Opt-in custom UI additions.
    #[serde(rename = "customUI", default, skip_serializing_if = "Option::is_none")]
    pub custom_ui: Option<Vec<String>>,
}

impl UiConfig {
    /// Build-time defaults shipped with the web bundle.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            visible_tabs: Some(vec![
                MainTab::Chat,
                MainTab::Plan,
                MainTab::Terminal,
                MainTab::Files,
            ]),
            hidden_ui: Some(
                [
                    // also hides git-identities and session-header-actions
                    "git",
                    "multi-run",
                    "about",
                    "message-fork",
                    "message-new-session",
                    "diff-view-tabs",
                    "keyboard-shortcuts",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
            ),
            custom_ui: Some(vec![
                "search-session-input".into(),
                "new-session-button".into(),
            ]),
        }
    }

    /// Parse the `window.__OPENCHAMBER_UI_CONFIG__` JSON form.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        from_json_object(s)
    }

    /// Extract the override section of a settings document.
    ///
    /// Returns `Ok(None)` when the document has no such section.
    pub fn from_settings_json(s: &str) -> Result<Option<Self>, ConfigError> {
        let mut doc: serde_json::Value = serde_json::from_str(s)?;
        match doc.get_mut(SETTINGS_SECTION).map(serde_json::Value::take) {
            Some(section) if section.is_object() => Ok(Some(serde_json::from_value(section)?)),
            _ => Ok(None),
        }
    }

    /// Apply `other` on top of `self`: every field present in `other` wins.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        if other.visible_tabs.is_some() {
            self.visible_tabs = other.visible_tabs;
        }
        if other.hidden_ui.is_some() {
            self.hidden_ui = other.hidden_ui;
        }
        if other.custom_ui.is_some() {
            self.custom_ui = other.custom_ui;
        }
        self
    }

    /// Builtin defaults overridden by an optional settings document.
    ///
    /// Fail-open: a malformed document is logged and the defaults are used.
    #[must_use]
    pub fn resolve(settings_json: Option<&str>) -> Self {
        let builtin = Self::builtin();
        let Some(raw) = settings_json else {
            return builtin;
        };
        match Self::from_settings_json(raw) {
            Ok(Some(over)) => builtin.merged(over),
            Ok(None) => builtin,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed UI settings override");
                builtin
            }
        }
    }

    /// Tabs that should be visible; all tabs when unconfigured.
    #[must_use]
    pub fn visible_tabs(&self) -> Vec<MainTab> {
        match &self.visible_tabs {
            Some(tabs) if !tabs.is_empty() => tabs.clone(),
            _ => MainTab::ALL.to_vec(),
        }
    }

    /// Whether `feature_id` is configured as hidden.
    #[must_use]
    pub fn is_ui_hidden(&self, feature_id: &str) -> bool {
        self.hidden_ui
            .as_ref()
            .is_some_and(|hidden| hidden.iter().any(|id| id == feature_id))
    }
}

// ---------------------------------------------------------------------------
// SearchConfig
// ---------------------------------------------------------------------------

/// Engine tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Feature id checked against the [`FeatureGate`].
    pub feature_id: String,
    /// Delay between forcing expansion and the deferred filter pass.
    pub settle_delay_ms: u64,
    /// Placeholder text of the search input.
    pub placeholder: String,
    /// Host structure.
    pub contract: HostContract,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            feature_id: SESSION_SEARCH_FEATURE.into(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            placeholder: "Search sessions...".into(),
            contract: HostContract::default(),
        }
    }
}

impl SearchConfig {
    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json_object(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Settle delay as a [`Duration`].
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.feature_id.trim().is_empty() {
            errors.push("feature_id must not be empty".into());
        }
        if self.settle_delay_ms == 0 {
            errors.push("settle_delay_ms must be > 0".into());
        }
        if self.settle_delay_ms > 10_000 {
            errors.push(format!(
                "settle_delay_ms must be <= 10000, got {}",
                self.settle_delay_ms
            ));
        }
        errors.extend(self.contract.validate());
        errors
    }
}
