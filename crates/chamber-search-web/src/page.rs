#![forbid(unsafe_code)]

//! Page-level inputs that do not need a browser: the global UI config and
//! the search control markup.

use chamber_search_core::UiConfig;
use chamber_search_core::dom::ControlTemplate;

/// Window property holding the page-wide UI config object.
pub const UI_CONFIG_GLOBAL: &str = "__OPENCHAMBER_UI_CONFIG__";

/// UI config resolved from the page global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub config: UiConfig,
    /// JSON to publish on the page when the global was absent, so other
    /// scripts see the same defaults.
    pub publish: Option<String>,
}

/// Resolve the page config from the JSON form of the global, if set.
///
/// Absent or `null` publishes the builtin defaults. A malformed value is
/// logged and the defaults are used without overwriting the page's value.
#[must_use]
pub fn resolve_page_config(raw: Option<&str>) -> PageConfig {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty() && *s != "null");
    let Some(raw) = raw else {
        let config = UiConfig::builtin();
        let publish = serde_json::to_string(&config).ok();
        return PageConfig { config, publish };
    };
    match UiConfig::from_json_str(raw) {
        Ok(config) => PageConfig {
            config,
            publish: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "malformed page UI config; using builtin defaults");
            PageConfig {
                config: UiConfig::builtin(),
                publish: None,
            }
        }
    }
}

/// Whether `document.readyState` says the parser is still running.
#[must_use]
pub fn is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Inner HTML of the control container.
#[must_use]
pub fn control_markup(template: &ControlTemplate) -> String {
    format!(
        r#"
    <div class="search-wrapper">
      <svg class="search-icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
        <circle cx="11" cy="11" r="8"></circle>
        <path d="m21 21-4.3-4.3"></path>
      </svg>
      <input type="text" id="{input}" placeholder="{placeholder}" autocomplete="off" />
      <button type="button" class="{clear}" aria-label="Clear search">
        <svg width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
          <path d="M18 6 6 18"></path>
          <path d="m6 6 12 12"></path>
        </svg>
      </button>
    </div>
  "#,
        input = escape_attr(template.input_id),
        placeholder = escape_attr(&template.placeholder),
        clear = escape_attr(template.clear_class),
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
