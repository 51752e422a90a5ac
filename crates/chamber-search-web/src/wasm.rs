#![forbid(unsafe_code)]

//! `web_sys` host and the `wasm-bindgen` entry points.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

use chamber_search_core::dom::ControlTemplate;
use chamber_search_core::{
    ConfigError, Document, DomError, Host, HostEvent, SearchConfig, SearchControl, SessionSearch,
    Selector, TimerTask, UiConfig, UiTrigger, WatchId,
};
use js_sys::{JSON, Reflect};
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlInputElement, MutationObserver, MutationObserverInit, Window};

use crate::page::{UI_CONFIG_GLOBAL, control_markup, is_loading, resolve_page_config};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "session search panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("session search panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

fn js_error(err: &JsValue) -> DomError {
    DomError::Rejected(
        err.as_string()
            .or_else(|| {
                JSON::stringify(err)
                    .ok()
                    .map(String::from)
            })
            .unwrap_or_else(|| "unknown error".to_string()),
    )
}

fn set_timeout(window: &Window, delay: Duration, event: HostEvent) {
    let callback = Closure::once_into_js(move || dispatch(event));
    let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
    {
        warn!(error = %js_error(&err), "failed to schedule timer");
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

struct ActiveObserver {
    id: WatchId,
    observer: MutationObserver,
    callback: Closure<dyn FnMut()>,
}

/// [`Host`] over the live page.
pub struct WebHost {
    window: Window,
    document: web_sys::Document,
    root: Element,
    observers: Vec<ActiveObserver>,
    /// Callbacks of stopped watches. Dropped on the next dispatch, never
    /// while one of them may still be on the stack.
    retired: Vec<Closure<dyn FnMut()>>,
    listeners: Vec<Closure<dyn FnMut()>>,
    next_watch: u32,
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("observers", &self.observers.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl WebHost {
    pub fn new(window: Window) -> Result<Self, DomError> {
        let document = window.document().ok_or(DomError::Missing("document"))?;
        let root = document
            .document_element()
            .ok_or(DomError::Missing("documentElement"))?;
        Ok(Self {
            window,
            document,
            root,
            observers: Vec::new(),
            retired: Vec::new(),
            listeners: Vec::new(),
            next_watch: 0,
        })
    }

    fn sweep(&mut self) {
        self.retired.clear();
    }

    fn create(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(|e| js_error(&e))
    }
}

impl Document for WebHost {
    type Node = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, scope: &Element, selector: &Selector) -> Option<Element> {
        scope.query_selector(&selector.to_css()).ok().flatten()
    }

    fn query_all(&self, scope: &Element, selector: &Selector) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(&selector.to_css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn children(&self, parent: &Element, selector: &Selector) -> Vec<Element> {
        let children = parent.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| {
                let tag = child.tag_name().to_ascii_lowercase();
                let classes = child.class_list();
                selector.matches(&tag, |class| classes.contains(class))
            })
            .collect()
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            trace!(error = %js_error(&err), class, "classList.add rejected");
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            trace!(error = %js_error(&err), class, "classList.remove rejected");
        }
    }

    fn click(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.click();
        }
    }

    fn input_value(&self, input: &Element) -> String {
        input
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, input: &Element, value: &str) {
        if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn focus(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>()
            && let Err(err) = element.focus()
        {
            trace!(error = %js_error(&err), "focus rejected");
        }
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError> {
        if self.document.get_element_by_id(id).is_some() {
            return Ok(());
        }
        let style = self.create("style")?;
        style.set_id(id);
        style.set_text_content(Some(css));
        let head = self.document.head().ok_or(DomError::Missing("head"))?;
        head.append_child(&style).map_err(|e| js_error(&e))?;
        Ok(())
    }

    fn append_search_control(
        &mut self,
        parent: &Element,
        template: &ControlTemplate,
    ) -> Result<SearchControl<Element>, DomError> {
        let container = self.create("div")?;
        container.set_id(template.container_id);
        container.set_inner_html(&control_markup(template));

        let input = container
            .query_selector("input")
            .ok()
            .flatten()
            .ok_or(DomError::Missing("search input"))?;
        let clear_button = container
            .query_selector(&format!(".{}", template.clear_class))
            .ok()
            .flatten()
            .ok_or(DomError::Missing("clear button"))?;

        parent.append_child(&container).map_err(|e| js_error(&e))?;
        Ok(SearchControl {
            container,
            input,
            clear_button,
        })
    }
}

impl Host for WebHost {
    fn watch(&mut self, target: &Element) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch += 1;

        let callback = Closure::<dyn FnMut()>::new(move || dispatch(HostEvent::Mutations(id)));
        match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                let init = MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                if let Err(err) = observer.observe_with_options(target, &init) {
                    warn!(watch = id.0, error = %js_error(&err), "observe rejected");
                }
                self.observers.push(ActiveObserver {
                    id,
                    observer,
                    callback,
                });
            }
            Err(err) => warn!(watch = id.0, error = %js_error(&err), "MutationObserver unavailable"),
        }
        id
    }

    fn unwatch(&mut self, id: WatchId) {
        let Some(pos) = self.observers.iter().position(|o| o.id == id) else {
            return;
        };
        let stopped = self.observers.swap_remove(pos);
        stopped.observer.disconnect();
        self.retired.push(stopped.callback);
        debug!(watch = id.0, "watch stopped");
    }

    fn listen(&mut self, target: &Element, trigger: UiTrigger) {
        let event = match trigger {
            UiTrigger::QueryInput => "input",
            UiTrigger::ClearClick => "click",
        };
        let callback = Closure::<dyn FnMut()>::new(move || dispatch(HostEvent::Ui(trigger)));
        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            warn!(event, error = %js_error(&err), "addEventListener rejected");
            return;
        }
        self.listeners.push(callback);
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        set_timeout(&self.window, delay, HostEvent::Timer(task));
    }
}

// ---------------------------------------------------------------------------
// Page-wide instance
// ---------------------------------------------------------------------------

/// Failure to build the page instance.
#[derive(Debug)]
enum SetupError {
    Dom(DomError),
    Config(ConfigError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(err) => write!(f, "host unavailable: {err}"),
            Self::Config(err) => write!(f, "invalid search config: {err}"),
        }
    }
}

struct App {
    host: WebHost,
    search: SessionSearch<Element>,
}

impl App {
    fn new(window: Window) -> Result<Self, SetupError> {
        Ok(Self {
            host: WebHost::new(window).map_err(SetupError::Dom)?,
            search: SessionSearch::new(SearchConfig::default()).map_err(SetupError::Config)?,
        })
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn dispatch(event: HostEvent) {
    APP.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            // Raised synchronously from inside another dispatch.
            if let Some(window) = web_sys::window() {
                set_timeout(&window, Duration::ZERO, event);
            }
            return;
        };
        if let Some(app) = slot.as_mut() {
            app.host.sweep();
            app.search.handle(&mut app.host, event);
        }
    });
}

/// Read `window.__OPENCHAMBER_UI_CONFIG__`, publishing defaults if unset.
fn page_ui_config(window: &Window) -> UiConfig {
    let key = JsValue::from_str(UI_CONFIG_GLOBAL);
    let raw = Reflect::get(window, &key)
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .and_then(|value| JSON::stringify(&value).ok())
        .map(String::from);

    let page = resolve_page_config(raw.as_deref());
    if let Some(json) = page.publish
        && let Ok(value) = JSON::parse(&json)
    {
        let _ = Reflect::set(window, &key, &value);
    }
    page.config
}

/// Start session search on the current page. Safe to call repeatedly.
#[wasm_bindgen(js_name = initSessionSearch)]
pub fn init_session_search() {
    install_panic_hook();
    let Some(window) = web_sys::window() else {
        return;
    };
    let config = page_ui_config(&window);

    APP.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return;
        };
        if slot.is_none() {
            match App::new(window) {
                Ok(app) => *slot = Some(app),
                Err(err) => {
                    console_error(&format!("session search unavailable: {err}"));
                    return;
                }
            }
        }
        if let Some(app) = slot.as_mut() {
            let step = app.search.start(&mut app.host, &config);
            debug!(?step, "session search start");
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    install_panic_hook();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if is_loading(&document.ready_state()) {
        let callback = Closure::once_into_js(move || init_session_search());
        if let Err(err) = document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            warn!(error = %js_error(&err), "could not defer session search start");
        }
    } else {
        init_session_search();
    }
}
