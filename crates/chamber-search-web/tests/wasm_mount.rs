#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

//! Browser smoke test: mount, filter after expansion, clear.
//!
//! Run:
//!   wasm-pack test --headless --firefox crates/chamber-search-web

use chamber_search_web::init_session_search;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

const HIDDEN: &str = "oc-search-hidden";

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let window = web_sys::window().expect("window");
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("timer");
}

fn document() -> web_sys::Document {
    web_sys::window().and_then(|w| w.document()).expect("document")
}

fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

fn hidden(id: &str) -> bool {
    by_id(id).expect(id).class_list().contains(HIDDEN)
}

#[wasm_bindgen_test]
async fn mounts_filters_and_clears() {
    let doc = document();
    let aside = doc.create_element("aside").unwrap();
    aside.set_inner_html(
        r#"
        <div class="border-b border-border/60"></div>
        <div class="flex-1 min-h-0">
          <div class="oc-group" id="g1"><div class="oc-group-body">
            <div id="a"><div class="typography-ui-label truncate">Refactor login</div></div>
            <div id="b"><div class="typography-ui-label truncate">Fix bug 123</div></div>
          </div></div>
          <div class="oc-group" id="g2"><div class="oc-group-body">
            <div id="c"><div class="typography-ui-label truncate">refactor tests</div></div>
          </div></div>
        </div>
        "#,
    );
    doc.body().unwrap().append_child(&aside).unwrap();

    init_session_search();
    sleep(20).await;
    init_session_search();

    assert_eq!(
        doc.query_selector_all("#oc-session-search").unwrap().length(),
        1
    );
    assert!(by_id("oc-session-search-styles").is_some());
    let input: HtmlInputElement = by_id("oc-session-search-input")
        .unwrap()
        .dyn_into()
        .unwrap();

    input.set_value("Refactor");
    let event = web_sys::Event::new("input").unwrap();
    input.dispatch_event(&event).unwrap();
    // First keystroke only expands.
    assert!(!hidden("b"));
    sleep(120).await;

    assert!(!hidden("a"));
    assert!(hidden("b"));
    assert!(!hidden("c"));
    assert!(!hidden("g1"));
    assert!(!hidden("g2"));

    let clear: HtmlElement = doc
        .query_selector("#oc-session-search .clear-btn")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert!(clear.class_list().contains("visible"));
    clear.click();

    assert_eq!(input.value(), "");
    for id in ["a", "b", "c", "g1", "g2"] {
        assert!(!hidden(id), "{id} should be visible after clear");
    }
    assert!(!clear.class_list().contains("visible"));
}
