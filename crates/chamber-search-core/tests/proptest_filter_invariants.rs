//! Property-based invariant tests for the filter engine.
//!
//! ## Invariants
//!
//! 1. Item visibility: an item is visible iff its normalized label contains
//!    the normalized query.
//! 2. Group visibility: a group is hidden iff every item in its body is hidden.
//! 3. Clearing: an empty query leaves no hidden marker anywhere.
//! 4. Idempotence: re-running a pass with the same query changes nothing.

use std::time::Duration;

use chamber_search_core::filter::normalize;
use chamber_search_core::headless::{HeadlessHost, NodeId};
use chamber_search_core::{
    Document, FilterEngine, FilterOutcome, HIDDEN_CLASS, HostContract, SearchState,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_title() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9 ]{0,12}").unwrap()
}

fn arb_groups() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(arb_title(), 0..5), 1..5)
}

fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z]{1,3}").unwrap(),
        prop::string::string_regex(" ?[A-Z][a-z]{0,2} ?").unwrap(),
    ]
}

// ── Fixture ───────────────────────────────────────────────────────────────

struct Built {
    host: HeadlessHost,
    groups: Vec<(NodeId, Vec<(NodeId, String)>)>,
}

fn build(groups: &[Vec<String>]) -> Built {
    let mut host = HeadlessHost::new();
    let nodes = host.append_sidebar();
    let mut built = Vec::new();
    for titles in groups {
        let (group, body) = host.append_group(&nodes.list_region);
        let items = titles
            .iter()
            .map(|title| (host.append_session(&body, title), title.clone()))
            .collect();
        built.push((group, items));
    }
    host.flush();
    Built {
        host,
        groups: built,
    }
}

fn engine() -> FilterEngine {
    FilterEngine::new(
        HostContract::default().compile().unwrap(),
        Duration::from_millis(50),
    )
}

fn filtered(host: &mut HeadlessHost, query: &str) -> FilterOutcome {
    let mut state = SearchState::new();
    let engine = engine();
    let first = engine.apply(host, &mut state, query);
    assert!(matches!(first, FilterOutcome::Expanding { .. }));
    engine.apply(host, &mut state, query)
}

fn hidden_markers(host: &HeadlessHost) -> usize {
    let root = host.root();
    host.query_all(&root, &chamber_search_core::Selector::tag_only("div"))
        .iter()
        .filter(|node| host.has_class(node, HIDDEN_CLASS))
        .count()
}

// ── 1 & 2. Item and group visibility ──────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn item_visible_iff_label_contains_query(groups in arb_groups(), query in arb_query()) {
        let mut built = build(&groups);
        let outcome = filtered(&mut built.host, &query);
        let needle = normalize(&query);

        let mut expected_visible = 0;
        for (_, items) in &built.groups {
            for (node, title) in items {
                let visible = normalize(title).contains(&needle);
                expected_visible += usize::from(visible);
                prop_assert_eq!(!built.host.has_class(node, HIDDEN_CLASS), visible);
            }
        }
        let FilterOutcome::Filtered(report) = outcome else {
            return Err(TestCaseError::fail("second pass must filter"));
        };
        prop_assert_eq!(report.visible_items, expected_visible);
    }

    #[test]
    fn group_hidden_iff_all_items_hidden(groups in arb_groups(), query in arb_query()) {
        let mut built = build(&groups);
        filtered(&mut built.host, &query);

        for (group, items) in &built.groups {
            let all_hidden = items
                .iter()
                .all(|(node, _)| built.host.has_class(node, HIDDEN_CLASS));
            prop_assert_eq!(built.host.has_class(group, HIDDEN_CLASS), all_hidden);
        }
    }
}

// ── 3 & 4. Clearing and idempotence ───────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn empty_query_clears_every_marker(groups in arb_groups(), query in arb_query()) {
        let mut built = build(&groups);
        filtered(&mut built.host, &query);

        let mut state = SearchState::new();
        let outcome = engine().apply(&mut built.host, &mut state, "");
        prop_assert!(matches!(outcome, FilterOutcome::Cleared(_)));
        prop_assert_eq!(hidden_markers(&built.host), 0);
    }

    #[test]
    fn repeated_pass_is_stable(groups in arb_groups(), query in arb_query()) {
        let mut built = build(&groups);
        let first = filtered(&mut built.host, &query);
        let before: Vec<Vec<String>> = built
            .groups
            .iter()
            .flat_map(|(group, items)| {
                std::iter::once(*group).chain(items.iter().map(|(node, _)| *node))
            })
            .map(|node| built.host.classes(&node).to_vec())
            .collect();

        let mut state = SearchState::new();
        let engine = engine();
        engine.apply(&mut built.host, &mut state, &query);
        let second = engine.apply(&mut built.host, &mut state, &query);
        prop_assert_eq!(first, second);

        let after: Vec<Vec<String>> = built
            .groups
            .iter()
            .flat_map(|(group, items)| {
                std::iter::once(*group).chain(items.iter().map(|(node, _)| *node))
            })
            .map(|node| built.host.classes(&node).to_vec())
            .collect();
        prop_assert_eq!(before, after);
    }
}
