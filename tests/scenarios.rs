//
// SPDX-License-Identifier: MIT
//

//! End-to-end scenarios against the public facade, mirroring the seed
//! scenarios and properties this crate is built to satisfy.

use std::sync::Once;

use yangdb::config::{Config, DumpPolicy};
use yangdb::error::Error;
use yangdb::facade::DatastoreFacade;
use yangdb::mutation::Operation;
use yangdb::pruner::XPathEvaluator;
use yangdb::schema::{container, leaf, leaf_default, leaf_list, list, module, YangSpec};
use yangdb::{XmlHandle, XmlTree};

static INIT: Once = Once::new();

// Initializes tracing subscriber.
fn init_tracing() {
    tracing_subscriber::fmt::Subscriber::builder()
        .with_target(false)
        .with_ansi(false)
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .init();
}

fn temp_config(label: &str) -> Config {
    INIT.call_once(init_tracing);

    let dir = std::env::temp_dir().join(format!(
        "yangdb-scenarios-{label}-{}-{}",
        std::process::id(),
        label.len()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    Config { database_dir: dir.to_string_lossy().into_owned(), dump_policy: DumpPolicy::AutoDump }
}

/// A minimal hand-rolled XPath evaluator sufficient for a single-equality
/// `/x[k1='1']`-shaped predicate against a direct child leaf of a top-level
/// list. Not part of the crate's public surface — the real evaluator is out
/// of scope.
struct KeyEqualityEvaluator;

impl XPathEvaluator for KeyEqualityEvaluator {
    fn evaluate(&self, tree: &XmlTree, xpath: &str) -> Vec<XmlHandle> {
        let inner = xpath
            .trim_start_matches('/')
            .trim_end_matches(']')
            .replace('\'', "");
        let (list_name, predicate) = inner.split_once('[').expect("malformed test xpath");
        let (key_leaf, key_value) = predicate.split_once('=').expect("malformed test xpath");

        let root = tree.root();
        tree.children(root)
            .iter()
            .copied()
            .filter(|&h| tree.is_element(h) && tree.name(h) == list_name)
            .filter(|&entry| {
                tree.find_element_child(entry, key_leaf)
                    .and_then(|k| tree.body_text(k))
                    == Some(key_value)
            })
            .collect()
    }
}

#[test]
fn bare_container_read() {
    let config = temp_config("bare-container");
    let spec = YangSpec::from_modules(vec![module("m", vec![container("a", vec![leaf("b")])])]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/a/b", Some("7"), Operation::Merge).unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let a = tree.find_element_child(root, "a").unwrap();
    let b = tree.find_element_child(a, "b").unwrap();
    assert_eq!(tree.body_text(b), Some("7"));
}

#[test]
fn composite_key_list_round_trip() {
    let config = temp_config("composite-key-list");
    let spec = YangSpec::from_modules(vec![module(
        "m",
        vec![list("x", &["k1", "k2"], vec![leaf("k1"), leaf("k2"), leaf("v")])],
    )]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/x/1/aa", None, Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/1/aa/k1", Some("1"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/1/aa/k2", Some("aa"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/1/aa/v", Some("hello"), Operation::Merge).unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let entry = tree.find_list_entry(root, "x", &[("k1", "1"), ("k2", "aa")]).unwrap();
    let v = tree.find_element_child(entry, "v").unwrap();
    assert_eq!(tree.body_text(v), Some("hello"));
}

#[test]
fn leaf_list_instances_are_siblings() {
    let config = temp_config("leaf-list");
    let spec = YangSpec::from_modules(vec![module("m", vec![leaf_list("ll")])]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/ll/red", None, Operation::Merge).unwrap();
    facade.put_key(&spec, "/ll/blue", None, Operation::Merge).unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let mut bodies: Vec<_> = tree
        .children(root)
        .iter()
        .filter(|&&h| tree.name(h) == "ll")
        .map(|&h| tree.body_text(h).unwrap().to_owned())
        .collect();
    bodies.sort();
    assert_eq!(bodies, vec!["blue".to_owned(), "red".to_owned()]);
}

#[test]
fn default_injected_on_empty_db() {
    let config = temp_config("default-injection");
    let spec = YangSpec::from_modules(vec![module(
        "m",
        vec![container("c", vec![leaf_default("n", "42")])],
    )]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let c = tree.find_element_child(root, "c").unwrap();
    let n = tree.find_element_child(c, "n").unwrap();
    assert_eq!(tree.body_text(n), Some("42"));
}

#[test]
fn xpath_prune_keeps_only_matched_entry() {
    let config = temp_config("xpath-prune");
    let spec = YangSpec::from_modules(vec![module(
        "m",
        vec![list("x", &["k1", "k2"], vec![leaf("k1"), leaf("k2"), leaf("v")])],
    )]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/x/1/aa/k1", Some("1"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/1/aa/k2", Some("aa"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/1/aa/v", Some("hello"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/2/bb/k1", Some("2"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/2/bb/k2", Some("bb"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/x/2/bb/v", Some("world"), Operation::Merge).unwrap();

    let evaluator = KeyEqualityEvaluator;
    let (pruned, matches) = facade
        .get_vec(&spec, Some(("/x[k1='1']", &evaluator)))
        .unwrap();
    assert_eq!(matches.len(), 1);

    let root = pruned.root();
    assert!(pruned.find_list_entry(root, "x", &[("k1", "1")]).is_some());
    assert!(pruned.find_list_entry(root, "x", &[("k1", "2")]).is_none());
}

#[test]
fn put_then_get_round_trip_and_merge_idempotence() {
    let config = temp_config("put-get-round-trip");
    let spec = YangSpec::from_modules(vec![module("m", vec![container("a", vec![leaf("b")])])]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    let mut edit = XmlTree::new();
    let root = edit.root();
    let a_schema = spec.find_top("a").unwrap();
    let a = edit.add_element(root, "a", Some(a_schema));
    let b_schema = spec.find_child(a_schema, "b").unwrap();
    let b = edit.add_element(a, "b", Some(b_schema));
    edit.set_body(b, "7");

    facade.put(&spec, &edit, Operation::Merge).unwrap();
    facade.put(&spec, &edit, Operation::Merge).unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let a = tree.find_element_child(root, "a").unwrap();
    let b = tree.find_element_child(a, "b").unwrap();
    assert_eq!(tree.body_text(b), Some("7"));
    assert_eq!(tree.children(a).len(), 1);
}

#[test]
fn create_conflict_preserves_existing_value() {
    let config = temp_config("create-conflict");
    let spec = YangSpec::from_modules(vec![module("m", vec![container("a", vec![leaf("b")])])]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/a/b", Some("7"), Operation::Merge).unwrap();
    let result = facade.put_key(&spec, "/a/b", Some("8"), Operation::Create);
    assert!(matches!(result, Err(Error::CreateExists(_))));

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let a = tree.find_element_child(root, "a").unwrap();
    let b = tree.find_element_child(a, "b").unwrap();
    assert_eq!(tree.body_text(b), Some("7"));
}

#[test]
fn replace_resets_regardless_of_prior_contents() {
    let config = temp_config("replace-resets");
    let spec = YangSpec::from_modules(vec![module("m", vec![container("a", vec![leaf("b"), leaf("c")])])]);
    let mut facade = DatastoreFacade::open(config, "running").unwrap();

    facade.put_key(&spec, "/a/b", Some("old"), Operation::Merge).unwrap();
    facade.put_key(&spec, "/a/c", Some("new"), Operation::Replace).unwrap();

    let tree = facade.get(&spec, None).unwrap();
    let root = tree.root();
    let a = tree.find_element_child(root, "a").unwrap();
    assert!(tree.find_element_child(a, "b").is_none());
    let c = tree.find_element_child(a, "c").unwrap();
    assert_eq!(tree.body_text(c), Some("new"));
}
