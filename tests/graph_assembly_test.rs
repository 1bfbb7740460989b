//! Graph Assembly Integration Tests
//!
//! These tests run the full pipeline: JSON -> events -> triples -> oxigraph
//! store -> N-Triples dump.

use directmap::graph::{json_to_ntriples, load_triples, value_to_ntriples};
use directmap::{parse_json, MappingOptions};
use oxigraph::store::Store;
use serde_json::json;

fn ex_options() -> MappingOptions {
    MappingOptions::new("http://ex/")
}

#[test]
fn test_json_to_ntriples_flat_object() {
    let output = json_to_ntriples([r#"{"a": 1}"#], &ex_options()).unwrap();

    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("<http://ex/a>"));
    assert!(output.contains("\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
    assert!(output.starts_with("_:"));
}

#[test]
fn test_json_to_ntriples_keeps_documents_apart() {
    // Same shape twice: the blank subjects must stay distinct per document
    let output = json_to_ntriples([r#"{"a": 1}"#, r#"{"a": 1}"#], &ex_options()).unwrap();

    let subjects: std::collections::HashSet<&str> =
        output.lines().map(|l| l.split_whitespace().next().unwrap()).collect();
    assert_eq!(output.lines().count(), 2);
    assert_eq!(subjects.len(), 2);
}

#[test]
fn test_identical_named_triples_deduplicate() {
    let options = ex_options().with_instance_namespace("http://ex/inst/");
    let output = json_to_ntriples([r#"{"a": 1}"#, r#"{"a": 1}"#], &options).unwrap();

    // Both documents mint http://ex/inst/0 and assert the same triple
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("<http://ex/inst/0>"));
}

#[test]
fn test_value_to_ntriples_nested() {
    let value = json!({"item": {"title": "tape 1"}});
    let output = value_to_ntriples([&value], &ex_options()).unwrap();

    assert_eq!(output.lines().count(), 2);
    assert!(output.contains("<http://ex/item>"));
    assert!(output.contains("<http://ex/title>"));
    assert!(output.contains("\"tape 1\""));
}

#[test]
fn test_load_triples_reports_inserted_count() {
    let store = Store::new().unwrap();
    let triples = parse_json(&br#"{"a": [1, 2, 2]}"#[..], ex_options());
    let inserted = load_triples(&store, triples, "d0").unwrap();

    // The duplicate literal collapses inside the store
    assert_eq!(inserted, 2);
    assert_eq!(store.len().unwrap(), 2);
}
