//! Direct Mapping Engine Tests
//!
//! These tests verify the streaming direct-mapping conversion:
//! - Flat objects, nesting links, arrays of scalars and of objects
//! - Blank-node vs. sequentially numbered subject minting
//! - Edge cases: null values, empty objects, top-level scalars
//! - Failure semantics for malformed input

use directmap::{parse_json, MappingOptions, Literal, Subject, Term, Triple};

fn convert(json: &str, options: MappingOptions) -> Vec<Triple> {
    parse_json(json.as_bytes(), options).map(|t| t.unwrap()).collect()
}

fn ex_options() -> MappingOptions {
    MappingOptions::new("http://ex/")
}

#[test]
fn test_flat_object_yields_one_triple_per_key_in_key_order() {
    let triples = convert(r#"{"a": 1, "b": "x", "c": true}"#, ex_options());

    assert_eq!(triples.len(), 3);
    assert_eq!(triples[0].predicate, "http://ex/a");
    assert_eq!(triples[0].object, Term::Literal(Literal::Integer(1)));
    assert_eq!(triples[1].predicate, "http://ex/b");
    assert_eq!(triples[1].object, Term::Literal(Literal::String("x".to_string())));
    assert_eq!(triples[2].predicate, "http://ex/c");
    assert_eq!(triples[2].object, Term::Literal(Literal::Boolean(true)));

    // All three share the single minted subject
    assert_eq!(triples[0].subject, triples[1].subject);
    assert_eq!(triples[1].subject, triples[2].subject);
}

#[test]
fn test_nested_object_yields_a_link_triple() {
    let triples = convert(r#"{"a": {"b": 1}}"#, ex_options());

    assert_eq!(triples.len(), 2);
    assert_eq!(triples[0].predicate, "http://ex/a");
    let Term::Node(inner) = &triples[0].object else {
        panic!("expected a node link, got {:?}", triples[0].object);
    };
    assert_ne!(&triples[0].subject, inner);
    assert_eq!(&triples[1].subject, inner);
    assert_eq!(triples[1].predicate, "http://ex/b");
    assert_eq!(triples[1].object, Term::Literal(Literal::Integer(1)));
}

#[test]
fn test_array_of_scalars_repeats_subject_and_predicate() {
    let triples = convert(r#"{"a": [1, 2, 3]}"#, ex_options());

    assert_eq!(triples.len(), 3);
    for (triple, expected) in triples.iter().zip([1, 2, 3]) {
        assert_eq!(triple.subject, triples[0].subject);
        assert_eq!(triple.predicate, "http://ex/a");
        assert_eq!(triple.object, Term::Literal(Literal::Integer(expected)));
    }
}

#[test]
fn test_array_of_objects_restores_the_array_predicate() {
    // The central regression test for the array-property memo: the second
    // object must link through the array's own key, not through whatever
    // key the first object last processed.
    let triples = convert(r#"{"a": [{"b": 1}, {"b": 2}]}"#, ex_options());

    assert_eq!(triples.len(), 4);

    // Two parent->child links, both via the array's key
    assert_eq!(triples[0].predicate, "http://ex/a");
    assert_eq!(triples[2].predicate, "http://ex/a");
    assert_eq!(triples[0].subject, triples[2].subject);
    let (Term::Node(first_child), Term::Node(second_child)) =
        (&triples[0].object, &triples[2].object)
    else {
        panic!("expected node links");
    };
    assert_ne!(first_child, second_child);

    // One scalar triple per child, each on its own subject
    assert_eq!(triples[1].subject, *first_child);
    assert_eq!(triples[1].predicate, "http://ex/b");
    assert_eq!(triples[1].object, Term::Literal(Literal::Integer(1)));
    assert_eq!(triples[3].subject, *second_child);
    assert_eq!(triples[3].predicate, "http://ex/b");
    assert_eq!(triples[3].object, Term::Literal(Literal::Integer(2)));
}

#[test]
fn test_instance_namespace_numbers_subjects_in_document_order() {
    let options = ex_options().with_instance_namespace("http://ex/inst/");
    let triples = convert(r#"[{"a": 1}, {"a": 2}]"#, options);

    assert_eq!(triples.len(), 2);
    assert_eq!(triples[0].subject, Subject::Named("http://ex/inst/0".to_string()));
    assert_eq!(triples[1].subject, Subject::Named("http://ex/inst/1".to_string()));
}

#[test]
fn test_conversion_is_deterministic_with_instance_namespace() {
    let json = r#"{"a": [{"b": 1}, {"b": 2}], "c": "x"}"#;
    let options = ex_options().with_instance_namespace("http://ex/inst/");
    let first = convert(json, options.clone());
    let second = convert(json, options);
    assert_eq!(first, second);
}

#[test]
fn test_empty_nested_object_yields_only_the_link() {
    let triples = convert(r#"{"a": {}}"#, ex_options());
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].predicate, "http://ex/a");
    assert!(matches!(triples[0].object, Term::Node(_)));
}

#[test]
fn test_null_values_yield_no_triples() {
    let triples = convert(r#"{"a": null, "b": 1}"#, ex_options());
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].predicate, "http://ex/b");
}

#[test]
fn test_top_level_scalar_yields_no_triples() {
    assert!(convert("5", ex_options()).is_empty());
    assert!(convert(r#""loose string""#, ex_options()).is_empty());
}

#[test]
fn test_empty_input_yields_no_triples() {
    assert!(convert("", ex_options()).is_empty());
    assert!(convert("{}", ex_options()).is_empty());
}

#[test]
fn test_double_and_integer_tags_are_preserved() {
    let triples = convert(r#"{"a": 1, "b": 1.0}"#, ex_options());
    assert_eq!(triples[0].object, Term::Literal(Literal::Integer(1)));
    assert_eq!(triples[1].object, Term::Literal(Literal::Double(1.0)));
}

#[test]
fn test_default_namespace_is_the_placeholder() {
    let triples = convert(r#"{"a": 1}"#, MappingOptions::default());
    assert_eq!(triples[0].predicate, "http://localhost/a");
}

#[test]
fn test_wide_flat_document_converts_completely() {
    // 100k sibling keys: nesting depth stays at one throughout
    let mut json = String::from("{");
    for i in 0..100_000 {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!("\"k{}\": {}", i, i));
    }
    json.push('}');

    let count = parse_json(json.as_bytes(), ex_options()).map(|t| t.unwrap()).count();
    assert_eq!(count, 100_000);
}

#[test]
fn test_deep_chain_converts_completely() {
    // 10k-deep nesting chain; the walk is iterative, not recursive
    let depth = 10_000;
    let mut json = String::new();
    for _ in 0..depth {
        json.push_str("{\"a\":");
    }
    json.push('1');
    for _ in 0..depth {
        json.push('}');
    }

    let count = parse_json(json.as_bytes(), ex_options()).map(|t| t.unwrap()).count();
    // One link per nesting step plus the innermost scalar
    assert_eq!(count, depth);
}

#[test]
fn test_truncated_document_is_a_fatal_error() {
    let mut stream = parse_json(&br#"{"a": 1, "b""#[..], ex_options());
    assert!(stream.next().unwrap().is_ok());
    assert!(stream.next().unwrap().is_err());
    assert!(stream.next().is_none());
}
