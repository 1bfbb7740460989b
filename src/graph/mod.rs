//! Graph assembly on top of oxigraph.
//!
//! The mapping engine yields triples one at a time; this module is the
//! downstream sink that collects them into an [`oxigraph::store::Store`]
//! and dumps canonical N-Triples. Loading deduplicates, so converting the
//! same document twice into one store does not double its size.

use crate::error::{Error, Result};
use crate::mapping::{self, Literal, MappingOptions, Subject, Term, Triple};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{BlankNode, GraphName, GraphNameRef, Literal as OxLiteral, NamedNode, Quad};
use oxigraph::store::Store;
use serde_json::Value;

/// Convert one mapped triple into an oxigraph quad in the default graph.
///
/// Blank identifiers are only meaningful within one conversion call; `scope`
/// is prefixed onto the blank node label so triples from different calls can
/// share a store without their anonymous subjects collapsing into one.
pub fn to_quad(triple: &Triple, scope: &str) -> Result<Quad> {
    let predicate = NamedNode::new(&triple.predicate)?;
    let object: oxigraph::model::Term = match &triple.object {
        Term::Node(subject) => match subject {
            Subject::Blank(id) => blank_node(scope, *id)?.into(),
            Subject::Named(iri) => NamedNode::new(iri)?.into(),
        },
        Term::Literal(literal) => match literal {
            Literal::String(s) => OxLiteral::new_simple_literal(s).into(),
            Literal::Boolean(b) => OxLiteral::from(*b).into(),
            Literal::Integer(i) => OxLiteral::from(*i).into(),
            Literal::Double(d) => OxLiteral::from(*d).into(),
        },
    };
    let quad = match &triple.subject {
        Subject::Blank(id) => Quad::new(
            blank_node(scope, *id)?,
            predicate,
            object,
            GraphName::DefaultGraph,
        ),
        Subject::Named(iri) => {
            Quad::new(NamedNode::new(iri)?, predicate, object, GraphName::DefaultGraph)
        }
    };
    Ok(quad)
}

fn blank_node(scope: &str, id: u64) -> Result<BlankNode> {
    BlankNode::new(format!("{}b{}", scope, id)).map_err(|e| Error::InvalidIri(e.to_string()))
}

/// Load a lazy triple sequence into `store` under one blank-node scope.
/// Returns the number of quads that were actually inserted (duplicates are
/// not counted).
pub fn load_triples<I>(store: &Store, triples: I, scope: &str) -> Result<usize>
where
    I: IntoIterator<Item = Result<Triple>>,
{
    let mut inserted = 0;
    for triple in triples {
        let quad = to_quad(&triple?, scope)?;
        if store.insert(&quad)? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Dump the default graph of `store` as N-Triples.
pub fn dump_ntriples(store: &Store) -> Result<String> {
    let buffer = store
        .dump_graph_to_writer(
            GraphNameRef::DefaultGraph,
            RdfSerializer::from_format(RdfFormat::NTriples),
            Vec::new(),
        )
        .map_err(|e| Error::Serialization(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| Error::Serialization(e.to_string()))
}

/// Convert JSON documents to N-Triples by direct mapping, assembling all of
/// them into one graph.
pub fn json_to_ntriples<'a, I>(inputs: I, options: &MappingOptions) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let store = Store::new()?;
    for (index, input) in inputs.into_iter().enumerate() {
        let triples = mapping::parse_json(input.as_bytes(), options.clone());
        load_triples(&store, triples, &format!("d{}", index))?;
    }
    dump_ntriples(&store)
}

/// Convert in-memory [`Value`] trees to N-Triples by direct mapping,
/// assembling all of them into one graph.
pub fn value_to_ntriples<'a, I>(inputs: I, options: &MappingOptions) -> Result<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let store = Store::new()?;
    for (index, input) in inputs.into_iter().enumerate() {
        let triples = mapping::parse_value(input, options.clone());
        load_triples(&store, triples, &format!("d{}", index))?;
    }
    dump_ntriples(&store)
}
