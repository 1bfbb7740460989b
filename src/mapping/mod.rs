//! Streaming direct mapping of structural event streams to RDF triples.
//!
//! The direct mapping is a fixed, schema-less convention: object keys become
//! predicates in a configurable namespace, nested objects become new
//! subjects linked to their parent through the key that introduced them,
//! array values repeat the owning predicate per element, and scalar leaves
//! become literals. No ontology is consulted and no validation is performed.
//!
//! [`DirectMapping`] is the engine; [`parse_json`] and [`parse_value`] wire
//! the two event producers of [`crate::events`] to it.

mod direct;

pub use direct::{parse_json, parse_value, DirectMapping};

/// Placeholder predicate namespace used when the caller does not set one.
pub const DEFAULT_NAMESPACE: &str = "http://localhost/";

/// Configuration of one conversion call.
///
/// `namespace` prefixes every predicate derived from an object key.
/// `instance_namespace`, when set, switches subject minting from fresh
/// anonymous (blank) nodes to sequentially numbered IRIs under that
/// namespace, in document order starting at `0`.
#[derive(Debug, Clone)]
pub struct MappingOptions {
    pub namespace: String,
    pub instance_namespace: Option<String>,
}

impl MappingOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), instance_namespace: None }
    }

    pub fn with_instance_namespace(mut self, instance_namespace: impl Into<String>) -> Self {
        self.instance_namespace = Some(instance_namespace.into());
        self
    }
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// A node identifier minted by the engine.
///
/// `Blank` subjects carry an identifier that is only meaningful within one
/// conversion call; `Named` subjects are full IRIs minted under the
/// configured instance namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Blank(u64),
    Named(String),
}

/// A scalar leaf carried into a triple, preserving its event type tag.
///
/// There is no null variant: null scalars never produce a triple (see
/// [`DirectMapping`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Boolean(bool),
    Integer(i64),
    Double(f64),
}

/// The object position of a triple: another node, or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Node(Subject),
    Literal(Literal),
}

/// One `(subject, predicate, object)` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Subject, predicate: impl Into<String>, object: Term) -> Self {
        Self { subject, predicate: predicate.into(), object }
    }
}
