//! Structural event streams describing the shape of a tree-shaped document.
//!
//! The direct-mapping engine in [`crate::mapping`] is driven by a flat
//! sequence of [`Event`]s mirroring a depth-first walk of a JSON-like tree:
//! every `StartObject` is matched by exactly one `EndObject`, and every
//! `Key` is immediately followed by the event(s) of its value. Two producers
//! emit this language:
//!
//! - [`json::JsonEventReader`] tokenizes a JSON document from any buffered
//!   reader, one event at a time.
//! - [`walker::ValueEvents`] walks an already-parsed [`serde_json::Value`].

pub mod json;
pub mod walker;

pub use json::JsonEventReader;
pub use walker::ValueEvents;

/// A scalar leaf value, preserving the type tag the producer assigned.
///
/// The integer/double distinction is made at the production boundary (the
/// tokenizer keeps `1` and `1.0` apart lexically); downstream consumers
/// forward the tag as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    String(String),
    Bool(bool),
    Integer(i64),
    Double(f64),
}

/// One structural token of a tree-shaped document.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// An object member key. Always immediately followed by the event(s)
    /// for the member's value.
    Key(String),
    Scalar(Scalar),
}
