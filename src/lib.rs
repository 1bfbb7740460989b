//! # directmap
//!
//! Streaming direct mapping of JSON and in-memory tree data to RDF triples,
//! plus the pipeline utilities that usually sit around that conversion in a
//! data pipeline: N-Triples serialization, oxigraph graph assembly, a SPARQL
//! 1.1 Graph Store HTTP client, and a deployment dependency/readiness model
//! for coordinating orchestrated jobs.
//!
//! ## Features
//!
//! - Single-pass, lazy JSON-to-triple conversion with memory proportional
//!   to nesting depth
//! - Blank-node or sequentially numbered subject minting
//! - Graph assembly and canonical N-Triples output via oxigraph
//! - Async clients for SPARQL Graph Store endpoints and an orchestration
//!   server's deployment API
//!
//! ## Example
//!
//! ```rust
//! use directmap::{parse_json, MappingOptions, Result};
//!
//! fn example() -> Result<()> {
//!     let json = br#"{"title": "archive item"}"#;
//!     let options = MappingOptions::new("http://example.org/ns#");
//!     for triple in parse_json(&json[..], options) {
//!         println!("{}", directmap::ntriples::to_ntriples(&triple?));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

/// Deployment dependency/readiness coordination
pub mod deployment;

/// Error types and result definitions
pub mod error;

/// Structural event streams and their producers
pub mod events;

/// Graph assembly on top of oxigraph
pub mod graph;

/// The streaming direct-mapping engine
pub mod mapping;

/// N-Triples serialization
pub mod ntriples;

/// SPARQL 1.1 Graph Store HTTP client
pub mod sparql;

// Re-export commonly used types
pub use error::{Error, Result};
pub use mapping::{
    parse_json, parse_value, DirectMapping, Literal, MappingOptions, Subject, Term, Triple,
};
