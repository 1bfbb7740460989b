//! N-Triples serialization of mapped triples.
//!
//! One line per triple, `subject predicate object .`, suitable for feeding
//! a SPARQL `INSERT DATA` body or an N-Triples file. Literal datatypes
//! follow the usual xsd mapping for the non-string kinds.

use crate::error::Result;
use crate::mapping::{Literal, Subject, Term, Triple};
use std::io::Write;

const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

/// Serialize one triple as an N-Triples line (including the trailing ` .`,
/// excluding the newline).
pub fn to_ntriples(triple: &Triple) -> String {
    format!(
        "{} <{}> {} .",
        format_subject(&triple.subject),
        triple.predicate,
        format_term(&triple.object)
    )
}

fn format_subject(subject: &Subject) -> String {
    match subject {
        Subject::Blank(id) => format!("_:b{}", id),
        Subject::Named(iri) => format!("<{}>", iri),
    }
}

fn format_term(term: &Term) -> String {
    match term {
        Term::Node(subject) => format_subject(subject),
        Term::Literal(literal) => format_literal(literal),
    }
}

fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::String(s) => format!("\"{}\"", escape_literal(s)),
        Literal::Boolean(b) => format!("\"{}\"^^<{}>", b, XSD_BOOLEAN),
        Literal::Integer(i) => format!("\"{}\"^^<{}>", i, XSD_INTEGER),
        Literal::Double(d) => format!("\"{}\"^^<{}>", d, XSD_DOUBLE),
    }
}

/// Escape a string literal body per the N-Triples grammar.
fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Stream a lazy triple sequence to `writer`, one N-Triples line each.
/// Returns the number of lines written; the first error (from the stream or
/// the writer) aborts the serialization.
pub fn write_ntriples<W, I>(triples: I, writer: &mut W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<Triple>>,
{
    let mut count = 0;
    for triple in triples {
        let triple = triple?;
        writeln!(writer, "{}", to_ntriples(&triple))?;
        count += 1;
    }
    Ok(count)
}
