//! The streaming direct-mapping engine.

use crate::error::{Error, Result};
use crate::events::{Event, JsonEventReader, Scalar, ValueEvents};
use crate::mapping::{Literal, MappingOptions, Subject, Term, Triple};
use serde_json::Value;
use std::collections::HashMap;
use std::io::BufRead;

/// Iterator adapter turning an event stream into a lazy triple stream.
///
/// All engine state is scoped to one call: a subject stack mirroring the
/// open-object nesting depth, a memo of the predicate that was active when
/// an array was opened under a subject (so sibling objects inside one array
/// all attach through the array's own key), and the current predicate set by
/// the most recent `Key` event.
///
/// Each triple is yielded the instant it is derivable, so memory use is
/// proportional to nesting depth, not document size. The stream is
/// single-pass and not restartable; converting again requires a fresh event
/// source.
///
/// Null scalars are skipped and never produce a triple. Scalars seen with no
/// open subject or no active predicate are skipped as well. A close event
/// with nothing open is a structural violation: the iterator yields a fatal
/// [`Error::Structure`] and then fuses.
pub struct DirectMapping<E> {
    events: E,
    options: MappingOptions,
    subject_stack: Vec<Subject>,
    array_predicates: HashMap<Subject, String>,
    predicate: Option<String>,
    next_instance: u64,
    next_blank: u64,
    failed: bool,
}

impl<E> DirectMapping<E>
where
    E: Iterator<Item = Result<Event>>,
{
    pub fn new(events: E, options: MappingOptions) -> Self {
        Self {
            events,
            options,
            subject_stack: Vec::new(),
            array_predicates: HashMap::new(),
            predicate: None,
            next_instance: 0,
            next_blank: 0,
            failed: false,
        }
    }

    /// Current open-object nesting depth.
    pub fn depth(&self) -> usize {
        self.subject_stack.len()
    }

    fn mint_subject(&mut self) -> Subject {
        match &self.options.instance_namespace {
            Some(ns) => {
                let subject = Subject::Named(format!("{}{}", ns, self.next_instance));
                self.next_instance += 1;
                subject
            }
            None => {
                let subject = Subject::Blank(self.next_blank);
                self.next_blank += 1;
                subject
            }
        }
    }

    /// Process one event; returns a triple when the event completes one.
    fn apply(&mut self, event: Event) -> Result<Option<Triple>> {
        match event {
            Event::Key(key) => {
                self.predicate = Some(format!("{}{}", self.options.namespace, key));
                Ok(None)
            }
            Event::StartArray => {
                // Remember which predicate owns this array so it can be
                // restored after each object element closes
                if let (Some(subject), Some(predicate)) =
                    (self.subject_stack.last(), self.predicate.as_ref())
                {
                    self.array_predicates.insert(subject.clone(), predicate.clone());
                }
                Ok(None)
            }
            Event::EndArray => {
                if let Some(subject) = self.subject_stack.last() {
                    self.array_predicates.remove(subject);
                }
                Ok(None)
            }
            Event::StartObject => {
                let subject = self.mint_subject();
                let link = match (self.subject_stack.last(), self.predicate.as_ref()) {
                    (Some(parent), Some(predicate)) => Some(Triple::new(
                        parent.clone(),
                        predicate.clone(),
                        Term::Node(subject.clone()),
                    )),
                    _ => None,
                };
                self.subject_stack.push(subject);
                Ok(link)
            }
            Event::EndObject => {
                self.subject_stack
                    .pop()
                    .ok_or_else(|| Error::Structure("subject stack underflow".to_string()))?;
                if let Some(subject) = self.subject_stack.last() {
                    if let Some(predicate) = self.array_predicates.get(subject) {
                        self.predicate = Some(predicate.clone());
                    }
                }
                Ok(None)
            }
            Event::Scalar(scalar) => {
                let literal = match scalar {
                    // Null objects are meaningless in an RDF-shaped model
                    Scalar::Null => return Ok(None),
                    Scalar::String(s) => Literal::String(s),
                    Scalar::Bool(b) => Literal::Boolean(b),
                    Scalar::Integer(i) => Literal::Integer(i),
                    Scalar::Double(d) => Literal::Double(d),
                };
                match (self.subject_stack.last(), self.predicate.as_ref()) {
                    (Some(subject), Some(predicate)) => Ok(Some(Triple::new(
                        subject.clone(),
                        predicate.clone(),
                        Term::Literal(literal),
                    ))),
                    // No open subject or no active predicate: nothing to
                    // attach the scalar to
                    _ => Ok(None),
                }
            }
        }
    }
}

impl<E> Iterator for DirectMapping<E>
where
    E: Iterator<Item = Result<Event>>,
{
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.events.next()? {
                Ok(event) => match self.apply(event) {
                    Ok(Some(triple)) => return Some(Ok(triple)),
                    Ok(None) => continue,
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                },
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Convert a JSON document read from `reader` into a lazy triple stream.
pub fn parse_json<R: BufRead>(
    reader: R,
    options: MappingOptions,
) -> DirectMapping<JsonEventReader<R>> {
    DirectMapping::new(JsonEventReader::new(reader), options)
}

/// Convert an in-memory [`Value`] tree into a lazy triple stream.
pub fn parse_value(
    value: &Value,
    options: MappingOptions,
) -> DirectMapping<impl Iterator<Item = Result<Event>> + '_> {
    DirectMapping::new(ValueEvents::new(value).map(Ok), options)
}
