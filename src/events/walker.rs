//! Event producer over an already-parsed `serde_json::Value`.
//!
//! Emits the same event language as the streaming tokenizer, driven by an
//! explicit frame stack rather than recursion, so deeply nested values
//! cannot overflow the call stack. A `Value` tree is acyclic by
//! construction, so no cycle detection is needed here.

use crate::events::{Event, Scalar};
use serde_json::Value;

enum Frame<'a> {
    Object(serde_json::map::Iter<'a>),
    Array(std::slice::Iter<'a, Value>),
    /// A member value whose `Key` event has already been emitted.
    Pending(&'a Value),
}

/// Lazy depth-first walk of a [`Value`], yielding [`Event`]s.
pub struct ValueEvents<'a> {
    start: Option<&'a Value>,
    stack: Vec<Frame<'a>>,
}

impl<'a> ValueEvents<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { start: Some(value), stack: Vec::new() }
    }

    fn enter(&mut self, value: &'a Value) -> Event {
        match value {
            Value::Object(map) => {
                self.stack.push(Frame::Object(map.iter()));
                Event::StartObject
            }
            Value::Array(items) => {
                self.stack.push(Frame::Array(items.iter()));
                Event::StartArray
            }
            Value::Null => Event::Scalar(Scalar::Null),
            Value::Bool(b) => Event::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Event::Scalar(scalar_for_number(n)),
            Value::String(s) => Event::Scalar(Scalar::String(s.clone())),
        }
    }
}

fn scalar_for_number(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else {
        // u64 beyond i64::MAX or a float; keep it as a double
        Scalar::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl<'a> Iterator for ValueEvents<'a> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.start.take() {
            return Some(self.enter(value));
        }
        loop {
            match self.stack.last_mut()? {
                Frame::Pending(_) => {
                    let Some(Frame::Pending(value)) = self.stack.pop() else {
                        unreachable!("top frame checked above");
                    };
                    return Some(self.enter(value));
                }
                Frame::Object(entries) => match entries.next() {
                    Some((key, value)) => {
                        let key = key.clone();
                        self.stack.push(Frame::Pending(value));
                        return Some(Event::Key(key));
                    }
                    None => {
                        self.stack.pop();
                        return Some(Event::EndObject);
                    }
                },
                Frame::Array(items) => match items.next() {
                    Some(value) => return Some(self.enter(value)),
                    None => {
                        self.stack.pop();
                        return Some(Event::EndArray);
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_walk_matches_tokenizer_language() {
        let value = json!({"a": [1, {"b": "x"}]});
        let events: Vec<Event> = ValueEvents::new(&value).collect();
        assert_eq!(
            events,
            vec![
                Event::StartObject,
                Event::Key("a".to_string()),
                Event::StartArray,
                Event::Scalar(Scalar::Integer(1)),
                Event::StartObject,
                Event::Key("b".to_string()),
                Event::Scalar(Scalar::String("x".to_string())),
                Event::EndObject,
                Event::EndArray,
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn test_scalar_root() {
        let value = json!(3.5);
        let events: Vec<Event> = ValueEvents::new(&value).collect();
        assert_eq!(events, vec![Event::Scalar(Scalar::Double(3.5))]);
    }
}
