//! Streaming JSON tokenizer.
//!
//! Reads a JSON document from any buffered reader and yields one
//! [`Event`] at a time, without ever materializing the document. State is
//! proportional to nesting depth, so arbitrarily large documents can be
//! tokenized in constant memory relative to their size.
//!
//! The integer/double distinction is decided here, lexically: a number
//! token containing `.`, `e` or `E` becomes a [`Scalar::Double`], anything
//! else a [`Scalar::Integer`] (falling back to double on `i64` overflow).

use crate::error::{Error, Result};
use crate::events::{Event, Scalar};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Expecting a value (document start, after `:`, after `,` in an array).
    Value,
    /// Just opened an object: expecting a key or `}`.
    FirstKey,
    /// After `,` in an object: expecting a key.
    NextKey,
    /// Just opened an array: expecting a value or `]`.
    FirstElement,
    /// A value has been completed: expecting `,`, a closer, or end of input.
    AfterValue,
    Finished,
}

/// Pull-based JSON tokenizer yielding [`Event`]s.
///
/// The iterator is fused on error: after yielding an `Err` it only returns
/// `None`. An empty (or whitespace-only) input yields no events at all.
pub struct JsonEventReader<R> {
    reader: R,
    peeked: Option<u8>,
    pos: usize,
    stack: Vec<Container>,
    state: State,
    failed: bool,
}

impl<R: BufRead> JsonEventReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, peeked: None, pos: 0, stack: Vec::new(), state: State::Value, failed: false }
    }

    /// Byte offset of the next unconsumed input byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn raw_read(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let b = match self.peeked.take() {
            Some(b) => Some(b),
            None => self.raw_read()?,
        };
        if b.is_some() {
            self.pos += 1;
        }
        Ok(b)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = self.raw_read()?;
        }
        Ok(self.peeked)
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.peek_byte()? {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.read_byte()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Consume the remainder of a keyword (`true`, `false`, `null`) whose
    /// first byte has already been read.
    fn expect_keyword(&mut self, rest: &[u8], keyword: &str) -> Result<()> {
        for expected in rest {
            match self.read_byte()? {
                Some(b) if b == *expected => {}
                _ => {
                    return Err(Error::syntax(self.pos, format!("invalid literal, expected '{}'", keyword)));
                }
            }
        }
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let b = self
                .read_byte()?
                .ok_or_else(|| Error::syntax(self.pos, "unterminated unicode escape"))?;
            let digit = (b as char)
                .to_digit(16)
                .ok_or_else(|| Error::syntax(self.pos, "invalid unicode escape"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    /// Read a string body; the opening quote has already been consumed.
    fn read_string(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        loop {
            let b = self
                .read_byte()?
                .ok_or_else(|| Error::syntax(self.pos, "unterminated string"))?;
            match b {
                b'"' => break,
                b'\\' => {
                    let esc = self
                        .read_byte()?
                        .ok_or_else(|| Error::syntax(self.pos, "unterminated string"))?;
                    match esc {
                        b'"' => buf.push(b'"'),
                        b'\\' => buf.push(b'\\'),
                        b'/' => buf.push(b'/'),
                        b'b' => buf.push(0x08),
                        b'f' => buf.push(0x0c),
                        b'n' => buf.push(b'\n'),
                        b'r' => buf.push(b'\r'),
                        b't' => buf.push(b'\t'),
                        b'u' => {
                            let unit = self.read_hex4()?;
                            let code = if (0xD800..=0xDBFF).contains(&unit) {
                                // High surrogate, must be followed by a low one
                                if self.read_byte()? != Some(b'\\') || self.read_byte()? != Some(b'u') {
                                    return Err(Error::syntax(self.pos, "unpaired surrogate in string"));
                                }
                                let low = self.read_hex4()?;
                                if !(0xDC00..=0xDFFF).contains(&low) {
                                    return Err(Error::syntax(self.pos, "unpaired surrogate in string"));
                                }
                                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                            } else if (0xDC00..=0xDFFF).contains(&unit) {
                                return Err(Error::syntax(self.pos, "unpaired surrogate in string"));
                            } else {
                                unit
                            };
                            let ch = char::from_u32(code)
                                .ok_or_else(|| Error::syntax(self.pos, "invalid unicode escape"))?;
                            let mut utf8 = [0u8; 4];
                            buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                        }
                        _ => return Err(Error::syntax(self.pos, "invalid escape sequence")),
                    }
                }
                0x00..=0x1f => {
                    return Err(Error::syntax(self.pos, "unescaped control character in string"));
                }
                _ => buf.push(b),
            }
        }
        String::from_utf8(buf).map_err(|_| Error::syntax(self.pos, "invalid UTF-8 in string"))
    }

    /// Read a number token whose first byte has already been consumed.
    fn read_number(&mut self, first: u8) -> Result<Scalar> {
        let mut buf = vec![first];
        while let Some(b) = self.peek_byte()? {
            match b {
                b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-' => {
                    self.read_byte()?;
                    buf.push(b);
                }
                _ => break,
            }
        }
        // `buf` is pure ASCII by construction
        let text = std::str::from_utf8(&buf).expect("number token is ASCII");
        let is_float = buf.iter().any(|b| matches!(b, b'.' | b'e' | b'E'));
        if is_float {
            text.parse::<f64>()
                .map(Scalar::Double)
                .map_err(|_| Error::syntax(self.pos, format!("invalid number '{}'", text)))
        } else {
            match text.parse::<i64>() {
                Ok(i) => Ok(Scalar::Integer(i)),
                // Out of i64 range; keep the value as a double
                Err(_) => text
                    .parse::<f64>()
                    .map(Scalar::Double)
                    .map_err(|_| Error::syntax(self.pos, format!("invalid number '{}'", text))),
            }
        }
    }

    /// Read a complete value token. The leading whitespace has been skipped
    /// and `first` is its first byte.
    fn read_value(&mut self, first: u8) -> Result<Event> {
        match first {
            b'{' => {
                self.stack.push(Container::Object);
                self.state = State::FirstKey;
                Ok(Event::StartObject)
            }
            b'[' => {
                self.stack.push(Container::Array);
                self.state = State::FirstElement;
                Ok(Event::StartArray)
            }
            b'"' => {
                let s = self.read_string()?;
                self.state = State::AfterValue;
                Ok(Event::Scalar(Scalar::String(s)))
            }
            b't' => {
                self.expect_keyword(b"rue", "true")?;
                self.state = State::AfterValue;
                Ok(Event::Scalar(Scalar::Bool(true)))
            }
            b'f' => {
                self.expect_keyword(b"alse", "false")?;
                self.state = State::AfterValue;
                Ok(Event::Scalar(Scalar::Bool(false)))
            }
            b'n' => {
                self.expect_keyword(b"ull", "null")?;
                self.state = State::AfterValue;
                Ok(Event::Scalar(Scalar::Null))
            }
            b'-' | b'0'..=b'9' => {
                let scalar = self.read_number(first)?;
                self.state = State::AfterValue;
                Ok(Event::Scalar(scalar))
            }
            other => Err(Error::syntax(
                self.pos,
                format!("unexpected character '{}'", other as char),
            )),
        }
    }

    /// Read an object key plus its trailing colon; the opening quote has
    /// already been consumed.
    fn read_key(&mut self) -> Result<Event> {
        let key = self.read_string()?;
        self.skip_whitespace()?;
        match self.read_byte()? {
            Some(b':') => {
                self.state = State::Value;
                Ok(Event::Key(key))
            }
            _ => Err(Error::syntax(self.pos, "expected ':' after object key")),
        }
    }

    fn close(&mut self, container: Container) -> Result<Event> {
        match self.stack.pop() {
            Some(top) if top == container => {
                self.state = State::AfterValue;
                Ok(match container {
                    Container::Object => Event::EndObject,
                    Container::Array => Event::EndArray,
                })
            }
            _ => Err(Error::syntax(self.pos, "mismatched closing bracket")),
        }
    }

    fn advance(&mut self) -> Result<Option<Event>> {
        loop {
            self.skip_whitespace()?;
            match self.state {
                State::Finished => return Ok(None),
                State::Value => match self.read_byte()? {
                    Some(first) => return self.read_value(first).map(Some),
                    None if self.stack.is_empty() => {
                        // Empty input: not an error, just no events
                        self.state = State::Finished;
                        return Ok(None);
                    }
                    None => return Err(Error::syntax(self.pos, "unexpected end of input")),
                },
                State::FirstElement => match self.read_byte()? {
                    Some(b']') => return self.close(Container::Array).map(Some),
                    Some(first) => return self.read_value(first).map(Some),
                    None => return Err(Error::syntax(self.pos, "unexpected end of input")),
                },
                State::FirstKey => match self.read_byte()? {
                    Some(b'}') => return self.close(Container::Object).map(Some),
                    Some(b'"') => return self.read_key().map(Some),
                    _ => return Err(Error::syntax(self.pos, "expected object key or '}'")),
                },
                State::NextKey => match self.read_byte()? {
                    Some(b'"') => return self.read_key().map(Some),
                    _ => return Err(Error::syntax(self.pos, "expected object key")),
                },
                State::AfterValue => match self.stack.last() {
                    None => match self.read_byte()? {
                        None => {
                            self.state = State::Finished;
                            return Ok(None);
                        }
                        Some(_) => {
                            return Err(Error::syntax(self.pos, "unexpected trailing data"));
                        }
                    },
                    Some(Container::Object) => match self.read_byte()? {
                        Some(b',') => self.state = State::NextKey,
                        Some(b'}') => return self.close(Container::Object).map(Some),
                        _ => return Err(Error::syntax(self.pos, "expected ',' or '}'")),
                    },
                    Some(Container::Array) => match self.read_byte()? {
                        Some(b',') => self.state = State::Value,
                        Some(b']') => return self.close(Container::Array).map(Some),
                        _ => return Err(Error::syntax(self.pos, "expected ',' or ']'")),
                    },
                },
            }
        }
    }
}

impl<R: BufRead> Iterator for JsonEventReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<Event> {
        JsonEventReader::new(input.as_bytes()).map(|e| e.unwrap()).collect()
    }

    #[test]
    fn test_number_classification() {
        assert_eq!(events("1"), vec![Event::Scalar(Scalar::Integer(1))]);
        assert_eq!(events("-7"), vec![Event::Scalar(Scalar::Integer(-7))]);
        assert_eq!(events("1.5"), vec![Event::Scalar(Scalar::Double(1.5))]);
        assert_eq!(events("2e3"), vec![Event::Scalar(Scalar::Double(2000.0))]);
        // i64 overflow falls back to double
        assert!(matches!(
            events("123456789012345678901234567890")[..],
            [Event::Scalar(Scalar::Double(d))] if d > 1.2e29 && d < 1.3e29
        ));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(events("").is_empty());
        assert!(events("   \n\t").is_empty());
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut reader = JsonEventReader::new(&br#"{"a": "unclosed"#[..]);
        assert!(matches!(reader.next(), Some(Ok(Event::StartObject))));
        assert!(matches!(reader.next(), Some(Ok(Event::Key(_)))));
        assert!(matches!(reader.next(), Some(Err(Error::Syntax { .. }))));
        // Fused after an error
        assert!(reader.next().is_none());
    }
}
