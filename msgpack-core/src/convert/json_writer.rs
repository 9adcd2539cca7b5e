/*!
 A streaming JSON text generator.

 Values are written as they are produced, so arbitrarily large documents never need to be held in memory.
 The generator tracks where it is in the document to place separators and indentation, and to enforce that
 map keys are strings unless told otherwise.
*/

use std::io::Write;

use crate::error::generator::GeneratorError;

/// Indentation used for each level of pretty-printed output
const INDENT: &[u8] = b"    ";

/// Position of the generator inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just opened an array
    ArrayStart,
    /// At least one element has been written to the current array
    ArrayNext,
    /// Just opened a map; the next value is the first key
    MapStart,
    /// The next value is a key that follows a previous entry
    MapKey,
    /// The next value is the value for the key just written
    MapValue,
}

/// Writes JSON text to a byte sink, one token at a time
#[derive(Debug)]
pub struct JsonGenerator<W> {
    sink: W,
    pretty: bool,
    allow_non_string_keys: bool,
    /// Containers that are open, innermost last
    stack: Vec<State>,
    /// Whether the top-level value has been completely written
    complete: bool,
}

impl<W: Write> JsonGenerator<W> {
    pub fn new(sink: W, pretty: bool) -> Self {
        Self {
            sink,
            pretty,
            allow_non_string_keys: false,
            stack: vec![],
            complete: false,
        }
    }

    /// Allow any value in map key position, producing pseudo-JSON
    pub fn allow_non_string_keys(mut self, allow: bool) -> Self {
        self.allow_non_string_keys = allow;
        self
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), GeneratorError> {
        self.sink.write_all(bytes).map_err(GeneratorError::Io)
    }

    /// Start a new line at the current depth
    fn newline(&mut self) -> Result<(), GeneratorError> {
        if self.pretty {
            self.put(b"\n")?;
            for _ in 0..self.stack.len() {
                self.put(INDENT)?;
            }
        }
        Ok(())
    }

    /// Write whatever separator the current position needs before a value
    fn before_value(&mut self, is_string: bool) -> Result<(), GeneratorError> {
        match self.stack.last().copied() {
            None if self.complete => Err(GeneratorError::Complete),
            None => Ok(()),
            Some(State::ArrayStart) => self.newline(),
            Some(State::ArrayNext) => {
                self.put(b",")?;
                self.newline()
            }
            Some(state @ (State::MapStart | State::MapKey)) => {
                if !is_string && !self.allow_non_string_keys {
                    return Err(GeneratorError::KeysMustBeStrings);
                }
                if state == State::MapKey {
                    self.put(b",")?;
                }
                self.newline()
            }
            Some(State::MapValue) => {
                let separator: &[u8] = if self.pretty { b": " } else { b":" };
                self.put(separator)
            }
        }
    }

    /// Advance the current position past a value that was just written
    fn after_value(&mut self) -> Result<(), GeneratorError> {
        if let Some(state) = self.stack.last_mut() {
            *state = match *state {
                State::ArrayStart | State::ArrayNext => State::ArrayNext,
                State::MapStart | State::MapKey => State::MapValue,
                State::MapValue => State::MapKey,
            };
            return Ok(());
        }
        self.complete = true;
        if self.pretty {
            self.put(b"\n")?;
        }
        Ok(())
    }

    fn scalar(&mut self, text: &[u8], is_string: bool) -> Result<(), GeneratorError> {
        self.before_value(is_string)?;
        self.put(text)?;
        self.after_value()
    }

    pub fn null(&mut self) -> Result<(), GeneratorError> {
        self.scalar(b"null", false)
    }

    pub fn bool(&mut self, value: bool) -> Result<(), GeneratorError> {
        let text: &[u8] = if value { b"true" } else { b"false" };
        self.scalar(text, false)
    }

    pub fn integer(&mut self, value: i64) -> Result<(), GeneratorError> {
        self.scalar(value.to_string().as_bytes(), false)
    }

    pub fn unsigned(&mut self, value: u64) -> Result<(), GeneratorError> {
        self.scalar(value.to_string().as_bytes(), false)
    }

    /// Write a double in its shortest form that reads back as the same double
    pub fn double(&mut self, value: f64) -> Result<(), GeneratorError> {
        if !value.is_finite() {
            return Err(GeneratorError::InvalidNumber(value));
        }
        // Debug formatting always includes a `.` or an exponent, so the number stays a double
        self.scalar(format!("{value:?}").as_bytes(), false)
    }

    pub fn string(&mut self, value: &str) -> Result<(), GeneratorError> {
        self.scalar(json::stringify(value).as_bytes(), true)
    }

    /// Write text as-is where a string could go, for debug viewing annotations
    pub fn raw(&mut self, text: &str) -> Result<(), GeneratorError> {
        self.scalar(text.as_bytes(), true)
    }

    pub fn array_open(&mut self) -> Result<(), GeneratorError> {
        self.before_value(false)?;
        self.put(b"[")?;
        self.stack.push(State::ArrayStart);
        Ok(())
    }

    pub fn array_close(&mut self) -> Result<(), GeneratorError> {
        match self.stack.pop() {
            Some(State::ArrayStart) => self.put(b"]")?,
            Some(State::ArrayNext) => {
                self.newline()?;
                self.put(b"]")?;
            }
            _ => return Err(GeneratorError::Unbalanced),
        }
        self.after_value()
    }

    pub fn map_open(&mut self) -> Result<(), GeneratorError> {
        self.before_value(false)?;
        self.put(b"{")?;
        self.stack.push(State::MapStart);
        Ok(())
    }

    pub fn map_close(&mut self) -> Result<(), GeneratorError> {
        match self.stack.pop() {
            Some(State::MapStart) => self.put(b"}")?,
            Some(State::MapKey) => {
                self.newline()?;
                self.put(b"}")?;
            }
            _ => return Err(GeneratorError::Unbalanced),
        }
        self.after_value()
    }

    /// Flush buffered output and hand back the sink
    pub fn finish(mut self) -> Result<W, GeneratorError> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use crate::{convert::json_writer::JsonGenerator, error::generator::GeneratorError};

    fn output(generator: JsonGenerator<Vec<u8>>) -> String {
        String::from_utf8(generator.finish().unwrap()).unwrap()
    }

    #[test]
    fn can_write_compact() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.map_open().unwrap();
        generator.string("a").unwrap();
        generator.array_open().unwrap();
        generator.integer(-1).unwrap();
        generator.double(2.5).unwrap();
        generator.null().unwrap();
        generator.array_close().unwrap();
        generator.string("b").unwrap();
        generator.bool(true).unwrap();
        generator.map_close().unwrap();

        assert_eq!(output(generator), r#"{"a":[-1,2.5,null],"b":true}"#);
    }

    #[test]
    fn can_write_pretty() {
        let mut generator = JsonGenerator::new(vec![], true);
        generator.map_open().unwrap();
        generator.string("Hello").unwrap();
        generator.string("world!").unwrap();
        generator.string("list").unwrap();
        generator.array_open().unwrap();
        generator.unsigned(1).unwrap();
        generator.array_open().unwrap();
        generator.array_close().unwrap();
        generator.array_close().unwrap();
        generator.map_close().unwrap();

        let expected = "{\n    \"Hello\": \"world!\",\n    \"list\": [\n        1,\n        []\n    ]\n}\n";
        assert_eq!(output(generator), expected);
    }

    #[test]
    fn can_write_empty_containers() {
        let mut generator = JsonGenerator::new(vec![], true);
        generator.map_open().unwrap();
        generator.map_close().unwrap();

        assert_eq!(output(generator), "{}\n");
    }

    #[test]
    fn doubles_keep_their_type() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.array_open().unwrap();
        generator.double(1.0).unwrap();
        generator.double(0.1).unwrap();
        generator.double(1e300).unwrap();
        generator.array_close().unwrap();

        assert_eq!(output(generator), "[1.0,0.1,1e300]");
    }

    #[test]
    fn can_escape_strings() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.array_open().unwrap();
        generator.string("quote \" slash \\ line\n").unwrap();
        generator.array_close().unwrap();

        assert_eq!(output(generator), r#"["quote \" slash \\ line\n"]"#);
    }

    #[test]
    fn cant_write_non_string_key() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.map_open().unwrap();

        assert!(matches!(
            generator.integer(1),
            Err(GeneratorError::KeysMustBeStrings)
        ));
        assert!(matches!(
            generator.array_open(),
            Err(GeneratorError::KeysMustBeStrings)
        ));
    }

    #[test]
    fn can_write_non_string_key_when_allowed() {
        let mut generator = JsonGenerator::new(vec![], true).allow_non_string_keys(true);
        generator.map_open().unwrap();
        generator.integer(1).unwrap();
        generator.raw("<bin of size 2>").unwrap();
        generator.map_close().unwrap();

        assert_eq!(output(generator), "{\n    1: <bin of size 2>\n}\n");
    }

    #[test]
    fn cant_write_non_finite_double() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.array_open().unwrap();

        assert!(matches!(
            generator.double(f64::NAN),
            Err(GeneratorError::InvalidNumber(_))
        ));
    }

    #[test]
    fn cant_close_unopened_container() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.array_open().unwrap();

        assert!(matches!(
            generator.map_close(),
            Err(GeneratorError::Unbalanced)
        ));
    }

    #[test]
    fn cant_close_map_after_key() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.map_open().unwrap();
        generator.string("dangling").unwrap();

        assert!(matches!(
            generator.map_close(),
            Err(GeneratorError::Unbalanced)
        ));
    }

    #[test]
    fn cant_write_second_top_level_value() {
        let mut generator = JsonGenerator::new(vec![], false);
        generator.null().unwrap();

        assert!(matches!(generator.null(), Err(GeneratorError::Complete)));
    }
}
