/*!
 A parsed JSON document that keeps what MessagePack needs to know about the text.

 Numbers remember whether they were written as integers, object members keep their input
 order including repeated keys, and nesting is bounded while parsing so deep input fails
 cleanly instead of exhausting the stack.
*/

use std::{
    cell::Cell,
    fmt::{Formatter, Result as FmtResult},
};

use serde::de::{DeserializeSeed, Deserializer, Error, MapAccess, SeqAccess, Visitor};

use crate::error::conversion::ConversionError;

/// A single JSON value and all of its children
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    /// A non-negative number written without a fraction or exponent
    Uint(u64),
    /// A negative number written without a fraction or exponent
    Int(i64),
    /// Any other number, including `-0` and integers too large for 64 bits
    Double(f64),
    Str(String),
    Array(Vec<Document>),
    /// Members in input order; a repeated key is kept as its own member
    Object(Vec<(String, Document)>),
}

/// Parse JSON text, failing with [`ConversionError::TooDeep`] for values nested deeper than `max_depth`
pub fn parse(text: &str, max_depth: usize) -> Result<Document, ConversionError> {
    let too_deep = Cell::new(false);
    let seed = DocumentSeed {
        depth: 0,
        max_depth,
        too_deep: &too_deep,
    };

    let mut deserializer = serde_json::Deserializer::from_str(text);
    // Depth is bounded by the seed instead
    deserializer.disable_recursion_limit();
    let result = seed
        .deserialize(&mut deserializer)
        .and_then(|document| deserializer.end().map(|()| document));

    match result {
        Ok(document) => Ok(document),
        Err(_) if too_deep.get() => Err(ConversionError::TooDeep),
        Err(why) => Err(ConversionError::Json(why)),
    }
}

/// Builds a [`Document`] for the value at `depth`
#[derive(Clone, Copy)]
struct DocumentSeed<'a> {
    depth: usize,
    max_depth: usize,
    /// Set when parsing stopped because the document is nested too deep
    too_deep: &'a Cell<bool>,
}

impl DocumentSeed<'_> {
    fn child(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

impl<'de> DeserializeSeed<'de> for DocumentSeed<'_> {
    type Value = Document;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        if self.depth > self.max_depth {
            self.too_deep.set(true);
            return Err(D::Error::custom(format!(
                "nested deeper than {} levels",
                self.max_depth
            )));
        }
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for DocumentSeed<'_> {
    type Value = Document;

    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("a JSON value")
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Document::Null)
    }

    fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Document::Bool(value))
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Document::Uint(value))
    }

    fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(u64::try_from(value).map_or(Document::Int(value), Document::Uint))
    }

    fn visit_f64<E: Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Document::Double(value))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Document::Str(value.to_owned()))
    }

    fn visit_string<E: Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Document::Str(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(self.child())? {
            items.push(item);
        }
        Ok(Document::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(self.child())?;
            members.push((key, value));
        }
        Ok(Document::Object(members))
    }
}
