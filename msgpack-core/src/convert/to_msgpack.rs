/*!
 Converts a JSON document to a single MessagePack value.
*/

use std::io::Write;

use log::debug;

use crate::{
    convert::{
        document::{parse, Document},
        lax::normalize,
        ToMsgPackOptions, MAX_DEPTH,
    },
    error::conversion::ConversionError,
    msgpack::writer::MsgPackWriter,
    util::{
        base64::{decode, is_base64},
        prefix::{parse_prefixed, Prefixed},
    },
};

/// Walks a parsed JSON document and writes it as MessagePack
pub struct JsonToMsgPack<'a, W> {
    writer: &'a mut MsgPackWriter<W>,
    options: &'a ToMsgPackOptions,
}

impl<'a, W: Write> JsonToMsgPack<'a, W> {
    pub fn new(writer: &'a mut MsgPackWriter<W>, options: &'a ToMsgPackOptions) -> Self {
        Self { writer, options }
    }

    /// Write a value and all of its children
    pub fn write_value(&mut self, value: &Document) -> Result<(), ConversionError> {
        match value {
            Document::Null => self.writer.write_nil()?,
            Document::Bool(value) => self.writer.write_bool(*value)?,
            Document::Uint(value) => self.writer.write_u64(*value)?,
            Document::Int(value) => self.writer.write_i64(*value)?,
            Document::Double(value) => self.write_double(*value)?,
            Document::Str(string) => self.write_string(string, true)?,
            Document::Array(items) => {
                self.writer.start_array(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
                self.writer.finish_array()?;
            }
            Document::Object(members) => {
                self.writer.start_map(members.len())?;
                for (key, value) in members {
                    self.write_string(key, false)?;
                    self.write_value(value)?;
                }
                self.writer.finish_map()?;
            }
        }
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<(), ConversionError> {
        if !value.is_finite() {
            return Err(ConversionError::NumberTooBig("double"));
        }
        if self.options.use_float {
            let narrowed = value as f32;
            if !narrowed.is_finite() {
                return Err(ConversionError::NumberTooBig("float"));
            }
            self.writer.write_f32(narrowed)?;
        } else {
            self.writer.write_f64(value)?;
        }
        Ok(())
    }

    /// Write a string, which may carry `bin` or `ext` data depending on the options
    ///
    /// Map keys are never checked for undecorated base64.
    fn write_string(&mut self, text: &str, allow_detection: bool) -> Result<(), ConversionError> {
        if self.options.base64_prefix {
            match parse_prefixed(text)? {
                Some(Prefixed::Bin(data)) => {
                    return Ok(self.writer.write_bin(&decode(data)?)?);
                }
                Some(Prefixed::Ext(ext_type, data)) => {
                    return Ok(self.writer.write_ext(ext_type, &decode(data)?)?);
                }
                None => {}
            }
        }

        if let Some(min_bytes) = self.options.base64_min_bytes {
            if allow_detection && text.len() >= min_bytes.get() && is_base64(text) {
                // Detection is a heuristic, so text that only looks like base64 stays a string
                match decode(text) {
                    Ok(bytes) => return Ok(self.writer.write_bin(&bytes)?),
                    Err(why) => debug!("Keeping {} byte string as str: {why}", text.len()),
                }
            }
        }

        Ok(self.writer.write_str(text)?)
    }
}

/// Parse JSON from `input` and write it to `writer` as a single MessagePack value
pub fn json_to_msgpack<W: Write>(
    input: &[u8],
    writer: &mut MsgPackWriter<W>,
    options: &ToMsgPackOptions,
) -> Result<(), ConversionError> {
    if let Some(offset) = input.iter().position(|byte| *byte == 0) {
        return Err(ConversionError::NulByte(offset));
    }
    let text = std::str::from_utf8(input).map_err(ConversionError::InvalidUtf8)?;

    let document = if options.lax {
        parse(&normalize(text)?, MAX_DEPTH)?
    } else {
        parse(text, MAX_DEPTH)?
    };
    debug!("Parsed {} bytes of JSON", input.len());

    JsonToMsgPack::new(writer, options).write_value(&document)
}
