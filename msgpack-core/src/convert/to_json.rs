/*!
 Converts a single MessagePack value to JSON text, streaming from reader to generator.
*/

use std::io::{Read, Write};

use log::debug;

use crate::{
    convert::{json_writer::JsonGenerator, Base64Mode, ToJsonOptions, MAX_DEPTH},
    error::{conversion::ConversionError, reader::ReaderError},
    msgpack::{models::Tag, reader::MsgPackReader},
    util::{
        base64::encoder,
        prefix::{bin_header, ext_header},
    },
};

/// Walks MessagePack tags and emits the equivalent JSON
pub struct MsgPackToJson<'a, R, W> {
    reader: &'a mut MsgPackReader<R>,
    generator: &'a mut JsonGenerator<W>,
    options: &'a ToJsonOptions,
}

impl<'a, R: Read, W: Write> MsgPackToJson<'a, R, W> {
    pub fn new(
        reader: &'a mut MsgPackReader<R>,
        generator: &'a mut JsonGenerator<W>,
        options: &'a ToJsonOptions,
    ) -> Self {
        Self {
            reader,
            generator,
            options,
        }
    }

    /// Read the next value, and all of its children, and write it as JSON
    pub fn element(&mut self, depth: usize) -> Result<(), ConversionError> {
        if depth > MAX_DEPTH {
            return Err(ConversionError::TooDeep);
        }
        let tag = self.reader.read_tag()?;

        if !self.options.debug && depth == 0 && !matches!(tag, Tag::Map(_) | Tag::Array(_)) {
            return Err(ConversionError::TopLevelNotContainer);
        }

        match tag {
            Tag::Nil => self.generator.null()?,
            Tag::Bool(value) => self.generator.bool(value)?,
            Tag::Int(value) => self.generator.integer(value)?,
            Tag::Uint(value) => match i64::try_from(value) {
                Ok(_) => self.generator.unsigned(value)?,
                // Kept as text so readers limited to signed 64-bit integers don't lose it
                Err(_) => self.generator.string(&value.to_string())?,
            },
            Tag::Float(value) => self.double(f64::from(value))?,
            Tag::Double(value) => self.double(value)?,
            Tag::Str(len) => self.string(len)?,
            Tag::Bin(len) => self.bin(len)?,
            Tag::Ext(ext_type, len) => self.ext(ext_type, len)?,
            Tag::Array(len) => {
                self.generator.array_open()?;
                for _ in 0..len {
                    self.element(depth + 1)?;
                }
                self.generator.array_close()?;
            }
            Tag::Map(len) => {
                self.generator.map_open()?;
                for _ in 0..len {
                    self.key(depth + 1)?;
                    self.element(depth + 1)?;
                }
                self.generator.map_close()?;
            }
        }
        Ok(())
    }

    /// Map keys must be strings unless we are only viewing the data
    fn key(&mut self, depth: usize) -> Result<(), ConversionError> {
        if self.options.debug {
            return self.element(depth);
        }
        let len = match self.reader.expect_str() {
            Ok(len) => len,
            Err(ReaderError::UnexpectedType(_, found)) => {
                debug!("Found {found} map key at offset {}", self.reader.offset());
                return Err(ConversionError::KeyNotString);
            }
            Err(why) => return Err(why.into()),
        };
        self.string(len)
    }

    fn double(&mut self, value: f64) -> Result<(), ConversionError> {
        if self.options.debug && !value.is_finite() {
            let text = if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            return Ok(self.generator.raw(text)?);
        }
        Ok(self.generator.double(value)?)
    }

    fn string(&mut self, len: u32) -> Result<(), ConversionError> {
        if !self.options.debug {
            let text = self.reader.read_str(len)?;
            return Ok(self.generator.string(&text)?);
        }
        match String::from_utf8(self.reader.read_bytes(len)?) {
            Ok(text) => self.generator.string(&text)?,
            Err(_) => self
                .generator
                .raw(&format!("<invalid UTF-8 str of size {len}>"))?,
        }
        Ok(())
    }

    /// Stream a payload through the base64 encoder, appended to `header`
    fn base64(&mut self, header: String, len: u32) -> Result<(), ConversionError> {
        let mut encoder = encoder(header);
        self.reader
            .read_into(len, |chunk| encoder.write_all(chunk))?;
        Ok(self.generator.string(&encoder.into_inner())?)
    }

    fn bin(&mut self, len: u32) -> Result<(), ConversionError> {
        match self.options.base64 {
            Base64Mode::Prefixed => self.base64(bin_header(true).to_string(), len),
            Base64Mode::Bare => self.base64(bin_header(false).to_string(), len),
            Base64Mode::Disabled if self.options.debug => {
                self.reader.skip_bytes(len)?;
                Ok(self.generator.raw(&format!("<bin of size {len}>"))?)
            }
            Base64Mode::Disabled => Err(ConversionError::BinUnencodable),
        }
    }

    fn ext(&mut self, ext_type: i8, len: u32) -> Result<(), ConversionError> {
        match self.options.base64 {
            Base64Mode::Prefixed | Base64Mode::Bare => self.base64(ext_header(ext_type), len),
            Base64Mode::Disabled if self.options.debug => {
                self.reader.skip_bytes(len)?;
                Ok(self
                    .generator
                    .raw(&format!("<ext of type {ext_type} size {len}>"))?)
            }
            Base64Mode::Disabled => Err(ConversionError::ExtUnencodable(ext_type)),
        }
    }
}

/// Read a single MessagePack value from `reader` and write it as JSON to `generator`
///
/// Fails if anything follows the value.
pub fn msgpack_to_json<R: Read, W: Write>(
    reader: &mut MsgPackReader<R>,
    generator: &mut JsonGenerator<W>,
    options: &ToJsonOptions,
) -> Result<(), ConversionError> {
    MsgPackToJson::new(reader, generator, options).element(0)?;
    reader.finish()?;
    debug!("Converted {} bytes of MessagePack", reader.offset());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        convert::{
            json_writer::JsonGenerator, to_json::msgpack_to_json, Base64Mode, ToJsonOptions,
        },
        error::{conversion::ConversionError, reader::ReaderError},
        msgpack::reader::MsgPackReader,
    };

    fn convert(input: &[u8], options: &ToJsonOptions) -> Result<String, ConversionError> {
        let mut reader = MsgPackReader::new(input);
        let mut generator = JsonGenerator::new(vec![], options.is_pretty())
            .allow_non_string_keys(options.debug);
        msgpack_to_json(&mut reader, &mut generator, options)?;
        Ok(String::from_utf8(generator.finish()?).unwrap())
    }

    fn compact(input: &[u8]) -> Result<String, ConversionError> {
        convert(input, &ToJsonOptions::default())
    }

    fn debug(input: &[u8]) -> String {
        let options = ToJsonOptions {
            debug: true,
            ..Default::default()
        };
        convert(input, &options).unwrap()
    }

    #[test]
    fn can_convert_hello_world() {
        let input = [&[0x81, 0xa5][..], b"Hello", &[0xa6], b"world!"].concat();

        assert_eq!(compact(&input).unwrap(), r#"{"Hello":"world!"}"#);
        assert_eq!(debug(&input), "{\n    \"Hello\": \"world!\"\n}\n");
    }

    #[test]
    fn can_convert_numbers() {
        let mut input = vec![0x95, 0x01, 0xff, 0xca];
        input.extend_from_slice(&0.5f32.to_be_bytes());
        input.push(0xcb);
        input.extend_from_slice(&2.0f64.to_be_bytes());
        input.extend_from_slice(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);

        assert_eq!(
            compact(&input).unwrap(),
            r#"[1,-1,0.5,2.0,"18446744073709551615"]"#
        );
    }

    #[test]
    fn cant_convert_scalar_top_level() {
        assert!(matches!(
            compact(&[0x01]),
            Err(ConversionError::TopLevelNotContainer)
        ));
        assert_eq!(debug(&[0x01]), "1\n");
    }

    #[test]
    fn cant_convert_non_string_key() {
        let input = [0x81, 0x01, 0xc0];

        assert!(matches!(
            compact(&input),
            Err(ConversionError::KeyNotString)
        ));
        assert_eq!(debug(&input), "{\n    1: null\n}\n");
    }

    #[test]
    fn can_view_bin_and_ext_in_debug() {
        let input = [0x92, 0xc4, 0x02, 0x01, 0x02, 0xd4, 0x07, 0x00];

        assert!(matches!(
            compact(&input),
            Err(ConversionError::BinUnencodable)
        ));
        assert_eq!(
            debug(&input),
            "[\n    <bin of size 2>,\n    <ext of type 7 size 1>\n]\n"
        );
    }

    #[test]
    fn cant_convert_ext_without_base64() {
        assert!(matches!(
            compact(&[0x91, 0xd4, 0x07, 0x00]),
            Err(ConversionError::ExtUnencodable(7))
        ));
    }

    #[test]
    fn can_convert_bin_to_base64() {
        let input = [0x92, 0xc4, 0x02, b'H', b'i', 0xd5, 0xfe, 0x01, 0x02];
        let prefixed = ToJsonOptions {
            base64: Base64Mode::Prefixed,
            ..Default::default()
        };
        let bare = ToJsonOptions {
            base64: Base64Mode::Bare,
            ..Default::default()
        };

        assert_eq!(
            convert(&input, &prefixed).unwrap(),
            r#"["base64:SGk=","ext:-2:base64:AQI="]"#
        );
        assert_eq!(
            convert(&input, &bare).unwrap(),
            r#"["SGk=","ext:-2:base64:AQI="]"#
        );
    }

    #[test]
    fn can_view_non_finite_in_debug() {
        let mut input = vec![0x91, 0xcb];
        input.extend_from_slice(&f64::INFINITY.to_be_bytes());

        assert!(matches!(
            compact(&input),
            Err(ConversionError::Generator(_))
        ));
        assert_eq!(debug(&input), "[\n    Infinity\n]\n");
    }

    #[test]
    fn can_view_invalid_utf8_in_debug() {
        let input = [0x91, 0xa2, 0xc3, 0x28];

        assert!(matches!(
            compact(&input),
            Err(ConversionError::Reader(ReaderError::InvalidUtf8(_)))
        ));
        assert_eq!(debug(&input), "[\n    <invalid UTF-8 str of size 2>\n]\n");
    }

    #[test]
    fn cant_convert_truncated_input() {
        assert!(matches!(
            compact(&[0x92, 0x01]),
            Err(ConversionError::Reader(ReaderError::UnexpectedEof(2)))
        ));
    }

    #[test]
    fn cant_convert_trailing_data() {
        assert!(matches!(
            compact(&[0x90, 0x90]),
            Err(ConversionError::Reader(ReaderError::TrailingData(1)))
        ));
    }

    #[test]
    fn cant_convert_excessive_nesting() {
        let input = vec![0x91; 2000];
        // Recursion this deep needs more than the default test thread stack
        let result = std::thread::Builder::new()
            .stack_size(256 << 20)
            .spawn(move || compact(&input))
            .unwrap()
            .join()
            .unwrap();

        assert!(matches!(result, Err(ConversionError::TooDeep)));
    }
}
