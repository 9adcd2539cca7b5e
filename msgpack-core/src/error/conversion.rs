/*!
 Errors that can happen when converting between MessagePack and JSON.
*/

use std::{
    fmt::{Display, Formatter, Result},
    str::Utf8Error,
};

use crate::{
    convert::MAX_DEPTH,
    error::{generator::GeneratorError, reader::ReaderError, writer::WriterError},
    util::prefix::{BASE64_PREFIX, EXT_PREFIX},
};

/// Errors that can happen when converting between MessagePack and JSON
#[derive(Debug)]
pub enum ConversionError {
    Reader(ReaderError),
    Writer(WriterError),
    Generator(GeneratorError),
    /// The JSON input contains a NUL byte at the given offset
    NulByte(usize),
    InvalidUtf8(Utf8Error),
    Json(serde_json::Error),
    UnterminatedComment,
    /// A prefixed string whose payload is not base64; holds the prefix
    InvalidPrefixedBase64(&'static str),
    InvalidExtPrefix,
    ExtTypeOutOfBounds(i64),
    /// A number that overflows the named floating point type
    NumberTooBig(&'static str),
    Base64Decode(base64::DecodeError),
    TooDeep,
    TopLevelNotContainer,
    KeyNotString,
    BinUnencodable,
    ExtUnencodable(i8),
}

impl Display for ConversionError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            ConversionError::Reader(why) => write!(fmt, "error reading MessagePack: {why}"),
            ConversionError::Writer(why) => write!(fmt, "error writing MessagePack: {why}"),
            ConversionError::Generator(why) => write!(fmt, "error writing JSON: {why}"),
            ConversionError::NulByte(offset) => {
                write!(fmt, "JSON cannot contain null bytes (found one at offset {offset})")
            }
            ConversionError::InvalidUtf8(why) => write!(fmt, "JSON is not valid UTF-8: {why}"),
            ConversionError::Json(why) => write!(fmt, "error parsing JSON: {why}"),
            ConversionError::UnterminatedComment => {
                write!(fmt, "error parsing JSON: unterminated block comment")
            }
            ConversionError::InvalidPrefixedBase64(prefix) => {
                write!(fmt, "string prefixed with \"{prefix}\" contains invalid base64")
            }
            ConversionError::InvalidExtPrefix => write!(
                fmt,
                "string prefixed with \"{EXT_PREFIX}\" contains invalid prefix, expected \"{EXT_PREFIX}<type>:{BASE64_PREFIX}\""
            ),
            ConversionError::ExtTypeOutOfBounds(ext_type) => write!(
                fmt,
                "string prefixed with \"{EXT_PREFIX}\" has out-of-bounds ext type: {ext_type}"
            ),
            ConversionError::NumberTooBig(kind) => {
                write!(fmt, "number too big to be stored as a {kind}")
            }
            ConversionError::Base64Decode(why) => write!(fmt, "failed to decode base64: {why}"),
            ConversionError::TooDeep => {
                write!(fmt, "data is nested deeper than {MAX_DEPTH} levels")
            }
            ConversionError::TopLevelNotContainer => write!(
                fmt,
                "Top-level object must be a map or array. Try debug viewing mode (-d)"
            ),
            ConversionError::KeyNotString => {
                write!(fmt, "map key is not a string. Try debug viewing mode (-d)")
            }
            ConversionError::BinUnencodable => {
                write!(fmt, "bin unencodable in JSON. Try debug viewing mode (-d)")
            }
            ConversionError::ExtUnencodable(ext_type) => write!(
                fmt,
                "ext type {ext_type} unencodable in JSON. Try debug viewing mode (-d)"
            ),
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<ReaderError> for ConversionError {
    fn from(why: ReaderError) -> Self {
        ConversionError::Reader(why)
    }
}

impl From<WriterError> for ConversionError {
    fn from(why: WriterError) -> Self {
        ConversionError::Writer(why)
    }
}

impl From<GeneratorError> for ConversionError {
    fn from(why: GeneratorError) -> Self {
        ConversionError::Generator(why)
    }
}
