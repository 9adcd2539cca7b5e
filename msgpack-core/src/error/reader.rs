/*!
 Errors that can happen when decoding a MessagePack stream.
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
    str::Utf8Error,
};

use crate::msgpack::models::Kind;

/// Errors that can happen when decoding a MessagePack stream
#[derive(Debug)]
pub enum ReaderError {
    Io(IoError),
    /// The stream ended at the given offset while a value was still being read
    UnexpectedEof(u64),
    /// The marker byte and its offset
    InvalidMarker(u8, u64),
    InvalidUtf8(Utf8Error),
    /// Expected kind, found kind
    UnexpectedType(Kind, Kind),
    /// There are bytes left after the top-level value, starting at the given offset
    TrailingData(u64),
}

impl Display for ReaderError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            ReaderError::Io(why) => write!(fmt, "{why}"),
            ReaderError::UnexpectedEof(offset) => {
                write!(fmt, "unexpected end of data at offset {offset}")
            }
            ReaderError::InvalidMarker(marker, offset) => {
                write!(fmt, "invalid marker 0x{marker:02x} at offset {offset}")
            }
            ReaderError::InvalidUtf8(why) => write!(fmt, "string is not valid UTF-8: {why}"),
            ReaderError::UnexpectedType(expected, found) => {
                write!(fmt, "expected {expected}, found {found}")
            }
            ReaderError::TrailingData(offset) => {
                write!(fmt, "unexpected data after the top-level value at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ReaderError {}

impl From<IoError> for ReaderError {
    fn from(why: IoError) -> Self {
        ReaderError::Io(why)
    }
}
