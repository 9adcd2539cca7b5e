/*!
 Errors that can happen when encoding a MessagePack stream.
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
};

/// Errors that can happen when encoding a MessagePack stream
#[derive(Debug)]
pub enum WriterError {
    Io(IoError),
    /// A str, bin, ext, array, or map longer than MessagePack can describe
    TooLong(usize),
    /// A container was finished with the wrong number of elements
    UnbalancedContainer { expected: u64, written: u64 },
    /// A container was finished with the wrong kind, i.e. `finish_map()` for an array
    WrongContainer,
    /// The writer was finished while containers were still open
    UnclosedContainer(usize),
    NoOpenContainer,
}

impl Display for WriterError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            WriterError::Io(why) => write!(fmt, "{why}"),
            WriterError::TooLong(len) => {
                write!(fmt, "length {len} is too large to encode")
            }
            WriterError::UnbalancedContainer { expected, written } => write!(
                fmt,
                "container declared {expected} elements but {written} were written"
            ),
            WriterError::WrongContainer => {
                write!(fmt, "finished a container of a different type than was started")
            }
            WriterError::UnclosedContainer(count) => {
                write!(fmt, "{count} containers were not finished")
            }
            WriterError::NoOpenContainer => write!(fmt, "no container is open"),
        }
    }
}

impl std::error::Error for WriterError {}

impl From<IoError> for WriterError {
    fn from(why: IoError) -> Self {
        WriterError::Io(why)
    }
}
