/*!
Errors that can happen during the application's runtime
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
    path::PathBuf,
};

use msgpack_core::error::conversion::ConversionError;

/// Errors that can happen during the application's runtime
#[derive(Debug)]
pub enum RuntimeError {
    InvalidOptions(String),
    OpenError(IoError, PathBuf),
    CreateError(IoError, PathBuf),
    DiskError(IoError),
    ConversionError(ConversionError),
}

impl Display for RuntimeError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            RuntimeError::InvalidOptions(why) => write!(fmt, "{why}"),
            RuntimeError::OpenError(why, path) => {
                write!(fmt, "could not open {path:?} for reading: {why}")
            }
            RuntimeError::CreateError(why, path) => {
                write!(fmt, "could not open {path:?} for writing: {why}")
            }
            RuntimeError::DiskError(why) => write!(fmt, "{why}"),
            RuntimeError::ConversionError(why) => write!(fmt, "{why}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConversionError> for RuntimeError {
    fn from(why: ConversionError) -> Self {
        RuntimeError::ConversionError(why)
    }
}
