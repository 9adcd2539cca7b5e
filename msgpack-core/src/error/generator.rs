/*!
 Errors that can happen when generating JSON text.
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
};

/// Errors that can happen when generating JSON text
#[derive(Debug)]
pub enum GeneratorError {
    Io(IoError),
    KeysMustBeStrings,
    /// `NaN` and the infinities have no JSON representation
    InvalidNumber(f64),
    /// A container was closed that was not open
    Unbalanced,
    /// A value was emitted after the top-level value was already complete
    Complete,
}

impl Display for GeneratorError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            GeneratorError::Io(why) => write!(fmt, "{why}"),
            GeneratorError::KeysMustBeStrings => write!(fmt, "map keys must be strings"),
            GeneratorError::InvalidNumber(value) => {
                write!(fmt, "{value} cannot be represented in JSON")
            }
            GeneratorError::Unbalanced => write!(fmt, "closed a container that was not open"),
            GeneratorError::Complete => write!(fmt, "the top-level value is already complete"),
        }
    }
}

impl std::error::Error for GeneratorError {}

impl From<IoError> for GeneratorError {
    fn from(why: IoError) -> Self {
        GeneratorError::Io(why)
    }
}
