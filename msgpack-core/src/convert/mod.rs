/*!
 Conversion between JSON text and MessagePack in both directions.
*/

use std::num::NonZeroUsize;

pub mod document;
pub mod json_writer;
pub mod lax;
pub mod to_json;
pub mod to_msgpack;

/// Deepest nesting of arrays and maps either direction will convert
pub const MAX_DEPTH: usize = 1024;

/// Settings that control how JSON is converted to MessagePack
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToMsgPackOptions {
    /// Allow comments and trailing commas in the JSON input
    pub lax: bool,
    /// Write numbers with a fraction or exponent as `float32` instead of `float64`
    pub use_float: bool,
    /// Convert strings with a `base64:` or `ext:` prefix to `bin` or `ext`
    pub base64_prefix: bool,
    /// Convert any value string of at least this many bytes that looks like base64 to `bin`
    pub base64_min_bytes: Option<NonZeroUsize>,
}

/// How `bin` and `ext` data are rendered as JSON strings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Base64Mode {
    /// `bin` and `ext` cannot be converted
    #[default]
    Disabled,
    /// `bin` becomes `base64:<data>` and `ext` becomes `ext:<type>:base64:<data>`
    Prefixed,
    /// `bin` becomes bare base64; `ext` keeps its prefix
    Bare,
}

/// Settings that control how MessagePack is converted to JSON
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToJsonOptions {
    /// Output human-readable pseudo-JSON instead of failing on data JSON cannot hold
    pub debug: bool,
    /// Indent the output
    pub pretty: bool,
    pub base64: Base64Mode,
}

impl ToJsonOptions {
    /// Debug viewing is always pretty-printed
    pub fn is_pretty(&self) -> bool {
        self.pretty || self.debug
    }
}
