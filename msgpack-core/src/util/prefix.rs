/*!
 Parsing and formatting of the string prefixes used to carry `bin` and `ext` data through JSON.

 - `base64:<data>` holds a `bin` (`msgpack2json -B` drops the prefix)
 - `ext:<type>:base64:<data>` holds an `ext` of the given type
*/

use crate::{error::conversion::ConversionError, util::base64::is_base64};

/// Marks a string as base64-encoded `bin` data
pub const BASE64_PREFIX: &str = "base64:";
/// Marks a string as an `ext` with its type and base64-encoded payload
pub const EXT_PREFIX: &str = "ext:";

/// A string carrying binary data, with the base64 payload still encoded
#[derive(Debug, PartialEq, Eq)]
pub enum Prefixed<'a> {
    Bin(&'a str),
    Ext(i8, &'a str),
}

/// Determine if a string carries `bin` or `ext` data
///
/// Strings with neither prefix yield `None`. A string that starts with a prefix but is
/// otherwise malformed is an error rather than being passed through as text.
pub fn parse_prefixed(text: &str) -> Result<Option<Prefixed<'_>>, ConversionError> {
    if let Some(data) = text.strip_prefix(BASE64_PREFIX) {
        if !is_base64(data) {
            return Err(ConversionError::InvalidPrefixedBase64(BASE64_PREFIX));
        }
        return Ok(Some(Prefixed::Bin(data)));
    }

    if let Some(rest) = text.strip_prefix(EXT_PREFIX) {
        let (ext_type, remainder) = rest
            .split_once(':')
            .ok_or(ConversionError::InvalidExtPrefix)?;
        let ext_type: i64 = ext_type
            .parse()
            .map_err(|_| ConversionError::InvalidExtPrefix)?;
        let data = remainder
            .strip_prefix(BASE64_PREFIX)
            .ok_or(ConversionError::InvalidExtPrefix)?;
        let ext_type =
            i8::try_from(ext_type).map_err(|_| ConversionError::ExtTypeOutOfBounds(ext_type))?;
        if !is_base64(data) {
            return Err(ConversionError::InvalidPrefixedBase64(EXT_PREFIX));
        }
        return Ok(Some(Prefixed::Ext(ext_type, data)));
    }

    Ok(None)
}

/// The text that precedes the base64 payload of a `bin`
pub fn bin_header(prefixed: bool) -> &'static str {
    if prefixed {
        BASE64_PREFIX
    } else {
        ""
    }
}

/// The text that precedes the base64 payload of an `ext`
pub fn ext_header(ext_type: i8) -> String {
    format!("{EXT_PREFIX}{ext_type}:{BASE64_PREFIX}")
}
