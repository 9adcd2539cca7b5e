/*!
 Marker bytes and data structures used to read and write MessagePack data.

 Format reference: [MessagePack specification](https://github.com/msgpack/msgpack/blob/master/spec.md)
*/

use std::fmt::{Display, Formatter, Result};

/// Highest value of a positive fixint; the marker byte is the value itself
pub(crate) const POSITIVE_FIXINT_MAX: u8 = 0x7f;
/// Low nibble holds the entry count
pub(crate) const FIXMAP: u8 = 0x80;
/// Low nibble holds the element count
pub(crate) const FIXARRAY: u8 = 0x90;
/// Low five bits hold the byte length
pub(crate) const FIXSTR: u8 = 0xa0;
pub(crate) const NIL: u8 = 0xc0;
/// Reserved by the format, never valid
pub(crate) const NEVER_USED: u8 = 0xc1;
pub(crate) const FALSE: u8 = 0xc2;
pub(crate) const TRUE: u8 = 0xc3;
pub(crate) const BIN_8: u8 = 0xc4;
pub(crate) const BIN_16: u8 = 0xc5;
pub(crate) const BIN_32: u8 = 0xc6;
pub(crate) const EXT_8: u8 = 0xc7;
pub(crate) const EXT_16: u8 = 0xc8;
pub(crate) const EXT_32: u8 = 0xc9;
pub(crate) const FLOAT_32: u8 = 0xca;
pub(crate) const FLOAT_64: u8 = 0xcb;
pub(crate) const UINT_8: u8 = 0xcc;
pub(crate) const UINT_16: u8 = 0xcd;
pub(crate) const UINT_32: u8 = 0xce;
pub(crate) const UINT_64: u8 = 0xcf;
pub(crate) const INT_8: u8 = 0xd0;
pub(crate) const INT_16: u8 = 0xd1;
pub(crate) const INT_32: u8 = 0xd2;
pub(crate) const INT_64: u8 = 0xd3;
pub(crate) const FIXEXT_1: u8 = 0xd4;
pub(crate) const FIXEXT_2: u8 = 0xd5;
pub(crate) const FIXEXT_4: u8 = 0xd6;
pub(crate) const FIXEXT_8: u8 = 0xd7;
pub(crate) const FIXEXT_16: u8 = 0xd8;
pub(crate) const STR_8: u8 = 0xd9;
pub(crate) const STR_16: u8 = 0xda;
pub(crate) const STR_32: u8 = 0xdb;
pub(crate) const ARRAY_16: u8 = 0xdc;
pub(crate) const ARRAY_32: u8 = 0xdd;
pub(crate) const MAP_16: u8 = 0xde;
pub(crate) const MAP_32: u8 = 0xdf;
/// Bytes equal or greater in value than this are negative fixints
pub(crate) const NEGATIVE_FIXINT_MIN: u8 = 0xe0;

/// Largest count that fits in a fixmap or fixarray header
pub(crate) const FIX_CONTAINER_MAX: u32 = 0x0f;
/// Largest length that fits in a fixstr header
pub(crate) const FIXSTR_MAX: u32 = 0x1f;
/// Smallest value a negative fixint can hold
pub(crate) const NEGATIVE_FIXINT_LOWEST: i64 = -32;

/// The header of a single MessagePack value
///
/// For `str`, `bin`, and `ext` the length is in bytes and the payload follows the tag in the stream.
/// For arrays and maps the length is a count of elements; a map of `n` entries holds `2n` child values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tag {
    Nil,
    Bool(bool),
    /// A negative integer; non-negative values are always decoded as [`Tag::Uint`]
    Int(i64),
    Uint(u64),
    Float(f32),
    Double(f64),
    Str(u32),
    Bin(u32),
    Array(u32),
    Map(u32),
    /// Application-defined type and payload length
    Ext(i8, u32),
}

impl Tag {
    /// The kind of value this tag describes
    pub fn kind(&self) -> Kind {
        match self {
            Tag::Nil => Kind::Nil,
            Tag::Bool(_) => Kind::Bool,
            Tag::Int(_) => Kind::Int,
            Tag::Uint(_) => Kind::Uint,
            Tag::Float(_) => Kind::Float,
            Tag::Double(_) => Kind::Double,
            Tag::Str(_) => Kind::Str,
            Tag::Bin(_) => Kind::Bin,
            Tag::Array(_) => Kind::Array,
            Tag::Map(_) => Kind::Map,
            Tag::Ext(_, _) => Kind::Ext,
        }
    }
}

/// The kinds of values that can be stored in MessagePack, used when reporting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Double,
    Str,
    Bin,
    Array,
    Map,
    Ext,
}

impl Display for Kind {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Str => "str",
            Kind::Bin => "bin",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Ext => "ext",
        };
        write!(fmt, "{name}")
    }
}
