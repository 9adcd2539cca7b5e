/*!
 Contains logic to pull MessagePack tags and payloads from a byte stream.

 The reader never loads the whole stream; it refills a fixed-size buffer from the
 underlying [`Read`] as tags and payloads are consumed.
*/

use std::io::{ErrorKind, Read};

use crate::{
    error::reader::ReaderError,
    msgpack::models::{
        Kind, Tag, ARRAY_16, ARRAY_32, BIN_16, BIN_32, BIN_8, EXT_16, EXT_32, EXT_8, FALSE,
        FIXARRAY, FIXEXT_1, FIXEXT_16, FIXEXT_2, FIXEXT_4, FIXEXT_8, FIXMAP, FIXSTR, FLOAT_32,
        FLOAT_64, INT_16, INT_32, INT_64, INT_8, MAP_16, MAP_32, NEGATIVE_FIXINT_MIN, NEVER_USED,
        NIL, POSITIVE_FIXINT_MAX, STR_16, STR_32, STR_8, TRUE, UINT_16, UINT_32, UINT_64, UINT_8,
    },
};

/// Size of the read buffer
pub const BUFFER_SIZE: usize = 65536;

/// Reads MessagePack data from a byte stream, one tag at a time
#[derive(Debug)]
pub struct MsgPackReader<R> {
    /// The stream we want to parse
    source: R,
    /// Bytes read from `source` that may not have been consumed yet
    buffer: Box<[u8]>,
    /// The index of the next unconsumed byte in `buffer`
    pos: usize,
    /// The number of valid bytes in `buffer`
    end: usize,
    /// How many bytes of the stream came before the start of `buffer`
    consumed: u64,
}

impl<R: Read> MsgPackReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: vec![0; BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            end: 0,
            consumed: 0,
        }
    }

    /// The offset in the stream of the next byte to be read
    pub fn offset(&self) -> u64 {
        self.consumed + self.pos as u64
    }

    /// Ensure there is at least one unconsumed byte in the buffer, returning `false` at the end of the stream
    fn fill(&mut self) -> Result<bool, ReaderError> {
        if self.pos < self.end {
            return Ok(true);
        }
        self.consumed += self.end as u64;
        self.pos = 0;
        self.end = 0;
        loop {
            match self.source.read(&mut self.buffer) {
                Ok(count) => {
                    self.end = count;
                    return Ok(count > 0);
                }
                Err(why) if why.kind() == ErrorKind::Interrupted => continue,
                Err(why) => return Err(ReaderError::Io(why)),
            }
        }
    }

    /// Read a single byte
    fn read_u8(&mut self) -> Result<u8, ReaderError> {
        if !self.fill()? {
            return Err(ReaderError::UnexpectedEof(self.offset()));
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Read exactly `N` bytes, which may span a buffer refill
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReaderError> {
        let mut out = [0; N];
        let mut filled = 0;
        while filled < N {
            if !self.fill()? {
                return Err(ReaderError::UnexpectedEof(self.offset()));
            }
            let count = (N - filled).min(self.end - self.pos);
            out[filled..filled + count].copy_from_slice(&self.buffer[self.pos..self.pos + count]);
            self.pos += count;
            filled += count;
        }
        Ok(out)
    }

    fn read_be_u16(&mut self) -> Result<u16, ReaderError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_be_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_ext_type(&mut self) -> Result<i8, ReaderError> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    /// Read the header of the next value in the stream
    pub fn read_tag(&mut self) -> Result<Tag, ReaderError> {
        let offset = self.offset();
        let marker = self.read_u8()?;
        let tag = match marker {
            0x00..=POSITIVE_FIXINT_MAX => Tag::Uint(u64::from(marker)),
            0x80..=0x8f => Tag::Map(u32::from(marker - FIXMAP)),
            0x90..=0x9f => Tag::Array(u32::from(marker - FIXARRAY)),
            0xa0..=0xbf => Tag::Str(u32::from(marker - FIXSTR)),
            NIL => Tag::Nil,
            NEVER_USED => return Err(ReaderError::InvalidMarker(marker, offset)),
            FALSE => Tag::Bool(false),
            TRUE => Tag::Bool(true),
            BIN_8 => Tag::Bin(u32::from(self.read_u8()?)),
            BIN_16 => Tag::Bin(u32::from(self.read_be_u16()?)),
            BIN_32 => Tag::Bin(self.read_be_u32()?),
            EXT_8 => {
                let len = u32::from(self.read_u8()?);
                Tag::Ext(self.read_ext_type()?, len)
            }
            EXT_16 => {
                let len = u32::from(self.read_be_u16()?);
                Tag::Ext(self.read_ext_type()?, len)
            }
            EXT_32 => {
                let len = self.read_be_u32()?;
                Tag::Ext(self.read_ext_type()?, len)
            }
            FLOAT_32 => Tag::Float(f32::from_be_bytes(self.read_array()?)),
            FLOAT_64 => Tag::Double(f64::from_be_bytes(self.read_array()?)),
            UINT_8 => Tag::Uint(u64::from(self.read_u8()?)),
            UINT_16 => Tag::Uint(u64::from(self.read_be_u16()?)),
            UINT_32 => Tag::Uint(u64::from(self.read_be_u32()?)),
            UINT_64 => Tag::Uint(u64::from_be_bytes(self.read_array()?)),
            INT_8 => signed(i64::from(i8::from_be_bytes(self.read_array()?))),
            INT_16 => signed(i64::from(i16::from_be_bytes(self.read_array()?))),
            INT_32 => signed(i64::from(i32::from_be_bytes(self.read_array()?))),
            INT_64 => signed(i64::from_be_bytes(self.read_array()?)),
            FIXEXT_1 => Tag::Ext(self.read_ext_type()?, 1),
            FIXEXT_2 => Tag::Ext(self.read_ext_type()?, 2),
            FIXEXT_4 => Tag::Ext(self.read_ext_type()?, 4),
            FIXEXT_8 => Tag::Ext(self.read_ext_type()?, 8),
            FIXEXT_16 => Tag::Ext(self.read_ext_type()?, 16),
            STR_8 => Tag::Str(u32::from(self.read_u8()?)),
            STR_16 => Tag::Str(u32::from(self.read_be_u16()?)),
            STR_32 => Tag::Str(self.read_be_u32()?),
            ARRAY_16 => Tag::Array(u32::from(self.read_be_u16()?)),
            ARRAY_32 => Tag::Array(self.read_be_u32()?),
            MAP_16 => Tag::Map(u32::from(self.read_be_u16()?)),
            MAP_32 => Tag::Map(self.read_be_u32()?),
            NEGATIVE_FIXINT_MIN..=0xff => Tag::Int(i64::from(marker as i8)),
        };
        Ok(tag)
    }

    /// Read a tag that must describe a `str`, returning its length
    pub fn expect_str(&mut self) -> Result<u32, ReaderError> {
        match self.read_tag()? {
            Tag::Str(len) => Ok(len),
            other => Err(ReaderError::UnexpectedType(Kind::Str, other.kind())),
        }
    }

    /// Stream `len` payload bytes to `sink` in chunks no larger than [`BUFFER_SIZE`]
    pub fn read_into<F>(&mut self, len: u32, mut sink: F) -> Result<(), ReaderError>
    where
        F: FnMut(&[u8]) -> std::io::Result<()>,
    {
        let mut remaining = len as usize;
        while remaining > 0 {
            if !self.fill()? {
                return Err(ReaderError::UnexpectedEof(self.offset()));
            }
            let count = remaining.min(self.end - self.pos);
            sink(&self.buffer[self.pos..self.pos + count])?;
            self.pos += count;
            remaining -= count;
        }
        Ok(())
    }

    /// Read `len` payload bytes
    ///
    /// The output only grows as data actually arrives, so a corrupt length cannot
    /// trigger a huge allocation on its own.
    pub fn read_bytes(&mut self, len: u32) -> Result<Vec<u8>, ReaderError> {
        let mut out = Vec::with_capacity((len as usize).min(BUFFER_SIZE));
        self.read_into(len, |chunk| {
            out.extend_from_slice(chunk);
            Ok(())
        })?;
        Ok(out)
    }

    /// Read `len` payload bytes as a String
    pub fn read_str(&mut self, len: u32) -> Result<String, ReaderError> {
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|why| ReaderError::InvalidUtf8(why.utf8_error()))
    }

    /// Discard `len` payload bytes
    pub fn skip_bytes(&mut self, len: u32) -> Result<(), ReaderError> {
        self.read_into(len, |_| Ok(()))
    }

    /// Ensure nothing follows the value that was read
    pub fn finish(&mut self) -> Result<(), ReaderError> {
        if self.fill()? {
            return Err(ReaderError::TrailingData(self.offset()));
        }
        Ok(())
    }
}

/// Signed encodings of non-negative numbers decode the same as unsigned ones
fn signed(value: i64) -> Tag {
    match u64::try_from(value) {
        Ok(unsigned) => Tag::Uint(unsigned),
        Err(_) => Tag::Int(value),
    }
}
