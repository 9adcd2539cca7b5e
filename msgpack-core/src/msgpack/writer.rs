/*!
 Contains logic to encode values as MessagePack, always choosing the smallest encoding.
*/

use std::io::Write;

use crate::{
    error::writer::WriterError,
    msgpack::models::{
        ARRAY_16, ARRAY_32, BIN_16, BIN_32, BIN_8, EXT_16, EXT_32, EXT_8, FALSE, FIXARRAY,
        FIXEXT_1, FIXEXT_16, FIXEXT_2, FIXEXT_4, FIXEXT_8, FIXMAP, FIXSTR, FIXSTR_MAX,
        FIX_CONTAINER_MAX, FLOAT_32, FLOAT_64, INT_16, INT_32, INT_64, INT_8, MAP_16, MAP_32,
        NEGATIVE_FIXINT_LOWEST, NIL, POSITIVE_FIXINT_MAX, STR_16, STR_32, STR_8, TRUE, UINT_16,
        UINT_32, UINT_64, UINT_8,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Array,
    Map,
}

/// An array or map that has been started but not finished
#[derive(Debug)]
struct Container {
    kind: ContainerKind,
    /// Number of child values declared in the header
    expected: u64,
    /// Number of child values written so far
    written: u64,
}

/// Writes MessagePack data to a byte sink
#[derive(Debug)]
pub struct MsgPackWriter<W> {
    sink: W,
    /// Containers that have been started but not finished, innermost last
    open: Vec<Container>,
}

impl<W: Write> MsgPackWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, open: vec![] }
    }

    /// Count a value against the innermost open container
    fn element(&mut self) {
        if let Some(container) = self.open.last_mut() {
            container.written += 1;
        }
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.sink.write_all(bytes).map_err(WriterError::Io)
    }

    fn put_marker_u8(&mut self, marker: u8, value: u8) -> Result<(), WriterError> {
        self.put(&[marker, value])
    }

    fn put_marker_u16(&mut self, marker: u8, value: u16) -> Result<(), WriterError> {
        let [a, b] = value.to_be_bytes();
        self.put(&[marker, a, b])
    }

    fn put_marker_u32(&mut self, marker: u8, value: u32) -> Result<(), WriterError> {
        let [a, b, c, d] = value.to_be_bytes();
        self.put(&[marker, a, b, c, d])
    }

    /// Write the header for a `str`, `bin`, array, or map whose length needs 8, 16, or 32 bits
    fn put_length(&mut self, markers: [u8; 3], len: usize) -> Result<(), WriterError> {
        let [marker_8, marker_16, marker_32] = markers;
        if let Ok(len) = u8::try_from(len) {
            if marker_8 != 0 {
                return self.put_marker_u8(marker_8, len);
            }
        }
        if let Ok(len) = u16::try_from(len) {
            return self.put_marker_u16(marker_16, len);
        }
        let len = u32::try_from(len).map_err(|_| WriterError::TooLong(len))?;
        self.put_marker_u32(marker_32, len)
    }

    pub fn write_nil(&mut self) -> Result<(), WriterError> {
        self.element();
        self.put(&[NIL])
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), WriterError> {
        self.element();
        self.put(&[if value { TRUE } else { FALSE }])
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), WriterError> {
        self.element();
        if value <= u64::from(POSITIVE_FIXINT_MAX) {
            return self.put(&[value as u8]);
        }
        if let Ok(value) = u8::try_from(value) {
            return self.put_marker_u8(UINT_8, value);
        }
        if let Ok(value) = u16::try_from(value) {
            return self.put_marker_u16(UINT_16, value);
        }
        if let Ok(value) = u32::try_from(value) {
            return self.put_marker_u32(UINT_32, value);
        }
        let mut bytes = [UINT_64; 9];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.put(&bytes)
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), WriterError> {
        if let Ok(unsigned) = u64::try_from(value) {
            return self.write_u64(unsigned);
        }
        self.element();
        if value >= NEGATIVE_FIXINT_LOWEST {
            return self.put(&(value as i8).to_be_bytes());
        }
        if let Ok(value) = i8::try_from(value) {
            return self.put(&[INT_8, value.to_be_bytes()[0]]);
        }
        if let Ok(value) = i16::try_from(value) {
            let [a, b] = value.to_be_bytes();
            return self.put(&[INT_16, a, b]);
        }
        if let Ok(value) = i32::try_from(value) {
            let [a, b, c, d] = value.to_be_bytes();
            return self.put(&[INT_32, a, b, c, d]);
        }
        let mut bytes = [INT_64; 9];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.put(&bytes)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), WriterError> {
        self.element();
        let [a, b, c, d] = value.to_be_bytes();
        self.put(&[FLOAT_32, a, b, c, d])
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), WriterError> {
        self.element();
        let mut bytes = [FLOAT_64; 9];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.put(&bytes)
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), WriterError> {
        self.element();
        let len = value.len();
        if len <= FIXSTR_MAX as usize {
            self.put(&[FIXSTR | len as u8])?;
        } else {
            self.put_length([STR_8, STR_16, STR_32], len)?;
        }
        self.put(value.as_bytes())
    }

    pub fn write_bin(&mut self, value: &[u8]) -> Result<(), WriterError> {
        self.element();
        self.put_length([BIN_8, BIN_16, BIN_32], value.len())?;
        self.put(value)
    }

    pub fn write_ext(&mut self, ext_type: i8, value: &[u8]) -> Result<(), WriterError> {
        self.element();
        let ext_type = ext_type.to_be_bytes()[0];
        let fixed = match value.len() {
            1 => Some(FIXEXT_1),
            2 => Some(FIXEXT_2),
            4 => Some(FIXEXT_4),
            8 => Some(FIXEXT_8),
            16 => Some(FIXEXT_16),
            _ => None,
        };
        match fixed {
            Some(marker) => self.put(&[marker, ext_type])?,
            None => {
                self.put_length([EXT_8, EXT_16, EXT_32], value.len())?;
                self.put(&[ext_type])?;
            }
        }
        self.put(value)
    }

    /// Start an array of `len` elements; exactly `len` values must be written before [`Self::finish_array`]
    pub fn start_array(&mut self, len: usize) -> Result<(), WriterError> {
        self.element();
        if len <= FIX_CONTAINER_MAX as usize {
            self.put(&[FIXARRAY | len as u8])?;
        } else {
            // Arrays have no 8-bit length form
            self.put_length([0, ARRAY_16, ARRAY_32], len)?;
        }
        self.open.push(Container {
            kind: ContainerKind::Array,
            expected: len as u64,
            written: 0,
        });
        Ok(())
    }

    /// Start a map of `len` entries; exactly `len` keys and `len` values must be written before [`Self::finish_map`]
    pub fn start_map(&mut self, len: usize) -> Result<(), WriterError> {
        self.element();
        if len <= FIX_CONTAINER_MAX as usize {
            self.put(&[FIXMAP | len as u8])?;
        } else {
            self.put_length([0, MAP_16, MAP_32], len)?;
        }
        self.open.push(Container {
            kind: ContainerKind::Map,
            expected: len as u64 * 2,
            written: 0,
        });
        Ok(())
    }

    fn finish_container(&mut self, kind: ContainerKind) -> Result<(), WriterError> {
        let container = self.open.pop().ok_or(WriterError::NoOpenContainer)?;
        if container.kind != kind {
            return Err(WriterError::WrongContainer);
        }
        if container.expected != container.written {
            return Err(WriterError::UnbalancedContainer {
                expected: container.expected,
                written: container.written,
            });
        }
        Ok(())
    }

    pub fn finish_array(&mut self) -> Result<(), WriterError> {
        self.finish_container(ContainerKind::Array)
    }

    pub fn finish_map(&mut self) -> Result<(), WriterError> {
        self.finish_container(ContainerKind::Map)
    }

    /// Ensure every container was finished, flush, and hand back the sink
    pub fn finish(mut self) -> Result<W, WriterError> {
        if !self.open.is_empty() {
            return Err(WriterError::UnclosedContainer(self.open.len()));
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}
