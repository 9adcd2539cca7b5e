#[cfg(test)]
mod reader_tests {
    use std::io::{Cursor, Read};

    use crate::{
        error::reader::ReaderError,
        msgpack::{
            models::{Kind, Tag},
            reader::{MsgPackReader, BUFFER_SIZE},
        },
    };

    /// A source that only hands out one byte per read
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.split_first() {
                Some((first, rest)) if !buf.is_empty() => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    fn tag_of(bytes: &[u8]) -> Tag {
        MsgPackReader::new(bytes).read_tag().unwrap()
    }

    #[test]
    fn can_read_fixed_values() {
        assert_eq!(tag_of(&[0xc0]), Tag::Nil);
        assert_eq!(tag_of(&[0xc2]), Tag::Bool(false));
        assert_eq!(tag_of(&[0xc3]), Tag::Bool(true));
        assert_eq!(tag_of(&[0x00]), Tag::Uint(0));
        assert_eq!(tag_of(&[0x7f]), Tag::Uint(127));
        assert_eq!(tag_of(&[0xff]), Tag::Int(-1));
        assert_eq!(tag_of(&[0xe0]), Tag::Int(-32));
    }

    #[test]
    fn can_read_sized_integers() {
        assert_eq!(tag_of(&[0xcc, 0xff]), Tag::Uint(255));
        assert_eq!(tag_of(&[0xcd, 0x01, 0x00]), Tag::Uint(256));
        assert_eq!(tag_of(&[0xce, 0x00, 0x01, 0x00, 0x00]), Tag::Uint(65536));
        assert_eq!(
            tag_of(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Tag::Uint(u64::MAX)
        );
        assert_eq!(tag_of(&[0xd0, 0x80]), Tag::Int(-128));
        assert_eq!(tag_of(&[0xd1, 0xff, 0x7f]), Tag::Int(-129));
        assert_eq!(
            tag_of(&[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
            Tag::Int(i64::MIN)
        );
    }

    #[test]
    fn signed_encoding_of_positive_reads_as_uint() {
        assert_eq!(tag_of(&[0xd0, 0x05]), Tag::Uint(5));
        assert_eq!(tag_of(&[0xd2, 0x00, 0x00, 0x01, 0x00]), Tag::Uint(256));
    }

    #[test]
    fn can_read_floats() {
        assert_eq!(tag_of(&[0xca, 0x3f, 0xc0, 0x00, 0x00]), Tag::Float(1.5));
        assert_eq!(
            tag_of(&[0xcb, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18]),
            Tag::Double(std::f64::consts::PI)
        );
    }

    #[test]
    fn can_read_container_headers() {
        assert_eq!(tag_of(&[0x80]), Tag::Map(0));
        assert_eq!(tag_of(&[0x8f]), Tag::Map(15));
        assert_eq!(tag_of(&[0x93]), Tag::Array(3));
        assert_eq!(tag_of(&[0xdc, 0x01, 0x00]), Tag::Array(256));
        assert_eq!(tag_of(&[0xdf, 0x00, 0x01, 0x00, 0x00]), Tag::Map(65536));
    }

    #[test]
    fn can_read_ext_headers() {
        assert_eq!(tag_of(&[0xd4, 0x05, 0x00]), Tag::Ext(5, 1));
        assert_eq!(tag_of(&[0xd8, 0xff]), Tag::Ext(-1, 16));
        assert_eq!(tag_of(&[0xc7, 0x03, 0x7f]), Tag::Ext(127, 3));
        assert_eq!(tag_of(&[0xc8, 0x01, 0x00, 0x80]), Tag::Ext(-128, 256));
    }

    #[test]
    fn can_read_string() {
        let bytes = [0xa5, b'h', b'e', b'l', b'l', b'o'];
        let mut reader = MsgPackReader::new(&bytes[..]);

        let len = reader.expect_str().unwrap();
        let result = reader.read_str(len).unwrap();

        assert_eq!(result, "hello");
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn can_read_across_buffer_refills() {
        let bytes = [
            0x92, 0xcd, 0x12, 0x34, 0xc4, 0x03, 0x01, 0x02, 0x03,
        ];
        let mut reader = MsgPackReader::new(Trickle(&bytes));

        assert_eq!(reader.read_tag().unwrap(), Tag::Array(2));
        assert_eq!(reader.read_tag().unwrap(), Tag::Uint(0x1234));
        assert_eq!(reader.read_tag().unwrap(), Tag::Bin(3));
        assert_eq!(reader.read_bytes(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(reader.offset(), bytes.len() as u64);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn can_stream_payload_larger_than_buffer() {
        let len = BUFFER_SIZE * 2 + 17;
        let mut bytes = vec![0xc6];
        bytes.extend_from_slice(&(len as u32).to_be_bytes());
        bytes.extend((0..len).map(|idx| (idx % 251) as u8));

        let mut reader = MsgPackReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_tag().unwrap(), Tag::Bin(len as u32));

        let mut chunks = 0;
        let mut total = 0;
        reader
            .read_into(len as u32, |chunk| {
                assert!(chunk.len() <= BUFFER_SIZE);
                chunks += 1;
                total += chunk.len();
                Ok(())
            })
            .unwrap();

        assert_eq!(total, len);
        assert!(chunks >= 3);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn cant_read_never_used_marker() {
        let bytes = [0x91, 0xc1];
        let mut reader = MsgPackReader::new(&bytes[..]);
        reader.read_tag().unwrap();

        let result = reader.read_tag();

        assert!(matches!(result, Err(ReaderError::InvalidMarker(0xc1, 1))));
    }

    #[test]
    fn cant_read_truncated_header() {
        let result = MsgPackReader::new(&[0xcd, 0x01][..]).read_tag();

        assert!(matches!(result, Err(ReaderError::UnexpectedEof(2))));
    }

    #[test]
    fn cant_read_truncated_payload() {
        let bytes = [0xa4, b'a', b'b'];
        let mut reader = MsgPackReader::new(&bytes[..]);
        let len = reader.expect_str().unwrap();

        let result = reader.read_bytes(len);

        assert!(matches!(result, Err(ReaderError::UnexpectedEof(3))));
    }

    #[test]
    fn cant_read_empty_stream() {
        let result = MsgPackReader::new(&[][..]).read_tag();

        assert!(matches!(result, Err(ReaderError::UnexpectedEof(0))));
    }

    #[test]
    fn cant_expect_str_from_int() {
        let result = MsgPackReader::new(&[0x01][..]).expect_str();

        assert!(matches!(
            result,
            Err(ReaderError::UnexpectedType(Kind::Str, Kind::Uint))
        ));
    }

    #[test]
    fn cant_read_invalid_utf8() {
        let bytes = [0xa2, 0xc3, 0x28];
        let mut reader = MsgPackReader::new(&bytes[..]);
        let len = reader.expect_str().unwrap();

        assert!(matches!(
            reader.read_str(len),
            Err(ReaderError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn finish_detects_trailing_data() {
        let bytes = [0xc0, 0xc0];
        let mut reader = MsgPackReader::new(&bytes[..]);
        reader.read_tag().unwrap();

        assert!(matches!(reader.finish(), Err(ReaderError::TrailingData(1))));
    }
}
