/*!
 Base64 detection, decoding, and encoding for `bin` and `ext` payloads.
*/

use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    write::EncoderStringWriter,
    Engine,
};

use crate::error::conversion::ConversionError;

/// Standard alphabet that accepts input with or without trailing padding, and ignores stray bits in the last symbol
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Determine if a string only contains base64 characters
///
/// Line breaks are allowed, but spaces are not; otherwise most ordinary text would be detected as base64.
pub fn is_base64(text: &str) -> bool {
    text.bytes()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'/' | b'=' | b'\r' | b'\n'))
}

/// Decode base64 text, ignoring line breaks
pub fn decode(text: &str) -> Result<Vec<u8>, ConversionError> {
    let compact: Vec<u8> = text
        .bytes()
        .filter(|c| !matches!(c, b'\r' | b'\n'))
        .collect();
    LENIENT
        .decode(compact)
        .map_err(ConversionError::Base64Decode)
}

/// Encode bytes as padded standard base64 without line breaks
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Build an encoder that appends base64 to `prefix` as payload chunks are written to it
pub fn encoder(prefix: String) -> EncoderStringWriter<'static, GeneralPurpose, String> {
    EncoderStringWriter::from_consumer(prefix, &STANDARD)
}
