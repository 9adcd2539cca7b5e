/*!
 Normalizes relaxed JSON, which may contain comments and trailing commas, into strict JSON.

 Comments are replaced with spaces (line breaks are kept) and dropped commas become a space,
 so line and column numbers in later parse errors still match the input.
*/

use std::borrow::Cow;

use crate::error::conversion::ConversionError;

/// Strip `//` and `/* */` comments and trailing commas outside of strings
pub fn normalize(text: &str) -> Result<Cow<'_, str>, ConversionError> {
    let bytes = text.as_bytes();
    let mut out: Option<String> = None;
    // Start of the span of `text` not yet copied to `out`
    let mut copied = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'"' => idx = skip_string(bytes, idx),
            b'/' if matches!(bytes.get(idx + 1), Some(b'/' | b'*')) => {
                let end = comment_end(bytes, idx)?;
                let buffer = out.get_or_insert_with(|| String::with_capacity(text.len()));
                buffer.push_str(&text[copied..idx]);
                blank(buffer, &text[idx..end]);
                idx = end;
                copied = end;
            }
            b',' if closes_container(bytes, idx + 1)? => {
                let buffer = out.get_or_insert_with(|| String::with_capacity(text.len()));
                buffer.push_str(&text[copied..idx]);
                buffer.push(' ');
                idx += 1;
                copied = idx;
            }
            _ => idx += 1,
        }
    }

    match out {
        Some(mut buffer) => {
            buffer.push_str(&text[copied..]);
            Ok(Cow::Owned(buffer))
        }
        None => Ok(Cow::Borrowed(text)),
    }
}

/// Given the index of an opening quote, find the index just past the closing quote
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut idx = start + 1;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'"' => return idx + 1,
            _ => idx += 1,
        }
    }
    bytes.len()
}

/// Given the index of a comment's leading `/`, find the index just past the comment
///
/// Line comments end before their line break so the break is kept.
fn comment_end(bytes: &[u8], start: usize) -> Result<usize, ConversionError> {
    let body = start + 2;
    if bytes.get(start + 1) == Some(&b'/') {
        return Ok(bytes[body..]
            .iter()
            .position(|c| *c == b'\n')
            .map_or(bytes.len(), |pos| body + pos));
    }
    bytes[body..]
        .windows(2)
        .position(|pair| pair == b"*/")
        .map(|pos| body + pos + 2)
        .ok_or(ConversionError::UnterminatedComment)
}

/// Determine if the next significant character closes an array or object
fn closes_container(bytes: &[u8], start: usize) -> Result<bool, ConversionError> {
    let mut idx = start;
    while idx < bytes.len() {
        match bytes[idx] {
            b' ' | b'\t' | b'\r' | b'\n' => idx += 1,
            b'/' if matches!(bytes.get(idx + 1), Some(b'/' | b'*')) => {
                idx = comment_end(bytes, idx)?;
            }
            b']' | b'}' => return Ok(true),
            _ => return Ok(false),
        }
    }
    Ok(false)
}

/// Replace a comment with one space per character, keeping line breaks
fn blank(out: &mut String, comment: &str) {
    comment.chars().for_each(|c| match c {
        '\n' | '\r' => out.push(c),
        _ => out.push(' '),
    });
}
