//! Go struct tag parsing
//!
//! A tag is a sequence of space-separated `key:"value"` pairs. The value is a
//! Go quoted string whose comma-separated parts are the tag name followed by
//! options: `json:"email,omitempty"` -> key `json`, name `email`, options `[omitempty]`.

use indexmap::IndexMap;
use std::borrow::Cow;
use structspec_foundation::TagValue;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagSyntaxError {
    #[error("bad syntax for struct tag key")]
    Key,

    #[error("bad syntax for struct tag pair")]
    Pair,

    #[error("bad syntax for struct tag value")]
    Value,

    #[error("bad struct tag literal {0}")]
    Literal(String),
}

/// Parse a tag as written in source, backticks or double quotes included
pub fn parse_tag_literal(literal: &str) -> Result<IndexMap<String, TagValue>, TagSyntaxError> {
    let tag = if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        // Carriage returns are discarded from raw string literals
        raw.replace('\r', "")
    } else if literal.starts_with('"') {
        let bytes =
            unquote_bytes(literal).ok_or_else(|| TagSyntaxError::Literal(literal.to_string()))?;
        lossy_text(&bytes, literal).into_owned()
    } else {
        return Err(TagSyntaxError::Literal(literal.to_string()));
    };

    parse_tags(&tag)
}

/// Parse the content of a tag.
///
/// A key repeated within one tag keeps its last value.
pub fn parse_tags(tag: &str) -> Result<IndexMap<String, TagValue>, TagSyntaxError> {
    let mut tags = IndexMap::new();
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        let bytes = rest.as_bytes();

        // Key: printable run up to the colon
        let mut i = 0;
        while i < bytes.len()
            && bytes[i] > b' '
            && bytes[i] != b':'
            && bytes[i] != b'"'
            && bytes[i] != 0x7f
        {
            i += 1;
        }
        if i == 0 {
            return Err(TagSyntaxError::Key);
        }
        if i + 1 >= bytes.len() || bytes[i] != b':' {
            return Err(TagSyntaxError::Pair);
        }
        if bytes[i + 1] != b'"' {
            return Err(TagSyntaxError::Value);
        }

        let key = &rest[..i];
        rest = &rest[i + 1..];

        // Quoted value, honouring backslash escapes
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return Err(TagSyntaxError::Value);
        }

        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        let bytes = unquote_bytes(quoted).ok_or(TagSyntaxError::Value)?;
        let value = lossy_text(&bytes, quoted);
        let mut parts = value.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        let options: Vec<String> = parts.map(str::to_string).collect();

        tags.insert(key.to_string(), TagValue { name, options });
    }

    Ok(tags)
}

/// Decode a Go interpreted string literal, surrounding quotes included.
///
/// Returns `None` for anything Go would reject: missing quotes, raw newlines
/// or unknown escapes. Bytes from `\x` and octal escapes that are not valid
/// UTF-8 become U+FFFD.
pub fn unquote(quoted: &str) -> Option<String> {
    unquote_bytes(quoted).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a Go interpreted string literal to its raw bytes.
///
/// Like Go strings, the result may hold any byte sequence.
pub fn unquote_bytes(quoted: &str) -> Option<Vec<u8>> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if !inner.contains('\\') {
        return (!inner.contains('"') && !inner.contains('\n')).then(|| inner.as_bytes().to_vec());
    }

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escape = chars.next()?;
                match escape {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(read_hex(&mut chars, 2)? as u8),
                    'u' => push_char(&mut out, char::from_u32(read_hex(&mut chars, 4)?)?),
                    'U' => push_char(&mut out, char::from_u32(read_hex(&mut chars, 8)?)?),
                    '0'..='7' => {
                        let mut value = escape.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        if value > 0xff {
                            return None;
                        }
                        out.push(value as u8);
                    }
                    _ => return None,
                }
            }
            c => push_char(&mut out, c),
        }
    }

    Some(out)
}

/// Text of decoded tag bytes; invalid UTF-8 cannot be carried into generated code
fn lossy_text<'a>(bytes: &'a [u8], literal: &str) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!(literal, "Struct tag holds bytes that are not UTF-8; replaced with U+FFFD");
    }
    text
}

fn read_hex(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
