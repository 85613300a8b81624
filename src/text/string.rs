use std::borrow::Cow;

use memchr::memchr2;

use crate::error::SyntaxError;

/// Outcome of scanning a quoted string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scanned {
    /// No escapes: the content is `input[start..end]`.
    Plain { end: usize },
    /// Escapes were decoded into the scratch buffer.
    Escaped { end: usize },
}

impl Scanned {
    /// Offset of the closing quote.
    pub fn end(self) -> usize {
        match self {
            Scanned::Plain { end } | Scanned::Escaped { end } => end,
        }
    }
}

/// Scan a string body starting right after its opening quote.
///
/// Control characters and malformed escapes are rejected. Raw bytes are not
/// UTF-8 checked here; see [`to_utf8`].
pub(crate) fn scan_string(
    input: &[u8],
    start: usize,
    scratch: &mut Vec<u8>,
) -> Result<Scanned, SyntaxError> {
    let mut cursor = start;
    let mut escaped = false;
    loop {
        let Some(rel) = memchr2(b'"', b'\\', &input[cursor..]) else {
            reject_control(&input[cursor..], cursor)?;
            return Err(SyntaxError::new(input.len(), "unterminated string"));
        };
        let idx = cursor + rel;
        reject_control(&input[cursor..idx], cursor)?;
        if escaped {
            scratch.extend_from_slice(&input[cursor..idx]);
        }
        if input[idx] == b'"' {
            return Ok(if escaped {
                Scanned::Escaped { end: idx }
            } else {
                Scanned::Plain { end: idx }
            });
        }
        if !escaped {
            scratch.clear();
            scratch.extend_from_slice(&input[start..idx]);
            escaped = true;
        }
        cursor = decode_escape(input, idx, scratch)?;
    }
}

fn reject_control(segment: &[u8], offset: usize) -> Result<(), SyntaxError> {
    match segment.iter().position(|byte| *byte < 0x20) {
        Some(pos) => Err(SyntaxError::new(
            offset + pos,
            "control character in string",
        )),
        None => Ok(()),
    }
}

/// Decode the escape at `idx` (the backslash) and return the offset after it.
fn decode_escape(input: &[u8], idx: usize, out: &mut Vec<u8>) -> Result<usize, SyntaxError> {
    let Some(&kind) = input.get(idx + 1) else {
        return Err(SyntaxError::new(idx, "unterminated string"));
    };
    let byte = match kind {
        b'"' => b'"',
        b'\\' => b'\\',
        b'/' => b'/',
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'u' => return decode_unicode(input, idx, out),
        _ => return Err(SyntaxError::new(idx, "invalid escape sequence")),
    };
    out.push(byte);
    Ok(idx + 2)
}

fn decode_unicode(input: &[u8], idx: usize, out: &mut Vec<u8>) -> Result<usize, SyntaxError> {
    let high = read_hex4(input, idx + 2)?;
    let mut next = idx + 6;
    let code = if (0xD800..=0xDBFF).contains(&high) {
        if input.get(next) != Some(&b'\\') || input.get(next + 1) != Some(&b'u') {
            return Err(SyntaxError::new(idx, "unpaired surrogate in string"));
        }
        let low = read_hex4(input, next + 2)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(SyntaxError::new(next, "invalid low surrogate in string"));
        }
        next += 6;
        0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
    } else if (0xDC00..=0xDFFF).contains(&high) {
        return Err(SyntaxError::new(idx, "unpaired surrogate in string"));
    } else {
        u32::from(high)
    };
    let ch = char::from_u32(code).ok_or(SyntaxError::new(idx, "invalid unicode escape"))?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    Ok(next)
}

fn read_hex4(input: &[u8], at: usize) -> Result<u16, SyntaxError> {
    let digits = input
        .get(at..at + 4)
        .ok_or(SyntaxError::new(at, "invalid unicode escape"))?;
    let mut value: u16 = 0;
    for (pos, byte) in digits.iter().enumerate() {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(SyntaxError::new(at + pos, "invalid unicode escape")),
        };
        value = (value << 4) | u16::from(digit);
    }
    Ok(value)
}

/// Check string bytes for UTF-8. With `allow_invalid`, malformed sequences
/// are replaced with U+FFFD instead of failing.
pub(crate) fn to_utf8(
    bytes: &[u8],
    offset: usize,
    allow_invalid: bool,
) -> Result<Cow<'_, str>, SyntaxError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(_) if allow_invalid => Ok(String::from_utf8_lossy(bytes)),
        Err(err) => Err(SyntaxError::new(
            offset + err.valid_up_to(),
            "invalid UTF-8 in string",
        )),
    }
}
