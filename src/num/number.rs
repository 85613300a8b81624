use crate::error::SyntaxError;

/// Parsed form of a numeric token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Keep the token text.
    Raw,
}

/// Return the end offset of the numeric token starting at `start`.
pub(crate) fn scan_number(input: &[u8], start: usize) -> Result<usize, SyntaxError> {
    let mut idx = start;
    if input.get(idx) == Some(&b'-') {
        idx += 1;
    }
    match input.get(idx) {
        Some(b'0') => {
            idx += 1;
            if matches!(input.get(idx), Some(b'0'..=b'9')) {
                return Err(SyntaxError::new(idx, "leading zero in number"));
            }
        }
        Some(b'1'..=b'9') => idx = skip_digits(input, idx),
        _ => return Err(SyntaxError::new(idx, "invalid number")),
    }
    if input.get(idx) == Some(&b'.') {
        idx += 1;
        let end = skip_digits(input, idx);
        if end == idx {
            return Err(SyntaxError::new(idx, "missing digits after decimal point"));
        }
        idx = end;
    }
    if matches!(input.get(idx), Some(b'e' | b'E')) {
        idx += 1;
        if matches!(input.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let end = skip_digits(input, idx);
        if end == idx {
            return Err(SyntaxError::new(idx, "missing digits in exponent"));
        }
        idx = end;
    }
    Ok(idx)
}

fn skip_digits(input: &[u8], mut idx: usize) -> usize {
    while matches!(input.get(idx), Some(b'0'..=b'9')) {
        idx += 1;
    }
    idx
}

/// Convert a token accepted by [`scan_number`].
///
/// Integers that fit `i64` (negative) or `u64` (non-negative) stay integers;
/// `-0` is zero and so `UInt(0)`.
/// Anything else is a float, unless it is out of native range and
/// `bignum_as_raw` asks to keep the text.
pub fn convert(token: &str, bignum_as_raw: bool, allow_inf: bool) -> Result<Number, &'static str> {
    let integral = !token
        .as_bytes()
        .iter()
        .any(|byte| matches!(byte, b'.' | b'e' | b'E'));
    if integral {
        if token.starts_with('-') {
            match token.parse::<i64>() {
                Ok(0) => return Ok(Number::UInt(0)),
                Ok(value) => return Ok(Number::Int(value)),
                Err(_) => {}
            }
        } else if let Ok(value) = token.parse::<u64>() {
            return Ok(Number::UInt(value));
        }
        if bignum_as_raw {
            return Ok(Number::Raw);
        }
    }
    let value = token
        .parse::<f64>()
        .map_err(|_| "invalid number")?;
    if value.is_finite() {
        return Ok(Number::Float(value));
    }
    if bignum_as_raw {
        return Ok(Number::Raw);
    }
    if allow_inf {
        return Ok(Number::Float(value));
    }
    Err("number is out of range")
}

/// Match a case-insensitive `nan`, `inf` or `infinity` literal, optionally
/// preceded by `-`. Returns the end offset and the value.
pub fn scan_nan_inf(input: &[u8], start: usize) -> Option<(usize, f64)> {
    let (negative, at) = match input.get(start) {
        Some(b'-') => (true, start + 1),
        _ => (false, start),
    };
    let rest = input.get(at..)?;
    for (word, value) in [
        ("infinity", f64::INFINITY),
        ("inf", f64::INFINITY),
        ("nan", f64::NAN),
    ] {
        let len = word.len();
        if rest.len() >= len && rest[..len].eq_ignore_ascii_case(word.as_bytes()) {
            let value = if negative { -value } else { value };
            return Some((at + len, value));
        }
    }
    None
}
