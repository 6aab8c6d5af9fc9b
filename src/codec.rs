//! UTF-8 / UTF-16 codec helpers, grounded on `original_source/src/utf8.c`.
//!
//! These are the primitives the DFA's hex-digit states (`U1`..`U4`) and the
//! printer back-end's string escaper (`generator::printer`) build on: they
//! don't touch the parser's per-byte dispatch loop directly.

use crate::error::{Error, Utf8InvalidityError};

/// Encode a single Unicode scalar value to UTF-8, appending the bytes to
/// `out`. Rejects code points above `0x10FFFF` and surrogate half code
/// points (`U+D800..=U+DFFF`), which can only reach here via a malformed
/// `\uXXXX` escape that wasn't paired (callers should combine surrogate
/// pairs with [`combine_surrogates`] first).
pub fn encode_utf8(code_point: u32, out: &mut Vec<u8>) -> Result<(), Utf8InvalidityError> {
    let ch = char::from_u32(code_point).ok_or(Utf8InvalidityError::InvalidCodePoint)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    Ok(())
}

/// Validate a UTF-8 sequence of 1-4 bytes starting at `bytes[0]`. Returns
/// the sequence length (1-4) on success. Returns `None` if the sequence is
/// malformed, over-long, encodes a code point above `0x10FFFF`, or decodes
/// to a surrogate half.
pub fn validate_utf8_sequence(bytes: &[u8]) -> Option<usize> {
    let first = *bytes.first()?;
    let len = if first < 0x80 {
        1
    } else if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else if first & 0xF8 == 0xF0 {
        4
    } else {
        return None;
    };
    if bytes.len() < len {
        return None;
    }
    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => {
            let ch = s.chars().next()?;
            if ch.len_utf8() != len {
                return None;
            }
            Some(len)
        }
        Err(_) => None,
    }
}

/// Combine a UTF-16 surrogate pair (`high` in `0xD800..=0xDBFF`, `low` in
/// `0xDC00..=0xDFFF`) into a single code point.
pub fn combine_surrogates(high: u16, low: u16) -> Result<u32, Utf8InvalidityError> {
    if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
        return Err(Utf8InvalidityError::UnpairedSurrogate);
    }
    Ok(0x10000 + (((high as u32) & 0x3FF) << 10) + (low as u32 & 0x3FF))
}

/// If `input` starts with a UTF-8 byte-order mark (`EF BB BF`), return the
/// remaining slice with it stripped; otherwise return `input` unchanged.
pub fn strip_bom(input: &[u8]) -> &[u8] {
    if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &input[3..]
    } else {
        input
    }
}

/// Validate that `bytes` is well-formed UTF-8, wrapping the stdlib's error
/// in this crate's [`Error`] with an absolute byte position.
pub fn validate_str(bytes: &[u8], position: usize) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|e| Error::Utf8 {
        position,
        source: Utf8InvalidityError::from(e),
    })
}
