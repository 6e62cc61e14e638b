//! Value grammar of a header card: strings, logicals, complex pairs,
//! undefined values and numbers.

use crate::property::{COMMENT, HISTORY};
use crate::wcs::{classify, NumericClass};

use super::number::{scan_number, Number};
use super::{record_len, skip_spaces};

/// The typed result of parsing the value part of a card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Complex(f64, f64),
    String(String),
    /// A value indicator with no value after it.
    Undefined,
    /// No value indicator; the remainder of the card is free text.
    None,
}

/// Position of the byte that made a card unparsable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unparsable {
    /// Zero-based column of the offending byte.
    pub offset: usize,
    /// The offending byte, or `None` if the record ended early.
    pub byte: Option<u8>,
}

impl Unparsable {
    fn at(card: &[u8], offset: usize) -> Self {
        Unparsable {
            offset,
            byte: card.get(offset).copied(),
        }
    }
}

/// Parse the value of `card`.
///
/// `key_end` is the column of the value indicator as returned by
/// [`super::key::parse_key`] and `naxis` the `NAXIS` value seen so far.
/// Returns the value and the column at which the comment begins.
pub fn parse_value(
    card: &[u8],
    key: &str,
    key_end: usize,
    naxis: i64,
) -> Result<(CardValue, usize), Unparsable> {
    let end = record_len(card);

    if key.is_empty() || key == COMMENT || key == HISTORY || card.get(key_end) != Some(&b'=') {
        return Ok((CardValue::None, key_end.min(end)));
    }

    let pos = skip_spaces(card, key_end + 1, end);
    if pos == end {
        return Ok((CardValue::Undefined, end));
    }

    let (value, next) = match card[pos] {
        b'\'' => parse_quoted(card, pos, end)?,
        b'T' => (CardValue::Logical(true), pos + 1),
        b'F' => (CardValue::Logical(false), pos + 1),
        b'(' => parse_complex(card, pos, end)?,
        b'/' => return Ok((CardValue::Undefined, pos)),
        _ => {
            let try_integer = classify(key, naxis) == NumericClass::Natural;
            match scan_number(&card[pos..end], try_integer) {
                Some((Number::Integer(n), len)) => (CardValue::Integer(n), pos + len),
                Some((Number::Float(x), len)) => (CardValue::Float(x), pos + len),
                None => return Err(Unparsable::at(card, pos)),
            }
        }
    };

    let comment_offset = trailing(card, next, end)?;
    Ok((value, comment_offset))
}

/// Parse the string of a `CONTINUE` card, which starts after column 8 and
/// has no value indicator.
pub fn parse_continuation(card: &[u8], key_end: usize) -> Result<(String, usize), Unparsable> {
    let end = record_len(card);
    let pos = skip_spaces(card, key_end, end);
    if card.get(pos) != Some(&b'\'') || pos >= end {
        return Err(Unparsable::at(card, pos));
    }
    match parse_quoted(card, pos, end)? {
        (CardValue::String(s), next) => Ok((s, trailing(card, next, end)?)),
        _ => Err(Unparsable::at(card, pos)),
    }
}

/// After a value only spaces, a `/` comment or the end of the record may
/// follow. Returns the comment offset.
fn trailing(card: &[u8], next: usize, end: usize) -> Result<usize, Unparsable> {
    let pos = skip_spaces(card, next, end);
    if pos == end || card[pos] == b'/' {
        Ok(pos)
    } else {
        Err(Unparsable::at(card, pos))
    }
}

/// Parse a quoted string starting at the opening quote.
///
/// A doubled quote is one literal quote. Trailing spaces are not part of
/// the value, which also makes an all-space string empty.
fn parse_quoted(card: &[u8], open: usize, end: usize) -> Result<(CardValue, usize), Unparsable> {
    let mut value = String::new();
    let mut i = open + 1;

    loop {
        if i >= end {
            return Err(Unparsable::at(card, open));
        }
        if card[i] == b'\'' {
            if i + 1 < end && card[i + 1] == b'\'' {
                value.push('\'');
                i += 2;
            } else {
                i += 1;
                break;
            }
        } else {
            value.push(card[i] as char);
            i += 1;
        }
    }

    let len = value.trim_end_matches(' ').len();
    value.truncate(len);
    Ok((CardValue::String(value), i))
}

/// Parse `(real, imag)` starting at the opening parenthesis.
fn parse_complex(card: &[u8], open: usize, end: usize) -> Result<(CardValue, usize), Unparsable> {
    let (re, pos) = complex_part(card, open + 1, end)?;
    if card.get(pos) != Some(&b',') || pos >= end {
        return Err(Unparsable::at(card, pos));
    }
    let (im, pos) = complex_part(card, pos + 1, end)?;
    if card.get(pos) != Some(&b')') || pos >= end {
        return Err(Unparsable::at(card, pos));
    }
    Ok((CardValue::Complex(re, im), pos + 1))
}

/// One component of a complex pair with optional surrounding spaces.
/// Returns the value and the index of the first byte after the trailing spaces.
fn complex_part(card: &[u8], start: usize, end: usize) -> Result<(f64, usize), Unparsable> {
    let pos = skip_spaces(card, start, end);
    let (number, len) = scan_number(&card[pos..end], true).ok_or(Unparsable::at(card, pos))?;
    Ok((number.as_f64(), skip_spaces(card, pos + len, end)))
}
