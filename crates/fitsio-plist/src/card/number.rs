//! Integer and floating-point literal scanning, including the FORTRAN
//! `D` exponent form.

use core::str;

/// A scanned numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

/// Scan a numeric literal at the start of `text`.
///
/// Returns the number and the count of bytes consumed, or `None` if `text`
/// does not start with a number. The integer branch runs only when
/// `try_integer` is set; an integer literal followed by `.`, `E` or `D`, or
/// one that overflows `i64`, is read as a float instead.
pub fn scan_number(text: &[u8], try_integer: bool) -> Option<(Number, usize)> {
    let sign = usize::from(matches!(text.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&text[sign..]);
    let int_end = sign + int_digits;

    let fraction_follows = matches!(
        text.get(int_end),
        Some(b'.' | b'E' | b'e' | b'D' | b'd')
    );
    if try_integer && int_digits > 0 && !fraction_follows {
        let literal = str::from_utf8(&text[..int_end]).ok()?;
        if let Ok(n) = literal.parse::<i64>() {
            return Some((Number::Integer(n), int_end));
        }
    }

    scan_float(text, sign, int_end)
}

fn scan_float(text: &[u8], sign: usize, int_end: usize) -> Option<(Number, usize)> {
    let mut pos = int_end;
    let mut mantissa_digits = int_end - sign;
    if text.get(pos) == Some(&b'.') {
        pos += 1;
        let frac = count_digits(&text[pos..]);
        mantissa_digits += frac;
        pos += frac;
    }
    if mantissa_digits == 0 {
        return None;
    }

    match text.get(pos) {
        Some(b'E' | b'e') => {
            if let Some(len) = exponent_len(&text[pos + 1..]) {
                pos += 1 + len;
            }
            let literal = str::from_utf8(&text[..pos]).ok()?;
            literal.parse::<f64>().ok().map(|x| (Number::Float(x), pos))
        }
        Some(b'D' | b'd') => {
            let len = exponent_len(&text[pos + 1..])?;
            let mut scratch = text[..pos + 1 + len].to_vec();
            scratch[pos] = b'E';
            let literal = str::from_utf8(&scratch).ok()?;
            literal
                .parse::<f64>()
                .ok()
                .map(|x| (Number::Float(x), pos + 1 + len))
        }
        _ => {
            let literal = str::from_utf8(&text[..pos]).ok()?;
            literal.parse::<f64>().ok().map(|x| (Number::Float(x), pos))
        }
    }
}

/// Length of a `[+-]digits` exponent, or `None` if there are no digits.
fn exponent_len(text: &[u8]) -> Option<usize> {
    let sign = usize::from(matches!(text.first(), Some(b'+' | b'-')));
    match count_digits(&text[sign..]) {
        0 => None,
        n => Some(sign + n),
    }
}

fn count_digits(text: &[u8]) -> usize {
    text.iter().take_while(|b| b.is_ascii_digit()).count()
}
