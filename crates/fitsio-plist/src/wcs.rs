//! Keywords that must load as floating point even when their literal looks
//! like an integer.
//!
//! Classification is two-tier. Exact names and the single-digit WCS forms
//! (`CRPIX1`, `PC1_2`, ...) are decided by length and prefix comparison.
//! Only keys with a WCS prefix that the fast path does not recognise reach
//! the compiled pattern table.

use std::sync::LazyLock;

use regex::Regex;

/// Result of classifying a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClass {
    /// Load any numeric literal as a float.
    ForceFloat,
    /// Let the literal decide between integer and float.
    Natural,
}

const FLOAT_KEYS: [&str; 5] = ["EQUINOX", "EPOCH", "MJD-OBS", "LONGPOLE", "LATPOLE"];

/// Per-axis keys: prefix followed by an axis number.
const AXIS_PREFIXES: [&[u8; 5]; 5] = [b"CRPIX", b"CRVAL", b"CDELT", b"CRDER", b"CSYER"];

/// Matrix keys: prefix followed by `i_j`.
const MATRIX_PREFIXES: [&[u8; 2]; 3] = [b"PC", b"PV", b"CD"];

static WCS_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        wcs_regex(r"^(?:CRPIX|CRVAL|CDELT|CRDER|CSYER)[1-9][0-9]{0,2}[A-Z]?$"),
        wcs_regex(r"^(?:PC|CD)[1-9][0-9]{0,2}_[1-9][0-9]{0,2}[A-Z]?$"),
        wcs_regex(r"^PV[1-9][0-9]{0,2}_[0-9]{1,2}[A-Z]?$"),
    ]
});

fn wcs_regex(pattern: &str) -> Regex {
    // The patterns are fixed literals checked by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid WCS pattern {pattern}: {e}"))
}

/// Classify `key` given the value of `NAXIS` seen so far (0 if none).
pub fn classify(key: &str, naxis: i64) -> NumericClass {
    if FLOAT_KEYS.contains(&key) {
        return NumericClass::ForceFloat;
    }

    let bytes = key.as_bytes();
    if is_single_digit_form(bytes) {
        return if (1..10).contains(&naxis) {
            NumericClass::ForceFloat
        } else {
            NumericClass::Natural
        };
    }

    if has_wcs_prefix(bytes) && WCS_PATTERNS.iter().any(|re| re.is_match(key)) {
        return NumericClass::ForceFloat;
    }

    NumericClass::Natural
}

/// `CRPIXn` style keys with a single axis digit, and `PCi_j` style keys with
/// single-digit indices.
fn is_single_digit_form(key: &[u8]) -> bool {
    match key.len() {
        6 => AXIS_PREFIXES.iter().any(|p| key.starts_with(*p)) && is_axis_digit(key[5]),
        5 => {
            let prefix = &key[..2];
            if !MATRIX_PREFIXES.iter().any(|p| prefix == *p)
                || !is_axis_digit(key[2])
                || key[3] != b'_'
            {
                return false;
            }
            if prefix == b"PV" {
                key[4].is_ascii_digit()
            } else {
                is_axis_digit(key[4])
            }
        }
        _ => false,
    }
}

fn is_axis_digit(b: u8) -> bool {
    matches!(b, b'1'..=b'9')
}

fn has_wcs_prefix(key: &[u8]) -> bool {
    AXIS_PREFIXES.iter().any(|p| key.starts_with(*p))
        || MATRIX_PREFIXES.iter().any(|p| key.starts_with(*p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert_eq!(WCS_PATTERNS.len(), 3);
    }

    #[test]
    fn exact_names_always_float() {
        for key in FLOAT_KEYS {
            assert_eq!(classify(key, 0), NumericClass::ForceFloat, "{key}");
        }
    }

    #[test]
    fn single_digit_needs_naxis() {
        assert_eq!(classify("CRPIX1", 2), NumericClass::ForceFloat);
        assert_eq!(classify("CDELT2", 9), NumericClass::ForceFloat);
        assert_eq!(classify("CRPIX1", 0), NumericClass::Natural);
        assert_eq!(classify("CRPIX1", 10), NumericClass::Natural);
    }

    #[test]
    fn single_digit_matrix_forms() {
        assert_eq!(classify("PC1_2", 2), NumericClass::ForceFloat);
        assert_eq!(classify("CD2_1", 2), NumericClass::ForceFloat);
        assert_eq!(classify("PV2_0", 2), NumericClass::ForceFloat);
        assert_eq!(classify("PC1_0", 2), NumericClass::Natural);
    }

    #[test]
    fn multi_digit_uses_patterns() {
        assert_eq!(classify("PC10_11", 0), NumericClass::ForceFloat);
        assert_eq!(classify("CRVAL12", 0), NumericClass::ForceFloat);
        assert_eq!(classify("PV1_12", 0), NumericClass::ForceFloat);
        assert_eq!(classify("CRPIX1A", 0), NumericClass::ForceFloat);
        assert_eq!(classify("CD1_1B", 0), NumericClass::ForceFloat);
    }

    #[test]
    fn unrelated_keys_are_natural() {
        assert_eq!(classify("MYKEY1", 2), NumericClass::Natural);
        assert_eq!(classify("NAXIS1", 2), NumericClass::Natural);
        assert_eq!(classify("PCOUNT", 2), NumericClass::Natural);
        assert_eq!(classify("CDELTX", 2), NumericClass::Natural);
        assert_eq!(classify("CRPIX", 2), NumericClass::Natural);
    }
}
