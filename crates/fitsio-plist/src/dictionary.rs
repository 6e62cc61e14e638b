//! Conventional FITS keyword order, for use with [`crate::PropertyList::sort_by`].
//!
//! The serializer writes properties in list order and never sorts. Callers
//! that build a header from scratch sort first:
//!
//! ```
//! use fitsio_plist::{dictionary, Property, PropertyList, Value};
//!
//! let mut list = PropertyList::new();
//! list.append(Property::new("OBJECT", Value::String("M31".into())).unwrap());
//! list.append(Property::new("NAXIS", Value::Int(0)).unwrap());
//! list.append(Property::new("SIMPLE", Value::Bool(true)).unwrap());
//! list.sort_by(dictionary::compare);
//! assert_eq!(list.get(0).unwrap().name(), "SIMPLE");
//! ```

use core::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::card::key::is_standard_keyword;
use crate::property::{Property, COMMENT, HISTORY};

/// Sort class of a keyword, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeywordClass {
    /// `SIMPLE` or `XTENSION`.
    Identity,
    Bitpix,
    Naxis,
    /// `NAXISn`, ordered by `n`.
    AxisLength(u32),
    Extend,
    Pcount,
    Gcount,
    Tfields,
    /// `TTYPEn`, `TFORMn` and the other per-column table keys.
    Column,
    /// Any other standard keyword.
    Ordinary,
    /// Keywords written with the HIERARCH convention.
    Hierarch,
    History,
    Comment,
}

static COLUMN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^T(?:TYPE|FORM|UNIT|NULL|SCAL|ZERO|DISP|DIM|BCOL)[1-9][0-9]*$")
        .unwrap_or_else(|e| panic!("invalid column key pattern: {e}"))
});

/// Classify a keyword name.
pub fn keyword_class(name: &str) -> KeywordClass {
    match name.trim_end() {
        "SIMPLE" | "XTENSION" => KeywordClass::Identity,
        "BITPIX" => KeywordClass::Bitpix,
        "NAXIS" => KeywordClass::Naxis,
        "EXTEND" => KeywordClass::Extend,
        "PCOUNT" => KeywordClass::Pcount,
        "GCOUNT" => KeywordClass::Gcount,
        "TFIELDS" => KeywordClass::Tfields,
        HISTORY => KeywordClass::History,
        "" | COMMENT => KeywordClass::Comment,
        name => {
            if let Some(n) = name.strip_prefix("NAXIS").and_then(|n| n.parse().ok()) {
                KeywordClass::AxisLength(n)
            } else if COLUMN_KEY.is_match(name) {
                KeywordClass::Column
            } else if is_standard_keyword(name) {
                KeywordClass::Ordinary
            } else {
                KeywordClass::Hierarch
            }
        }
    }
}

/// Order two properties by keyword class only; the sort is stable, so
/// properties of the same class keep their relative order.
pub fn compare(a: &Property, b: &Property) -> Ordering {
    keyword_class(a.name()).cmp(&keyword_class(b.name()))
}
