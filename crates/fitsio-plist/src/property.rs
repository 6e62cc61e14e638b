//! A single typed, named, optionally commented header value.

use core::fmt;

use crate::error::{Error, Result};

/// Name of the commentary keyword that free text is folded into.
pub const COMMENT: &str = "COMMENT";

/// Name of the history commentary keyword.
pub const HISTORY: &str = "HISTORY";

/// The type tag of a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Char,
    Bool,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    String,
    FloatComplex,
    DoubleComplex,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::Char => "char",
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Long => "long",
            PropertyType::LongLong => "long long",
            PropertyType::Float => "float",
            PropertyType::Double => "double",
            PropertyType::String => "string",
            PropertyType::FloatComplex => "float complex",
            PropertyType::DoubleComplex => "double complex",
        };
        f.write_str(name)
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single ASCII character.
    Char(u8),
    /// FITS logical.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer, `long` flavour.
    Long(i64),
    /// 64-bit signed integer, `long long` flavour.
    LongLong(i64),
    /// Single precision float, written with 7 significant digits.
    Float(f32),
    /// Double precision float, written with 15 significant digits.
    Double(f64),
    /// Character string.
    String(String),
    /// Single precision complex `(real, imaginary)`.
    FloatComplex(f32, f32),
    /// Double precision complex `(real, imaginary)`.
    DoubleComplex(f64, f64),
}

impl Value {
    /// The type tag of this value.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Value::Char(_) => PropertyType::Char,
            Value::Bool(_) => PropertyType::Bool,
            Value::Int(_) => PropertyType::Int,
            Value::Long(_) => PropertyType::Long,
            Value::LongLong(_) => PropertyType::LongLong,
            Value::Float(_) => PropertyType::Float,
            Value::Double(_) => PropertyType::Double,
            Value::String(_) => PropertyType::String,
            Value::FloatComplex(..) => PropertyType::FloatComplex,
            Value::DoubleComplex(..) => PropertyType::DoubleComplex,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Char(c) => write!(f, "{}", *c as char),
            Value::Bool(b) => f.write_str(if *b { "T" } else { "F" }),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) | Value::LongLong(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Double(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::FloatComplex(re, im) => write!(f, "({re}, {im})"),
            Value::DoubleComplex(re, im) => write!(f, "({re}, {im})"),
        }
    }
}

/// A named header value with an optional comment.
///
/// The type of a property is fixed at construction. [`Property::set_value`]
/// refuses values of a different type.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: Value,
    comment: Option<String>,
}

impl Property {
    /// Create a property without a comment.
    ///
    /// Fails with [`Error::NullInput`] if `name` is empty.
    pub fn new(name: impl Into<String>, value: Value) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::NullInput("property name"));
        }
        Ok(Property {
            name,
            value,
            comment: None,
        })
    }

    /// Create a property carrying `comment`.
    pub fn with_comment(
        name: impl Into<String>,
        value: Value,
        comment: impl Into<String>,
    ) -> Result<Self> {
        let mut property = Property::new(name, value)?;
        property.comment = Some(comment.into());
        Ok(property)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn property_type(&self) -> PropertyType {
        self.value.property_type()
    }

    /// Returns `true` for `COMMENT`, `HISTORY` and blank-named properties.
    pub fn is_commentary(&self) -> bool {
        let name = self.name.trim_end();
        name.is_empty() || name == COMMENT || name == HISTORY
    }

    /// Replace the value, keeping the type.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        self.check_type(value.property_type())?;
        self.value = value;
        Ok(())
    }

    /// Replace the comment. `None` removes it, `Some("")` keeps an empty one.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    pub(crate) fn check_type(&self, expected: PropertyType) -> Result<()> {
        let found = self.property_type();
        if found != expected {
            return Err(Error::TypeMismatch {
                name: self.name.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn mismatch(&self, expected: PropertyType) -> Error {
        Error::TypeMismatch {
            name: self.name.clone(),
            expected,
            found: self.property_type(),
        }
    }

    pub fn as_char(&self) -> Result<u8> {
        match self.value {
            Value::Char(c) => Ok(c),
            _ => Err(self.mismatch(PropertyType::Char)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.value {
            Value::Bool(b) => Ok(b),
            _ => Err(self.mismatch(PropertyType::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self.value {
            Value::Int(n) => Ok(n),
            _ => Err(self.mismatch(PropertyType::Int)),
        }
    }

    pub fn as_long(&self) -> Result<i64> {
        match self.value {
            Value::Long(n) => Ok(n),
            _ => Err(self.mismatch(PropertyType::Long)),
        }
    }

    pub fn as_long_long(&self) -> Result<i64> {
        match self.value {
            Value::LongLong(n) => Ok(n),
            _ => Err(self.mismatch(PropertyType::LongLong)),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        match self.value {
            Value::Float(x) => Ok(x),
            _ => Err(self.mismatch(PropertyType::Float)),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self.value {
            Value::Double(x) => Ok(x),
            _ => Err(self.mismatch(PropertyType::Double)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch(PropertyType::String)),
        }
    }

    pub fn as_float_complex(&self) -> Result<(f32, f32)> {
        match self.value {
            Value::FloatComplex(re, im) => Ok((re, im)),
            _ => Err(self.mismatch(PropertyType::FloatComplex)),
        }
    }

    pub fn as_double_complex(&self) -> Result<(f64, f64)> {
        match self.value {
            Value::DoubleComplex(re, im) => Ok((re, im)),
            _ => Err(self.mismatch(PropertyType::DoubleComplex)),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) = {}", self.name, self.property_type(), self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, " / {comment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_null_input() {
        assert!(matches!(
            Property::new("", Value::Int(1)),
            Err(Error::NullInput(_))
        ));
    }

    #[test]
    fn type_follows_value() {
        let p = Property::new("EXPTIME", Value::Double(1.5)).unwrap();
        assert_eq!(p.property_type(), PropertyType::Double);
        assert_eq!(p.as_double().unwrap(), 1.5);
    }

    #[test]
    fn set_value_same_type() {
        let mut p = Property::new("NAXIS", Value::Int(2)).unwrap();
        p.set_value(Value::Int(3)).unwrap();
        assert_eq!(p.as_int().unwrap(), 3);
    }

    #[test]
    fn set_value_other_type_fails() {
        let mut p = Property::new("NAXIS", Value::Int(2)).unwrap();
        let err = p.set_value(Value::Double(3.0)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: PropertyType::Double,
                found: PropertyType::Int,
                ..
            }
        ));
        assert_eq!(p.as_int().unwrap(), 2);
    }

    #[test]
    fn typed_reader_mismatch() {
        let p = Property::new("OBJECT", Value::String("M31".into())).unwrap();
        assert_eq!(p.as_str().unwrap(), "M31");
        assert!(p.as_bool().is_err());
        assert!(p.as_long().is_err());
    }

    #[test]
    fn comment_none_vs_empty() {
        let mut p = Property::new("A", Value::Bool(true)).unwrap();
        assert_eq!(p.comment(), None);
        p.set_comment(Some(String::new()));
        assert_eq!(p.comment(), Some(""));
        p.set_comment(None);
        assert_eq!(p.comment(), None);
    }

    #[test]
    fn commentary_names() {
        let c = Property::new(COMMENT, Value::String("x".into())).unwrap();
        let h = Property::new(HISTORY, Value::String("x".into())).unwrap();
        let b = Property::new(" ", Value::String("x".into())).unwrap();
        let o = Property::new("OBJECT", Value::String("x".into())).unwrap();
        assert!(c.is_commentary());
        assert!(h.is_commentary());
        assert!(b.is_commentary());
        assert!(!o.is_commentary());
    }

    #[test]
    fn display_line() {
        let p = Property::with_comment("NAXIS", Value::Int(2), "axes").unwrap();
        assert_eq!(p.to_string(), "NAXIS (int) = 2 / axes");
        let p = Property::new("CPLX", Value::DoubleComplex(1.5, -2.0)).unwrap();
        assert_eq!(p.to_string(), "CPLX (double complex) = (1.5, -2)");
    }
}
