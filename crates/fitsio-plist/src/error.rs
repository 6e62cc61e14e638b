use thiserror::Error;

use crate::property::PropertyType;

/// All errors that can occur while loading or serializing a FITS header.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was absent.
    #[error("null input: {0}")]
    NullInput(&'static str),
    /// An argument was present but not acceptable.
    #[error("illegal input: {0}")]
    IllegalInput(String),
    /// A named property is absent, or the header holds no cards.
    #[error("data not found: {0}")]
    DataNotFound(String),
    /// A card could not be parsed, or the header position is unreadable.
    #[error("bad FITS format: {0}")]
    BadFileFormat(String),
    /// An update or copy targeted a property of a different type.
    #[error("type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: PropertyType,
        found: PropertyType,
    },
    /// The header sink has no writer for the requested type.
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),
    /// An I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error class, independent of the message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NullInput,
    IllegalInput,
    DataNotFound,
    BadFileFormat,
    TypeMismatch,
    UnsupportedMode,
    Io,
}

impl Error {
    /// Return the class of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NullInput(_) => ErrorCode::NullInput,
            Error::IllegalInput(_) => ErrorCode::IllegalInput,
            Error::DataNotFound(_) => ErrorCode::DataNotFound,
            Error::BadFileFormat(_) => ErrorCode::BadFileFormat,
            Error::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Error::UnsupportedMode(_) => ErrorCode::UnsupportedMode,
            Error::Io(_) => ErrorCode::Io,
        }
    }

    pub(crate) fn bad_format(message: impl Into<String>) -> Self {
        Error::BadFileFormat(message.into())
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Error::DataNotFound(format!("property '{name}' not found"))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
