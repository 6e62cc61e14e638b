//! Contracts of the header reader and writer the codec drives.
//!
//! The loader consumes a [`HeaderSource`]; the serializer emits into a
//! [`HeaderSink`]. [`crate::buffer::HeaderBuffer`] and
//! [`crate::writer::CardWriter`] are the in-memory implementations.

use crate::block::CARD_SIZE;
use crate::error::{Error, Result};

/// Supplies the raw cards of one HDU.
pub trait HeaderSource {
    /// Position the source on the header of extension `index` (0 is primary).
    fn move_to_extension(&mut self, index: usize) -> Result<()>;

    /// Number of cards not yet read from the current header, `END` excluded.
    fn card_count(&self) -> Result<usize>;

    /// Return the next raw card.
    fn next_card(&mut self) -> Result<[u8; CARD_SIZE]>;
}

/// Whether a key is known to be new in the target header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Append a new card without searching for an existing one.
    Write,
    /// Replace the first card with the same key, or append if there is none.
    Update,
}

/// The commentary keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commentary {
    Comment,
    History,
    Blank,
}

/// Receives typed keys, one primitive per value type.
///
/// Sinks that cannot represent complex values or long strings keep the
/// default implementations, which fail with [`Error::UnsupportedMode`].
pub trait HeaderSink {
    fn put_logical(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: bool,
        comment: Option<&str>,
    ) -> Result<()>;

    fn put_integer(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: i64,
        comment: Option<&str>,
    ) -> Result<()>;

    /// Write a float with `precision` significant digits.
    fn put_float(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: f64,
        precision: usize,
        comment: Option<&str>,
    ) -> Result<()>;

    fn put_string(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<()>;

    fn put_complex(
        &mut self,
        _mode: KeyMode,
        name: &str,
        _value: (f64, f64),
        _precision: usize,
        _comment: Option<&str>,
    ) -> Result<()> {
        Err(Error::UnsupportedMode(format!(
            "complex value for '{name}' cannot be written by this sink"
        )))
    }

    /// Write a string using the long-string (`CONTINUE`) convention.
    fn put_long_string(
        &mut self,
        _mode: KeyMode,
        name: &str,
        _value: &str,
        _comment: Option<&str>,
    ) -> Result<()> {
        Err(Error::UnsupportedMode(format!(
            "long string for '{name}' cannot be written by this sink"
        )))
    }

    /// Announce that the long-string convention is in use.
    fn put_long_string_warning(&mut self) -> Result<()> {
        Err(Error::UnsupportedMode(String::from(
            "long string convention not supported by this sink",
        )))
    }

    fn put_commentary(&mut self, keyword: Commentary, text: &str) -> Result<()>;
}
