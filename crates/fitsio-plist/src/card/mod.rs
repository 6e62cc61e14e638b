//! Parsing of single 80-byte header cards.
//!
//! A card is consumed in four steps: the key ([`key`]), the value
//! ([`value`], which uses [`number`] for numeric literals), and finally the
//! free-text comment ([`comment`]).

pub mod comment;
pub mod key;
pub mod number;
pub mod value;

use crate::block::CARD_SIZE;

/// Length of the record inside `card`, ignoring anything past column 80.
pub(crate) fn record_len(card: &[u8]) -> usize {
    card.len().min(CARD_SIZE)
}

/// First index at or after `pos` that is not a space, bounded by `end`.
pub(crate) fn skip_spaces(card: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && card[pos] == b' ' {
        pos += 1;
    }
    pos
}
