//! Duplicate-key detection for one serialize pass.

use std::collections::HashMap;

use crate::block::KEYWORD_LEN;
use crate::property::{COMMENT, HISTORY};

/// Remembers which key names have already been emitted.
///
/// Names are bucketed by their length with trailing spaces removed, so a
/// lookup only compares against names that can be equal. A bucket is sized
/// for all remaining candidates when it is first created.
#[derive(Debug, Default)]
pub struct UniquenessTracker<'a> {
    buckets: HashMap<usize, Vec<&'a [u8]>>,
}

impl<'a> UniquenessTracker<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` and report whether an equal name was recorded before.
    ///
    /// `remaining` is the number of candidates still to come after this one.
    /// `COMMENT`, `HISTORY` and blank names are never recorded and never
    /// reported as seen.
    pub fn check_and_record(&mut self, name: &'a str, remaining: usize) -> bool {
        let name = name.trim_end_matches(' ').as_bytes();
        if name.is_empty() || name == COMMENT.as_bytes() || name == HISTORY.as_bytes() {
            return false;
        }

        let bucket = self
            .buckets
            .entry(name.len())
            .or_insert_with(|| Vec::with_capacity(remaining + 1));
        if bucket.iter().any(|seen| same_name(seen, name)) {
            return true;
        }
        bucket.push(name);
        false
    }
}

/// Byte equality of two names of the same length. Long names are compared
/// on their last eight bytes first, where WCS alternates usually differ.
fn same_name(a: &[u8], b: &[u8]) -> bool {
    let len = a.len();
    if len > KEYWORD_LEN {
        let split = len - KEYWORD_LEN;
        a[split..] == b[split..] && a[..split] == b[..split]
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_occurrence_is_seen() {
        let mut tracker = UniquenessTracker::new();
        assert!(!tracker.check_and_record("FOO", 1));
        assert!(tracker.check_and_record("FOO", 0));
    }

    #[test]
    fn trailing_spaces_ignored() {
        let mut tracker = UniquenessTracker::new();
        assert!(!tracker.check_and_record("FOO", 1));
        assert!(tracker.check_and_record("FOO   ", 0));
    }

    #[test]
    fn same_length_different_names() {
        let mut tracker = UniquenessTracker::new();
        assert!(!tracker.check_and_record("NAXIS1", 2));
        assert!(!tracker.check_and_record("NAXIS2", 1));
        assert!(!tracker.check_and_record("BITPIX", 0));
    }

    #[test]
    fn long_names_differing_in_suffix_or_prefix() {
        let mut tracker = UniquenessTracker::new();
        assert!(!tracker.check_and_record("ESO DET CHIP1 NAME", 3));
        assert!(!tracker.check_and_record("ESO DET CHIP2 NAME", 2));
        assert!(!tracker.check_and_record("XSO DET CHIP1 NAME", 1));
        assert!(tracker.check_and_record("ESO DET CHIP1 NAME", 0));
    }

    #[test]
    fn commentary_and_blank_are_exempt() {
        let mut tracker = UniquenessTracker::new();
        for _ in 0..3 {
            assert!(!tracker.check_and_record(COMMENT, 3));
            assert!(!tracker.check_and_record(HISTORY, 3));
            assert!(!tracker.check_and_record("    ", 3));
        }
    }

    #[test]
    fn bucket_capacity_covers_remaining() {
        let mut tracker = UniquenessTracker::new();
        tracker.check_and_record("A", 9);
        assert!(tracker.buckets[&1].capacity() >= 10);
    }
}
