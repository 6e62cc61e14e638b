use crate::block::KEYWORD_LEN;

use super::record_len;

/// Literal that opens an extended-keyword (HIERARCH) card.
pub const HIERARCH_PREFIX: &[u8; 9] = b"HIERARCH ";

/// Extract the key of `card` and the column at which its value indicator
/// is expected.
///
/// For ordinary cards the key is the leading run of non-space bytes in
/// columns 1-8 and the returned length is always 8. For HIERARCH cards the
/// key is the trimmed text between the prefix and the first `=`, and the
/// returned length is the index of that `=`.
///
/// Returns `None` for a HIERARCH card without any `=` in the record.
pub fn parse_key(card: &[u8]) -> Option<(&[u8], usize)> {
    let end = record_len(card);

    if card.len() >= HIERARCH_PREFIX.len() && &card[..HIERARCH_PREFIX.len()] == HIERARCH_PREFIX {
        let start = HIERARCH_PREFIX.len();
        let eq = start + card[start..end].iter().position(|&b| b == b'=')?;
        let key = trim_spaces(&card[start..eq]);
        return Some((key, eq));
    }

    let limit = end.min(KEYWORD_LEN);
    let len = card[..limit]
        .iter()
        .position(|&b| b == b' ' || b == 0)
        .unwrap_or(limit);
    Some((&card[..len], KEYWORD_LEN))
}

fn trim_spaces(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ')
        .map(|i| i + 1)
        .unwrap_or(start);
    &bytes[start..end]
}

/// Returns `true` if `name` can be written in columns 1-8 without the
/// HIERARCH convention.
pub fn is_standard_keyword(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= KEYWORD_LEN
        && name
            .bytes()
            .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_'))
}
