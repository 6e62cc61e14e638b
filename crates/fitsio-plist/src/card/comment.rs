use super::record_len;

/// Extract the comment that starts at `offset` in `card`.
///
/// A leading `/` and the single space after it are not part of the comment;
/// trailing spaces are dropped. An empty or all-space remainder is `None`.
pub fn extract_comment(card: &[u8], offset: usize) -> Option<String> {
    let end = record_len(card);
    let mut start = offset;
    if start < end && card[start] == b'/' {
        start += 1;
    }
    if start < end && card[start] == b' ' {
        start += 1;
    }
    if start >= end {
        return None;
    }

    let text = &card[start..end];
    let len = text.iter().rposition(|&b| b != b' ').map(|i| i + 1)?;
    Some(text[..len].iter().map(|&b| b as char).collect())
}
