/// FITS block size in bytes (each logical record is one block).
pub const BLOCK_SIZE: usize = 2880;

/// FITS card (keyword record) size in bytes.
pub const CARD_SIZE: usize = 80;

/// Number of cards that fit in a single block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Width of the short keyword field (columns 1-8).
pub const KEYWORD_LEN: usize = 8;

/// Padding byte used for header blocks (ASCII space).
pub const HEADER_PAD_BYTE: u8 = 0x20;

/// Returns the number of FITS blocks required to hold `num_bytes` bytes.
///
/// 0 bytes requires 0 blocks, 1 byte requires 1 block, 2880 bytes
/// requires 1 block, 2881 bytes requires 2 blocks, etc.
pub const fn blocks_needed(num_bytes: usize) -> usize {
    if num_bytes == 0 {
        return 0;
    }
    num_bytes.div_ceil(BLOCK_SIZE)
}

/// Returns the total byte length (in whole blocks) required to hold `num_bytes`.
pub const fn padded_byte_len(num_bytes: usize) -> usize {
    blocks_needed(num_bytes) * BLOCK_SIZE
}

/// Like [`padded_byte_len`], but `None` when the padded length overflows.
pub const fn checked_padded_byte_len(num_bytes: usize) -> Option<usize> {
    blocks_needed(num_bytes).checked_mul(BLOCK_SIZE)
}

/// Copy `src` into a buffer padded with spaces to a whole number of blocks.
pub fn pad_header(src: &[u8]) -> Vec<u8> {
    let mut out = vec![HEADER_PAD_BYTE; padded_byte_len(src.len())];
    out[..src.len()].copy_from_slice(src);
    out
}

/// Build an 80-byte card from `text`, space-padded and truncated at 80 bytes.
pub fn make_card(text: &str) -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];
    let bytes = text.as_bytes();
    let len = bytes.len().min(CARD_SIZE);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}
