//! In-memory [`HeaderSource`] over a complete FITS byte stream.

use std::path::Path;

use tracing::debug;

use crate::block::{
    checked_padded_byte_len, make_card, pad_header, padded_byte_len, BLOCK_SIZE, CARD_SIZE,
    KEYWORD_LEN,
};
use crate::card::key::parse_key;
use crate::card::value::{parse_value, CardValue};
use crate::error::{Error, Result};
use crate::source::HeaderSource;

/// Cards of the selected header and the read position inside it.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    start: usize,
    count: usize,
    next: usize,
}

/// FITS bytes held in memory, read one header at a time.
///
/// HDUs are located by walking the headers from the start of the stream and
/// skipping each data unit by the size its header declares.
#[derive(Debug, Clone)]
pub struct HeaderBuffer {
    data: Vec<u8>,
    cursor: Option<Cursor>,
}

impl HeaderBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, cursor: None }
    }

    /// Read a whole FITS file into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "read FITS file");
        Ok(Self::new(data))
    }

    /// A single-HDU stream holding `cards`, an `END` card and padding.
    pub fn from_cards(cards: &[[u8; CARD_SIZE]]) -> Self {
        let mut bytes = Vec::with_capacity((cards.len() + 1) * CARD_SIZE);
        for card in cards {
            bytes.extend_from_slice(card);
        }
        bytes.extend_from_slice(&make_card("END"));
        Self::new(pad_header(&bytes))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of HDUs in the stream.
    pub fn extension_count(&self) -> Result<usize> {
        let mut offset = 0;
        let mut count = 0;
        while offset < self.data.len() {
            offset = self.next_hdu(offset)?;
            count += 1;
        }
        Ok(count)
    }

    /// Offset of the HDU following the one whose header starts at `offset`.
    fn next_hdu(&self, offset: usize) -> Result<usize> {
        let (count, header_len) = locate_end(&self.data, offset)?;
        let header = &self.data[offset..offset + count * CARD_SIZE];
        let data_len = data_byte_len(header, offset == 0)?;
        checked_padded_byte_len(data_len)
            .and_then(|padded| offset.checked_add(header_len)?.checked_add(padded))
            .ok_or_else(|| Error::bad_format("data size overflow"))
    }

    fn cursor(&self) -> Result<Cursor> {
        self.cursor
            .ok_or_else(|| Error::bad_format("no header selected; call move_to_extension first"))
    }
}

impl HeaderSource for HeaderBuffer {
    fn move_to_extension(&mut self, index: usize) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::bad_format("empty FITS stream"));
        }

        let mut offset = 0;
        for hdu in 0..=index {
            if offset >= self.data.len() {
                return Err(Error::IllegalInput(format!(
                    "extension {index} does not exist; the stream has {hdu} HDUs"
                )));
            }
            if hdu == index {
                break;
            }
            offset = self.next_hdu(offset)?;
        }

        let (count, _) = locate_end(&self.data, offset)?;
        debug!(extension = index, offset, cards = count, "selected header");
        self.cursor = Some(Cursor {
            start: offset,
            count,
            next: 0,
        });
        Ok(())
    }

    fn card_count(&self) -> Result<usize> {
        let cursor = self.cursor()?;
        Ok(cursor.count - cursor.next)
    }

    fn next_card(&mut self) -> Result<[u8; CARD_SIZE]> {
        let mut cursor = self.cursor()?;
        if cursor.next >= cursor.count {
            return Err(Error::bad_format(format!(
                "read past the last of {} header cards",
                cursor.count
            )));
        }
        let at = cursor.start + cursor.next * CARD_SIZE;
        let mut card = [b' '; CARD_SIZE];
        card.copy_from_slice(&self.data[at..at + CARD_SIZE]);
        cursor.next += 1;
        self.cursor = Some(cursor);
        Ok(card)
    }
}

/// Find the `END` card of the header at `offset`, scanning whole blocks.
/// Returns the number of cards before `END` and the padded header length.
fn locate_end(data: &[u8], offset: usize) -> Result<(usize, usize)> {
    let mut block = offset;
    while block + BLOCK_SIZE <= data.len() {
        for (i, card) in data[block..block + BLOCK_SIZE].chunks_exact(CARD_SIZE).enumerate() {
            if &card[..KEYWORD_LEN] == b"END     " {
                let count = (block - offset) / CARD_SIZE + i;
                return Ok((count, padded_byte_len((count + 1) * CARD_SIZE)));
            }
        }
        block += BLOCK_SIZE;
    }
    Err(Error::bad_format(format!(
        "header at byte {offset} has no END card in a complete block"
    )))
}

fn header_value(header: &[u8], keyword: &str) -> Option<CardValue> {
    header.chunks_exact(CARD_SIZE).find_map(|card| {
        let (key, key_end) = parse_key(card)?;
        if key != keyword.as_bytes() {
            return None;
        }
        parse_value(card, keyword, key_end, 0).ok().map(|(value, _)| value)
    })
}

fn header_integer(header: &[u8], keyword: &str) -> Option<i64> {
    match header_value(header, keyword) {
        Some(CardValue::Integer(n)) => Some(n),
        _ => None,
    }
}

fn header_logical(header: &[u8], keyword: &str) -> Option<bool> {
    match header_value(header, keyword) {
        Some(CardValue::Logical(b)) => Some(b),
        _ => None,
    }
}

fn required_size(header: &[u8], keyword: &str) -> Result<usize> {
    let value = header_integer(header, keyword)
        .ok_or_else(|| Error::bad_format(format!("missing or non-integer {keyword}")))?;
    usize::try_from(value).map_err(|_| Error::bad_format(format!("negative {keyword}: {value}")))
}

fn optional_size(header: &[u8], keyword: &str, default: usize) -> Result<usize> {
    match header_integer(header, keyword) {
        Some(value) => usize::try_from(value)
            .map_err(|_| Error::bad_format(format!("negative {keyword}: {value}"))),
        None => Ok(default),
    }
}

/// Size in bytes of the data unit described by `header`, before padding.
fn data_byte_len(header: &[u8], is_primary: bool) -> Result<usize> {
    let overflow = || Error::bad_format("data size overflow");

    let bitpix =
        header_integer(header, "BITPIX").ok_or_else(|| Error::bad_format("missing BITPIX"))?;
    let naxis = required_size(header, "NAXIS")?;
    if naxis == 0 {
        return Ok(0);
    }

    let bytes_per_value = (bitpix.unsigned_abs() as usize) / 8;

    let mut dims = Vec::with_capacity(naxis);
    for i in 1..=naxis {
        dims.push(required_size(header, &format!("NAXIS{i}"))?);
    }

    // Random groups: primary HDU with NAXIS1=0 and GROUPS=T
    if is_primary && dims[0] == 0 && header_logical(header, "GROUPS") == Some(true) {
        let pcount = required_size(header, "PCOUNT")?;
        let gcount = required_size(header, "GCOUNT")?;
        let product = dims[1..]
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(overflow)?;
        return pcount
            .checked_add(product)
            .and_then(|group| group.checked_mul(gcount))
            .and_then(|values| values.checked_mul(bytes_per_value))
            .ok_or_else(overflow);
    }

    let total_values = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(overflow)?;

    let (pcount, gcount) = if is_primary {
        (0, 1)
    } else {
        let gcount = optional_size(header, "GCOUNT", 1)?;
        (optional_size(header, "PCOUNT", 0)?, gcount.max(1))
    };

    total_values
        .checked_mul(bytes_per_value)
        .and_then(|bytes| bytes.checked_add(pcount))
        .and_then(|bytes| bytes.checked_mul(gcount))
        .ok_or_else(overflow)
}
