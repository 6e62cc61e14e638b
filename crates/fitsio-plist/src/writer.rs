//! In-memory [`HeaderSink`] producing 80-byte card images.

use crate::block::{make_card, pad_header, CARD_SIZE, KEYWORD_LEN};
use crate::card::key::{is_standard_keyword, parse_key, HIERARCH_PREFIX};
use crate::error::{Error, Result};
use crate::source::{Commentary, HeaderSink, KeyMode};

/// Significant digits written for single precision values.
pub const FLOAT_PRECISION: usize = 7;

/// Significant digits written for double precision values.
pub const DOUBLE_PRECISION: usize = 15;

/// Keyword of the long-string announcement card.
pub const LONGSTRN: &str = "LONGSTRN";

/// Width of the fixed-format value field (columns 11-30).
const VALUE_FIELD: usize = 20;

/// Columns 9-80 of a commentary card, minus the separating space.
const COMMENTARY_TEXT: usize = CARD_SIZE - KEYWORD_LEN - 1;

const CONTINUE_PREFIX: &[u8; 10] = b"CONTINUE  ";

const LONGSTRN_COMMENTS: [&str; 4] = [
    "  This FITS file may contain long string keyword values that are",
    "  continued over multiple keywords.  The HEASARC convention uses the &",
    "  character at the end of each substring which is then continued",
    "  on the next keyword which has the name CONTINUE.",
];

/// Collects header cards in order.
///
/// [`KeyMode::Write`] appends. [`KeyMode::Update`] replaces the first card
/// with the same key, together with its `CONTINUE` cards, or appends.
#[derive(Debug, Clone, Default)]
pub struct CardWriter {
    cards: Vec<[u8; CARD_SIZE]>,
}

impl CardWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[[u8; CARD_SIZE]] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<[u8; CARD_SIZE]> {
        self.cards
    }

    /// Serialize the cards, an `END` card and blank padding into whole
    /// 2880-byte header blocks.
    pub fn into_header_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.cards.len() + 1) * CARD_SIZE);
        for card in &self.cards {
            bytes.extend_from_slice(card);
        }
        bytes.extend_from_slice(&make_card("END"));
        pad_header(&bytes)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|card| {
            let keyed = card[KEYWORD_LEN] == b'=' || card.starts_with(HIERARCH_PREFIX);
            keyed && parse_key(card).is_some_and(|(key, _)| key == name.as_bytes())
        })
    }

    fn emit(&mut self, mode: KeyMode, name: &str, new_cards: Vec<[u8; CARD_SIZE]>) {
        let existing = match mode {
            KeyMode::Write => None,
            KeyMode::Update => self.position(name),
        };
        match existing {
            Some(start) => {
                let mut end = start + 1;
                while end < self.cards.len() && self.cards[end].starts_with(CONTINUE_PREFIX) {
                    end += 1;
                }
                self.cards.splice(start..end, new_cards);
            }
            None => self.cards.extend(new_cards),
        }
    }
}

impl HeaderSink for CardWriter {
    fn put_logical(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: bool,
        comment: Option<&str>,
    ) -> Result<()> {
        let card = value_card(name, if value { "T" } else { "F" }, true, comment)?;
        self.emit(mode, name, vec![card]);
        Ok(())
    }

    fn put_integer(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: i64,
        comment: Option<&str>,
    ) -> Result<()> {
        let card = value_card(name, &value.to_string(), true, comment)?;
        self.emit(mode, name, vec![card]);
        Ok(())
    }

    fn put_float(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: f64,
        precision: usize,
        comment: Option<&str>,
    ) -> Result<()> {
        let text = format_float(name, value, precision)?;
        let card = value_card(name, &text, true, comment)?;
        self.emit(mode, name, vec![card]);
        Ok(())
    }

    fn put_string(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        if !string_fits(name, value) {
            return Err(Error::IllegalInput(format!(
                "string value of '{name}' does not fit in one card"
            )));
        }
        check_printable(name, "string value", value)?;
        let card = value_card(name, &quote(value, true), false, comment)?;
        self.emit(mode, name, vec![card]);
        Ok(())
    }

    fn put_complex(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: (f64, f64),
        precision: usize,
        comment: Option<&str>,
    ) -> Result<()> {
        let text = format!(
            "({}, {})",
            format_float(name, value.0, precision)?,
            format_float(name, value.1, precision)?
        );
        let card = value_card(name, &text, true, comment)?;
        self.emit(mode, name, vec![card]);
        Ok(())
    }

    fn put_long_string(
        &mut self,
        mode: KeyMode,
        name: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        let cards = long_string_cards(name, value, comment)?;
        self.emit(mode, name, cards);
        Ok(())
    }

    fn put_long_string_warning(&mut self) -> Result<()> {
        if self.position(LONGSTRN).is_some() {
            return Ok(());
        }
        let card = value_card(
            LONGSTRN,
            &quote("OGIP 1.0", true),
            false,
            Some("The OGIP Long String Convention may be used."),
        )?;
        self.cards.push(card);
        for line in LONGSTRN_COMMENTS {
            self.put_commentary(Commentary::Comment, line)?;
        }
        Ok(())
    }

    fn put_commentary(&mut self, keyword: Commentary, text: &str) -> Result<()> {
        let key = match keyword {
            Commentary::Comment => "COMMENT",
            Commentary::History => "HISTORY",
            Commentary::Blank => "",
        };
        check_printable(key, "commentary text", text)?;
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            self.cards.push(make_card(key));
            return Ok(());
        }
        for chunk in bytes.chunks(COMMENTARY_TEXT) {
            let mut card = make_card(key);
            card[KEYWORD_LEN + 1..KEYWORD_LEN + 1 + chunk.len()].copy_from_slice(chunk);
            self.cards.push(card);
        }
        Ok(())
    }
}

/// Returns `true` if the quoted string fits on the first card of `name`.
pub fn string_fits(name: &str, value: &str) -> bool {
    let head = if is_standard_keyword(name) {
        KEYWORD_LEN + 2
    } else {
        HIERARCH_PREFIX.len() + name.len() + 3
    };
    head + 2 + encoded_len(value) <= CARD_SIZE
}

fn encoded_len(value: &str) -> usize {
    value.len() + value.bytes().filter(|&b| b == b'\'').count()
}

/// Columns up to and including the value indicator and its trailing space.
fn keyword_field(name: &str) -> Result<Vec<u8>> {
    if is_standard_keyword(name) {
        let mut field = format!("{name:<width$}", width = KEYWORD_LEN).into_bytes();
        field.extend_from_slice(b"= ");
        return Ok(field);
    }
    if name.trim().is_empty() || !is_printable(name) || name.contains('=') {
        return Err(Error::IllegalInput(format!("'{name}' is not a valid keyword")));
    }
    let mut field = HIERARCH_PREFIX.to_vec();
    field.extend_from_slice(name.as_bytes());
    field.extend_from_slice(b" = ");
    Ok(field)
}

/// Build one card. Fixed-format values on standard keywords end in column 30.
fn value_card(
    name: &str,
    value: &str,
    right_justify: bool,
    comment: Option<&str>,
) -> Result<[u8; CARD_SIZE]> {
    let mut text = keyword_field(name)?;
    if right_justify && is_standard_keyword(name) && value.len() < VALUE_FIELD {
        text.resize(text.len() + VALUE_FIELD - value.len(), b' ');
    }
    text.extend_from_slice(value.as_bytes());
    if text.len() > CARD_SIZE {
        return Err(Error::IllegalInput(format!(
            "value of '{name}' does not fit in one card"
        )));
    }
    append_comment(name, &mut text, comment)?;
    Ok(to_card(&text))
}

fn is_printable(text: &str) -> bool {
    text.bytes().all(|b| (0x20..0x7f).contains(&b))
}

/// Card text is restricted to printable ASCII.
fn check_printable(name: &str, what: &str, text: &str) -> Result<()> {
    match text.bytes().position(|b| !(0x20..0x7f).contains(&b)) {
        None => Ok(()),
        Some(at) => Err(Error::IllegalInput(format!(
            "{what} of '{name}' has a byte outside printable ASCII at offset {at}"
        ))),
    }
}

/// Returns `true` if ` / comment` fits after `used` bytes of card text.
fn comment_fits(used: usize, comment: &str) -> bool {
    used + 3 + comment.len() <= CARD_SIZE
}

/// Append ` / comment`. A comment is never truncated.
fn append_comment(name: &str, text: &mut Vec<u8>, comment: Option<&str>) -> Result<()> {
    let Some(comment) = comment else {
        return Ok(());
    };
    check_printable(name, "comment", comment)?;
    if !comment_fits(text.len(), comment) {
        return Err(Error::IllegalInput(format!(
            "comment of '{name}' does not fit on the card"
        )));
    }
    text.extend_from_slice(b" / ");
    text.extend_from_slice(comment.as_bytes());
    Ok(())
}

fn to_card(text: &[u8]) -> [u8; CARD_SIZE] {
    let mut card = [b' '; CARD_SIZE];
    let len = text.len().min(CARD_SIZE);
    card[..len].copy_from_slice(&text[..len]);
    card
}

/// Quote `value`, doubling embedded quotes. Standalone strings are padded
/// to at least 8 characters between the quotes.
fn quote(value: &str, pad: bool) -> String {
    let mut out = String::with_capacity(encoded_len(value) + 2);
    out.push('\'');
    out.push_str(&value.replace('\'', "''"));
    if pad {
        while out.len() < 9 {
            out.push(' ');
        }
    }
    out.push('\'');
    out
}

/// Split a string over `&`-terminated fragments on `CONTINUE` cards.
///
/// The comment goes on the last card, or on an extra `CONTINUE ''` card
/// when the last fragment leaves no room for it.
fn long_string_cards(
    name: &str,
    value: &str,
    comment: Option<&str>,
) -> Result<Vec<[u8; CARD_SIZE]>> {
    check_printable(name, "string value", value)?;
    let head = keyword_field(name)?;
    // Quotes and the `&` marker.
    let overhead = 3;
    if head.len() + overhead >= CARD_SIZE {
        return Err(Error::IllegalInput(format!(
            "keyword '{name}' leaves no room for a value"
        )));
    }

    let mut fragments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    let mut room = CARD_SIZE - head.len() - overhead;
    for ch in value.chars() {
        let width = if ch == '\'' { 2 } else { 1 };
        if used + width > room {
            fragments.push(core::mem::take(&mut current));
            used = 0;
            room = CARD_SIZE - CONTINUE_PREFIX.len() - overhead;
        }
        current.push(ch);
        used += width;
    }
    fragments.push(current);
    if let Some(comment) = comment {
        let used = match fragments.as_slice() {
            [only] => head.len() + 2 + encoded_len(only),
            [.., last] => CONTINUE_PREFIX.len() + 2 + encoded_len(last),
            [] => 0,
        };
        if !comment_fits(used, comment) {
            fragments.push(String::new());
        }
    }

    let last = fragments.len() - 1;
    let mut cards = Vec::with_capacity(fragments.len());
    for (i, fragment) in fragments.iter().enumerate() {
        let mut text = if i == 0 {
            head.clone()
        } else {
            CONTINUE_PREFIX.to_vec()
        };
        let mut quoted = fragment.replace('\'', "''");
        if i != last {
            quoted.push('&');
        }
        text.push(b'\'');
        text.extend_from_slice(quoted.as_bytes());
        text.push(b'\'');
        if i == last {
            append_comment(name, &mut text, comment)?;
        }
        cards.push(to_card(&text));
    }
    Ok(cards)
}

/// Format `value` like C's `%.{precision}G`, always keeping a decimal point
/// so the value reads back as floating point.
pub fn format_float(name: &str, value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::IllegalInput(format!(
            "non-finite value {value} for '{name}'"
        )));
    }
    if value == 0.0 {
        return Ok(String::from("0.0"));
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*E}", precision - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('E')
        .ok_or_else(|| Error::IllegalInput(format!("cannot format {value} for '{name}'")))?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| Error::IllegalInput(format!("cannot format {value} for '{name}'")))?;

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = with_decimal_point(trim_fraction(mantissa));
        let sign = if exponent < 0 { '-' } else { '+' };
        return Ok(format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs()));
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    let fixed = format!("{value:.decimals$}");
    Ok(with_decimal_point(trim_fraction(&fixed)))
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0')
    } else {
        text
    }
}

fn with_decimal_point(text: &str) -> String {
    if text.ends_with('.') {
        format!("{text}0")
    } else if text.contains('.') {
        text.to_string()
    } else {
        format!("{text}.0")
    }
}
