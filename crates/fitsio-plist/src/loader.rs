//! Turns the raw cards of one HDU into a [`PropertyList`].

use tracing::{debug, trace};

use crate::card::comment::extract_comment;
use crate::card::key::parse_key;
use crate::card::value::{parse_continuation, parse_value, CardValue, Unparsable};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::list::PropertyList;
use crate::property::{Property, Value, COMMENT};
use crate::source::HeaderSource;

const CONTINUE: &str = "CONTINUE";

/// What a following `CONTINUE` card belongs to.
#[derive(Debug, Clone, Copy)]
enum Pending {
    None,
    /// The string property at this index ended with `&`.
    Appended(usize),
    /// The previous card was filtered out.
    Skipped,
}

/// Load the header of `extension` from `source`.
///
/// When `filter` is given, only cards whose key it matches are loaded. The
/// first malformed card aborts the load; no partial list is returned.
///
/// Cards with a blank keyword load under the name `COMMENT`. `HISTORY` cards
/// keep their own name so that [`serialize`](crate::serialize) writes them
/// back as history.
pub fn load<S>(source: &mut S, extension: usize, filter: Option<&Filter>) -> Result<PropertyList>
where
    S: HeaderSource + ?Sized,
{
    source.move_to_extension(extension)?;
    let count = source.card_count()?;
    if count == 0 {
        return Err(Error::DataNotFound(format!(
            "extension {extension} has no header cards"
        )));
    }
    debug!(extension, cards = count, "loading header");

    let mut list = PropertyList::with_capacity(count);
    let mut naxis = 0i64;
    let mut pending = Pending::None;

    for index in 0..count {
        let card = source.next_card()?;
        let (key, key_end) = parse_key(&card).ok_or_else(|| {
            Error::bad_format(format!(
                "card {index}: HIERARCH keyword without a value indicator"
            ))
        })?;
        let key = String::from_utf8_lossy(key).into_owned();

        if key == CONTINUE {
            match pending {
                Pending::Appended(at) => {
                    pending = merge_continuation(&mut list, at, &card, key_end, index)?;
                    continue;
                }
                Pending::Skipped => {
                    trace!(index, "continuation of a filtered card skipped");
                    continue;
                }
                Pending::None => {}
            }
        }
        pending = Pending::None;

        let blank = key.is_empty();
        let name = if blank { String::from(COMMENT) } else { key };

        if let Some(filter) = filter {
            if !filter.matches(&name) {
                trace!(index, key = %name, "card filtered out");
                pending = Pending::Skipped;
                continue;
            }
        }

        let (value, comment_at) = parse_value(&card, &name, key_end, naxis)
            .map_err(|err| unparsable(index, &name, err))?;
        let comment = extract_comment(&card, comment_at);
        if blank && comment.is_none() {
            trace!(index, "blank card skipped");
            continue;
        }

        let (value, comment) = match value {
            CardValue::Logical(b) => (Value::Bool(b), comment),
            CardValue::Integer(n) => {
                if name == "NAXIS" {
                    naxis = n;
                }
                let value = i32::try_from(n).map_or(Value::LongLong(n), Value::Int);
                (value, comment)
            }
            CardValue::Float(x) => (Value::Double(x), comment),
            CardValue::Complex(re, im) => (Value::DoubleComplex(re, im), comment),
            CardValue::String(s) => {
                if s.ends_with('&') {
                    pending = Pending::Appended(list.len());
                }
                (Value::String(s), comment)
            }
            CardValue::Undefined => (Value::String(String::new()), comment),
            CardValue::None => (Value::String(comment.unwrap_or_default()), None),
        };

        let mut property = Property::new(name, value)?;
        property.set_comment(comment);
        list.append(property);
    }

    debug!(extension, properties = list.len(), "header loaded");
    Ok(list)
}

/// Fold a `CONTINUE` card into the string property at `at`.
fn merge_continuation(
    list: &mut PropertyList,
    at: usize,
    card: &[u8],
    key_end: usize,
    index: usize,
) -> Result<Pending> {
    let (fragment, comment_at) =
        parse_continuation(card, key_end).map_err(|err| unparsable(index, CONTINUE, err))?;
    let property = list
        .get_mut(at)
        .ok_or_else(|| Error::bad_format(format!("card {index}: continued property is gone")))?;

    let mut value = property.as_str()?.to_string();
    value.pop();
    value.push_str(&fragment);
    let next = if value.ends_with('&') {
        Pending::Appended(at)
    } else {
        Pending::None
    };
    property.set_value(Value::String(value))?;
    if let Some(comment) = extract_comment(card, comment_at) {
        property.set_comment(Some(comment));
    }
    Ok(next)
}

fn unparsable(index: usize, key: &str, err: Unparsable) -> Error {
    let found = match err.byte {
        Some(b) if b.is_ascii_graphic() || b == b' ' => format!("'{}'", b as char),
        Some(b) => format!("byte 0x{b:02x}"),
        None => String::from("end of record"),
    };
    Error::bad_format(format!(
        "card {index} ('{key}'): unexpected {found} at column {}",
        err.offset + 1
    ))
}
