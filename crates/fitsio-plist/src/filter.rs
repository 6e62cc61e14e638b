//! Key-name predicates used to select cards on load and to exclude
//! properties on serialize.

use regex::Regex;

use crate::error::{Error, Result};

/// A predicate over key names.
///
/// The loader keeps a card when [`Filter::matches`] is true; the serializer
/// skips a property when it is true.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Unanchored regular-expression search on the key.
    Regex { regex: Regex, invert: bool },
    /// Prefix keys and exact keys.
    Keys {
        prefixes: Vec<String>,
        exact: Vec<String>,
        invert: bool,
    },
}

impl Filter {
    /// Compile `pattern` into a regex filter.
    ///
    /// An empty pattern or one that fails to compile is [`Error::IllegalInput`].
    pub fn regex(pattern: &str, invert: bool) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::IllegalInput(String::from("empty regular expression")));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| Error::IllegalInput(format!("invalid regular expression: {e}")))?;
        Ok(Filter::Regex { regex, invert })
    }

    /// Build a filter matching keys that start with any of `prefixes` or equal
    /// any of `exact`.
    pub fn keys<P, E>(prefixes: P, exact: E, invert: bool) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Filter::Keys {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            exact: exact.into_iter().map(Into::into).collect(),
            invert,
        }
    }

    /// Convenience for an exact-key set.
    pub fn exact<E>(exact: E, invert: bool) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Filter::keys(core::iter::empty::<String>(), exact, invert)
    }

    /// Returns the final inclusion decision for `key`, after inversion.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Filter::Regex { regex, invert } => regex.is_match(key) != *invert,
            Filter::Keys {
                prefixes,
                exact,
                invert,
            } => {
                let hit = prefixes.iter().any(|p| key.starts_with(p.as_str()))
                    || exact.iter().any(|e| e == key);
                hit != *invert
            }
        }
    }
}
