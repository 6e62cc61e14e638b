//! Ordered, duplicate-tolerant property container.

use core::cmp::Ordering;
use core::fmt;

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::property::{Property, Value};

/// An ordered sequence of [`Property`] values.
///
/// Insertion order is preserved by every operation except [`PropertyList::sort_by`].
/// Names may repeat; lookups by name resolve to the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyList {
    properties: Vec<Property>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PropertyList {
            properties: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Returns the property at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Property> {
        self.properties.get_mut(index)
    }

    /// Index of the first property called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// First property called `name`.
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// Like [`PropertyList::find`], but a missing name is [`Error::DataNotFound`].
    pub fn property(&self, name: &str) -> Result<&Property> {
        self.find(name).ok_or_else(|| Error::not_found(name))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.property(name)?.as_bool()
    }

    pub fn get_char(&self, name: &str) -> Result<u8> {
        self.property(name)?.as_char()
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        self.property(name)?.as_int()
    }

    pub fn get_long(&self, name: &str) -> Result<i64> {
        self.property(name)?.as_long()
    }

    pub fn get_long_long(&self, name: &str) -> Result<i64> {
        self.property(name)?.as_long_long()
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        self.property(name)?.as_float()
    }

    pub fn get_double(&self, name: &str) -> Result<f64> {
        self.property(name)?.as_double()
    }

    pub fn get_string(&self, name: &str) -> Result<&str> {
        self.property(name)?.as_str()
    }

    pub fn get_double_complex(&self, name: &str) -> Result<(f64, f64)> {
        self.property(name)?.as_double_complex()
    }

    pub fn get_comment(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.property(name)?.comment())
    }

    pub fn append(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn prepend(&mut self, property: Property) {
        self.properties.insert(0, property);
    }

    /// Insert `property` before the first property called `anchor`.
    pub fn insert_before(&mut self, anchor: &str, property: Property) -> Result<()> {
        let index = self.position(anchor).ok_or_else(|| Error::not_found(anchor))?;
        self.properties.insert(index, property);
        Ok(())
    }

    /// Insert `property` after the first property called `anchor`.
    pub fn insert_after(&mut self, anchor: &str, property: Property) -> Result<()> {
        let index = self.position(anchor).ok_or_else(|| Error::not_found(anchor))?;
        self.properties.insert(index + 1, property);
        Ok(())
    }

    /// Set the value of the first property called `name`, or append a new one.
    ///
    /// An existing property of another type is left untouched and the call
    /// fails with [`Error::TypeMismatch`].
    pub fn update(&mut self, name: &str, value: Value) -> Result<()> {
        match self.find_mut(name) {
            Some(property) => property.set_value(value),
            None => {
                self.properties.push(Property::new(name, value)?);
                Ok(())
            }
        }
    }

    /// Replace the comment of the first property called `name`.
    pub fn set_comment(&mut self, name: &str, comment: Option<String>) -> Result<()> {
        let property = self.find_mut(name).ok_or_else(|| Error::not_found(name))?;
        property.set_comment(comment);
        Ok(())
    }

    /// Remove the first property called `name`. Returns whether one was removed.
    pub fn erase(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.properties.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every property whose name matches `pattern` (or does not, when
    /// `invert` is set). Returns the number removed.
    pub fn erase_regex(&mut self, pattern: &str, invert: bool) -> Result<usize> {
        let filter = Filter::regex(pattern, invert)?;
        let before = self.properties.len();
        self.properties.retain(|p| !filter.matches(p.name()));
        Ok(before - self.properties.len())
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Property) -> bool,
    {
        self.properties.retain(f);
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Append deep copies of every property of `other`.
    pub fn append_list(&mut self, other: &PropertyList) {
        self.properties.extend(other.properties.iter().cloned());
    }

    /// Copy the first property called `name` from `other`.
    ///
    /// If this list already holds `name`, its value and comment are replaced
    /// provided the types agree; otherwise a copy is appended.
    pub fn copy_property(&mut self, other: &PropertyList, name: &str) -> Result<()> {
        let source = other.property(name)?;
        match self.find_mut(name) {
            Some(target) => {
                target.set_value(source.value().clone())?;
                target.set_comment(source.comment().map(String::from));
            }
            None => self.properties.push(source.clone()),
        }
        Ok(())
    }

    /// Stable sort with an injected comparison.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Property, &Property) -> Ordering,
    {
        self.properties.sort_by(compare);
    }
}

impl fmt::Display for PropertyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for property in &self.properties {
            writeln!(f, "{property}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PropertyList {
    type Item = &'a Property;
    type IntoIter = core::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

impl IntoIterator for PropertyList {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

impl FromIterator<Property> for PropertyList {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        PropertyList {
            properties: iter.into_iter().collect(),
        }
    }
}

impl Extend<Property> for PropertyList {
    fn extend<I: IntoIterator<Item = Property>>(&mut self, iter: I) {
        self.properties.extend(iter);
    }
}
