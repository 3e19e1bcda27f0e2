/*!

Attributes attached to productions and modules. An attribute is either a bare flag (`cell`, `cellFragment`) or a key
with a text value (`sortKey(Exp)`, `userList(*)`). The map is ordered so that attributes take part in the ordering and
hashing of productions deterministically.

*/

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::abstractions::{IString, join_string};

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AttributeValue {
  Flag,
  Text(IString),
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Debug)]
pub struct Attributes {
  entries: BTreeMap<IString, AttributeValue>,
}

impl Attributes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a copy of `self` with the flag `key` set.
  pub fn with_flag(mut self, key: impl Into<IString>) -> Self {
    self.entries.insert(key.into(), AttributeValue::Flag);
    self
  }

  /// Returns a copy of `self` with `key` set to `value`, replacing any previous value.
  pub fn with(mut self, key: impl Into<IString>, value: impl Into<IString>) -> Self {
    self.entries.insert(key.into(), AttributeValue::Text(value.into()));
    self
  }

  /// Returns a copy of `self` without `key`.
  pub fn without(mut self, key: &str) -> Self {
    self.entries.remove(&IString::from(key));
    self
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entries.contains_key(&IString::from(key))
  }

  pub fn get(&self, key: &str) -> Option<&AttributeValue> {
    self.entries.get(&IString::from(key))
  }

  /// The text value of `key`, or `None` if the key is absent or is a flag.
  pub fn text(&self, key: &str) -> Option<&IString> {
    match self.get(key) {
      Some(AttributeValue::Text(value)) => Some(value),
      _ => None,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&IString, &AttributeValue)> {
    self.entries.iter()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

impl Display for Attributes {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let rendered = self.entries.iter().map(|(key, value)| {
      match value {
        AttributeValue::Flag        => key.to_string(),
        AttributeValue::Text(value) => format!("{}({})", key, value),
      }
    });
    write!(f, "{}", join_string(rendered, ", "))
  }
}
