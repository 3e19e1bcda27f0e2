/*!

A `Sort` is a named syntactic category. Sorts are immutable values compared by name; two `Sort` values with the same
name are the same sort.

*/

use std::fmt::Display;

use crate::abstractions::IString;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Debug)]
pub struct Sort {
  pub name: IString,
}

impl Sort {
  pub fn new(name: impl Into<IString>) -> Sort {
    Sort{
      name: name.into(),
    }
  }

  #[inline(always)]
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Whether the name of this sort begins with `marker`.
  #[inline(always)]
  pub fn has_prefix(&self, marker: char) -> bool {
    self.name.starts_with(marker)
  }
}

impl From<&str> for Sort {
  fn from(name: &str) -> Self {
    Sort::new(name)
  }
}

impl Display for Sort {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)
  }
}
