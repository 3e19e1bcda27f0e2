/*!

A `Sentence` is one declaration local to a module. The variants are matched exhaustively wherever a transform walks a
module, so adding a declaration kind forces every transform to decide what to do with it.

*/

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::core::{
  production::Production,
  sort::Sort,
};

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Sentence {
  /// A grammar rule.
  Production(Production),
  /// A bare sort declaration, `syntax Sort`.
  SyntaxSort(Sort),
}

impl Sentence {
  pub fn as_production(&self) -> Option<&Production> {
    match self {
      Sentence::Production(production) => Some(production),
      Sentence::SyntaxSort(_)          => None,
    }
  }

  /// The sort this sentence defines.
  pub fn defined_sort(&self) -> &Sort {
    match self {
      Sentence::Production(production) => &production.sort,
      Sentence::SyntaxSort(sort)       => sort,
    }
  }
}

impl From<Production> for Sentence {
  fn from(production: Production) -> Self {
    Sentence::Production(production)
  }
}

impl Display for Sentence {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Sentence::Production(production) => write!(f, "syntax {}", production),
      Sentence::SyntaxSort(sort)       => write!(f, "syntax {}", sort),
    }
  }
}

/// The sorts defined by a collection of sentences.
pub fn defined_sorts<'a>(sentences: impl IntoIterator<Item = &'a Sentence>) -> BTreeSet<Sort> {
  sentences.into_iter().map(|sentence| sentence.defined_sort().clone()).collect()
}

/// The productions among a collection of sentences.
pub fn productions<'a>(sentences: impl IntoIterator<Item = &'a Sentence>) -> impl Iterator<Item = &'a Production> {
  sentences.into_iter().filter_map(Sentence::as_production)
}
