/*!

A `Production` is one grammar rule: a sort together with an ordered, nonempty sequence of items, each either a
terminal (literal token text) or a nonterminal (a reference to a sort). Productions are immutable values; transforms
build new productions rather than editing existing ones.

A terminal may carry a *follow restriction*, the set of strings that may not immediately follow it in the input. The
follow-restriction pass adds these to keep a short token from matching a prefix of a longer one.

*/

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::{
  abstractions::{IString, join_string},
  core::{
    attributes::Attributes,
    sort::Sort,
  },
};

/// Source provenance of a production, passed through from the front end for error reporting.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Location {
  pub source: IString,
  pub line  : u32,
  pub column: u32,
}

impl Display for Location {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}:{}", self.source, self.line, self.column)
  }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ProductionItem {
  Terminal {
    value : IString,
    follow: BTreeSet<IString>,
  },
  NonTerminal(Sort),
}

impl ProductionItem {
  pub fn terminal(value: impl Into<IString>) -> Self {
    ProductionItem::Terminal {
      value : value.into(),
      follow: BTreeSet::new(),
    }
  }

  pub fn non_terminal(sort: impl Into<Sort>) -> Self {
    ProductionItem::NonTerminal(sort.into())
  }

  #[inline(always)]
  pub fn is_terminal(&self) -> bool {
    matches!(self, ProductionItem::Terminal { .. })
  }

  /// The sort of a nonterminal item.
  pub fn sort(&self) -> Option<&Sort> {
    match self {
      ProductionItem::NonTerminal(sort) => Some(sort),
      ProductionItem::Terminal { .. }   => None,
    }
  }

  /// The text of a terminal item.
  pub fn terminal_text(&self) -> Option<&IString> {
    match self {
      ProductionItem::Terminal { value, .. } => Some(value),
      ProductionItem::NonTerminal(_)         => None,
    }
  }
}

impl From<Sort> for ProductionItem {
  fn from(sort: Sort) -> Self {
    ProductionItem::NonTerminal(sort)
  }
}

impl Display for ProductionItem {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      ProductionItem::Terminal { value, follow } => {
        write!(f, "{:?}", &**value)?;
        if !follow.is_empty() {
          let forbidden = follow.iter().map(|s| format!("{:?}", &**s));
          write!(f, "(?!{})", join_string(forbidden, "|"))?;
        }
        Ok(())
      }

      ProductionItem::NonTerminal(sort) => write!(f, "{}", sort),

    }
  }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Production {
  pub sort      : Sort,
  pub items     : Vec<ProductionItem>,
  pub label     : Option<IString>,
  pub attributes: Attributes,
  pub location  : Option<Location>,
}

impl Production {
  pub fn new(sort: impl Into<Sort>, items: Vec<ProductionItem>) -> Production {
    assert!(!items.is_empty(), "a production must have at least one item");
    Production {
      sort      : sort.into(),
      items,
      label     : None,
      attributes: Attributes::default(),
      location  : None,
    }
  }

  /// A production with a single nonterminal item, `sort ::= sub_sort`.
  pub fn injection(sort: impl Into<Sort>, sub_sort: impl Into<Sort>) -> Production {
    Production::new(sort, vec![ProductionItem::NonTerminal(sub_sort.into())])
  }

  pub fn with_label(mut self, label: impl Into<IString>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn with_attributes(mut self, attributes: Attributes) -> Self {
    self.attributes = attributes;
    self
  }

  pub fn with_location(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  /// Sorts referenced by nonterminal items, in item order.
  pub fn non_terminals(&self) -> impl Iterator<Item = &Sort> {
    self.items.iter().filter_map(ProductionItem::sort)
  }

  /// Text of terminal items, in item order.
  pub fn terminals(&self) -> impl Iterator<Item = &IString> {
    self.items.iter().filter_map(ProductionItem::terminal_text)
  }

  #[inline(always)]
  pub fn has_attribute(&self, key: &str) -> bool {
    self.attributes.contains(key)
  }
}

impl Display for Production {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ::= {}", self.sort, join_string(self.items.iter(), " "))?;

    let mut annotations = Vec::new();
    if let Some(label) = &self.label {
      annotations.push(format!("label({})", label));
    }
    if !self.attributes.is_empty() {
      annotations.push(self.attributes.to_string());
    }
    if !annotations.is_empty() {
      write!(f, " [{}]", annotations.join(", "))?;
    }
    Ok(())
  }
}
