/*!

Rule grammars let a cell mention only part of its content, as in `<k> X => Y ...</k>`. This module rewrites every
production tagged `cell` into that tolerant form:

```txt
KCell ::= "<k>" K "</k>"                              [cell]
  becomes
KCell ::= "<k>" #OptionalDots K #OptionalDots "</k>"  [cell]
Cell  ::= KCell
```

The body between the optional dots is the sole content item for a *leaf* cell and the generic `Bag` sort for a
*composite* cell, one whose content is other cells. Productions tagged `cellFragment` are kept as they are and only
receive the `Cell` bridge.

A cell production must begin and end with terminals; anything else is a `GrammarError::MalformedCell`.

*/

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::{
  abstractions::{CompactIntSet, HashMap},
  core::{
    error::GrammarError,
    production::{Production, ProductionItem},
    sentence::{productions, Sentence},
    sort::{Sort, SortTable},
  },
  error,
  grammar::config::GrammarConfig,
  trace,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CellKind {
  /// Holds a single non-cell value.
  Leaf,
  /// Holds a bag of other cells.
  Composite,
}

impl Display for CellKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      CellKind::Leaf      => write!(f, "leaf"),
      CellKind::Composite => write!(f, "composite"),
    }
  }
}

/// The items strictly between a cell's brackets.
fn cell_content(production: &Production) -> &[ProductionItem] {
  match production.items.len() {
    0..=2 => &[],
    n     => &production.items[1..n - 1],
  }
}

/// Classification of the cell sorts of one module.
#[derive(Clone, Debug)]
pub struct ConfigurationInfo {
  kinds: HashMap<Sort, CellKind>,
}

impl ConfigurationInfo {
  /// Classifies the cells declared in `sentences`. Returns `None` if no production is tagged `cell`, in which case
  /// there is no configuration to rewrite against.
  pub fn from_sentences<'a>(
    config   : &GrammarConfig,
    sentences: impl IntoIterator<Item = &'a Sentence>,
  ) -> Option<ConfigurationInfo>
  {
    let cell_productions: Vec<&Production> =
        productions(sentences)
            .filter(|production| production.has_attribute(&config.attributes.cell))
            .collect();
    if cell_productions.is_empty() {
      return None;
    }

    // Any of these sorts appearing as content makes a cell composite.
    let mut table = SortTable::new();
    let mut containers: CompactIntSet = table.intern_all(cell_productions.iter().map(|p| &p.sort));
    containers.union_in_place(&table.intern_all([&config.sorts.bag, &config.sorts.cell]));

    let mut kinds: HashMap<Sort, CellKind> = HashMap::default();
    for production in cell_productions {
      let content      = cell_content(production);
      let content_sorts: CompactIntSet = table.set_of(content.iter().filter_map(ProductionItem::sort));
      let kind =
          if content.len() == 1 && !containers.intersects(&content_sorts) {
            CellKind::Leaf
          } else {
            CellKind::Composite
          };

      // A sort declared by several cell productions is composite if any of them is.
      kinds.entry(production.sort.clone())
           .and_modify(|existing| if kind == CellKind::Composite { *existing = kind })
           .or_insert(kind);
    }

    Some(ConfigurationInfo { kinds })
  }

  pub fn kind(&self, sort: &Sort) -> Option<CellKind> {
    self.kinds.get(sort).copied()
  }

  #[inline(always)]
  pub fn is_leaf_cell(&self, sort: &Sort) -> bool {
    self.kind(sort) == Some(CellKind::Leaf)
  }

  pub fn cell_sorts(&self) -> BTreeSet<&Sort> {
    self.kinds.keys().collect()
  }
}


pub struct CellBracketRewriter<'c> {
  config: &'c GrammarConfig,
  info  : &'c ConfigurationInfo,
}

impl<'c> CellBracketRewriter<'c> {
  pub fn new(config: &'c GrammarConfig, info: &'c ConfigurationInfo) -> Self {
    CellBracketRewriter { config, info }
  }

  /// `Cell ::= sort`
  fn bridge(&self, sort: &Sort) -> Sentence {
    Production::injection(self.config.sorts.cell.clone(), sort.clone()).into()
  }

  /// The sentences that replace `sentence` in the rule grammar.
  pub fn rewrite(&self, sentence: &Sentence) -> Result<Vec<Sentence>, GrammarError> {
    let production = match sentence {
      Sentence::Production(production) => production,
      Sentence::SyntaxSort(_)          => return Ok(vec![sentence.clone()]),
    };
    let keys = &self.config.attributes;

    if production.has_attribute(&keys.cell) {
      let (first, last) = match (production.items.first(), production.items.last()) {
        (Some(first), Some(last)) if production.items.len() >= 2 && first.is_terminal() && last.is_terminal() => {
          (first, last)
        }
        _ => {
          let error = GrammarError::MalformedCell {
            sort      : production.sort.clone(),
            production: production.to_string(),
            location  : production.location.clone(),
          };
          error!(0, "{}", error);
          return Err(error);
        }
      };

      let body = match (self.info.kind(&production.sort), cell_content(production)) {
        (Some(CellKind::Leaf), [content]) => content.clone(),
        _                                 => ProductionItem::NonTerminal(self.config.sorts.bag.clone()),
      };
      let dots = ProductionItem::NonTerminal(self.config.sorts.optional_dots.clone());

      let rewritten = Production {
        items: vec![first.clone(), dots.clone(), body, dots, last.clone()],
        ..production.clone()
      };
      trace!(4, "rewrote cell {} to {}", production.sort, rewritten);

      Ok(vec![rewritten.into(), self.bridge(&production.sort)])
    } else if production.has_attribute(&keys.cell_fragment) {
      Ok(vec![sentence.clone(), self.bridge(&production.sort)])
    } else {
      Ok(vec![sentence.clone()])
    }
  }

  /// Rewrites every sentence of `sentences`. The first malformed cell aborts the rewrite.
  pub fn apply(&self, sentences: &BTreeSet<Sentence>) -> Result<BTreeSet<Sentence>, GrammarError> {
    let mut rewritten = BTreeSet::new();
    for sentence in sentences.iter() {
      rewritten.extend(self.rewrite(sentence)?);
    }
    Ok(rewritten)
  }
}
