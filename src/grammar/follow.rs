/*!

Automatic follow restrictions. When one terminal is a proper prefix of another, say `==` and `==K`, the tokenizer can
split `==K` as `==` followed by `K`. The fix is to forbid the shorter terminal from being immediately followed by the
rest of the longer one: `"=="(?!"K")`.

The vocabulary is every nonblank terminal of the productions visible from the module being rewritten, so it has to be
rebuilt for each module. Productions of internal `#` sorts neither contribute terminals nor get restricted.

*/

use std::collections::BTreeSet;

use crate::{
  abstractions::{CompactIntSet, IString},
  core::{
    module::Module,
    production::{Production, ProductionItem},
    sentence::Sentence,
  },
  grammar::config::GrammarConfig,
  trace,
};

/// Sorted, deduplicated terminal vocabulary. All terminals extending a given prefix are contiguous in sorted order.
pub struct TerminalIndex {
  terminals: Vec<IString>,
}

impl TerminalIndex {
  pub fn new(terminals: impl IntoIterator<Item = IString>) -> Self {
    let mut terminals: Vec<IString> =
        terminals.into_iter()
                 .filter(|terminal| !terminal.trim().is_empty())
                 .collect();
    terminals.sort_unstable_by(|a, b| (**a).cmp(&**b));
    terminals.dedup();
    TerminalIndex { terminals }
  }

  /// Builds the vocabulary of `productions`, skipping productions of internal sorts.
  pub fn from_productions<'a>(
    config     : &GrammarConfig,
    productions: impl IntoIterator<Item = &'a Production>,
  ) -> Self
  {
    TerminalIndex::new(
      productions.into_iter()
                 .filter(|production| !config.is_internal(&production.sort))
                 .flat_map(|production| production.terminals().cloned())
    )
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.terminals.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.terminals.is_empty()
  }

  /// Indices of the terminals that have `prefix` as a proper prefix.
  pub fn extensions(&self, prefix: &str) -> CompactIntSet {
    let start = self.terminals.partition_point(|terminal| &**terminal < prefix);
    self.terminals[start..]
        .iter()
        .take_while(|terminal| terminal.starts_with(prefix))
        .enumerate()
        .filter(|(_, terminal)| terminal.len() > prefix.len())
        .map(|(offset, _)| start + offset)
        .collect()
  }

  /// The forbidden suffixes for `terminal`: what remains of each longer terminal after removing `terminal`.
  pub fn follow_set(&self, terminal: &str) -> BTreeSet<IString> {
    if terminal.trim().is_empty() {
      return BTreeSet::new();
    }
    self.extensions(terminal)
        .iter()
        .map(|index| IString::from(&self.terminals[index][terminal.len()..]))
        .collect()
  }
}


pub struct FollowRestrictionDisambiguator<'c> {
  config: &'c GrammarConfig,
  index : TerminalIndex,
}

impl<'c> FollowRestrictionDisambiguator<'c> {
  pub fn new(config: &'c GrammarConfig, index: TerminalIndex) -> Self {
    FollowRestrictionDisambiguator { config, index }
  }

  pub fn index(&self) -> &TerminalIndex {
    &self.index
  }

  /// Adds follow restrictions to the terminals of `production`. Existing restrictions are kept.
  pub fn restrict(&self, production: &Production) -> Production {
    if self.config.is_internal(&production.sort) {
      return production.clone();
    }

    let items = production.items.iter().map(|item| {
      match item {

        ProductionItem::Terminal { value, follow } => {
          let forbidden = self.index.follow_set(value);
          if forbidden.is_empty() {
            return item.clone();
          }
          trace!(4, "terminal {:?} may not be followed by {:?}", &**value, forbidden);
          ProductionItem::Terminal {
            value : value.clone(),
            follow: follow.union(&forbidden).cloned().collect(),
          }
        }

        ProductionItem::NonTerminal(_) => item.clone(),

      }
    }).collect();

    Production { items, ..production.clone() }
  }

  pub fn apply(&self, sentences: &BTreeSet<Sentence>) -> BTreeSet<Sentence> {
    sentences.iter()
             .map(|sentence| {
               match sentence {
                 Sentence::Production(production) => Sentence::Production(self.restrict(production)),
                 Sentence::SyntaxSort(_)          => sentence.clone(),
               }
             })
             .collect()
  }

  /// A copy of `module` with every production restricted, or `None` if no terminal of `module` gains a restriction.
  pub fn restrict_module(&self, module: &Module) -> Option<Module> {
    let sentences = self.apply(&module.sentences);
    if sentences == module.sentences {
      return None;
    }
    Some(Module {
      name      : module.name.clone(),
      imports   : module.imports.clone(),
      sentences,
      attributes: module.attributes.clone(),
    })
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  fn binary(sort: &str, operator: &str) -> Production {
    Production::new(
      sort,
      vec![
        ProductionItem::non_terminal(sort),
        ProductionItem::terminal(operator),
        ProductionItem::non_terminal(sort),
      ],
    )
  }

  fn strings(set: &BTreeSet<IString>) -> Vec<&str> {
    set.iter().map(|s| &**s).collect()
  }

  #[test]
  fn extensions_are_proper() {
    let index = TerminalIndex::new(["==", "==K", "=/=", "=", "==", " ", "<"].map(IString::from));
    assert_eq!(index.len(), 5);
    assert_eq!(strings(&index.follow_set("=")), vec!["/=", "=", "=K"]);
    assert_eq!(strings(&index.follow_set("==")), vec!["K"]);
    assert!(index.follow_set("==K").is_empty());
    assert!(index.follow_set("").is_empty());
    assert!(index.follow_set(">").is_empty());
  }

  #[test]
  fn prefix_terminals_are_restricted() {
    let config = GrammarConfig::default();
    let productions = vec![
      binary("Exp", "=="),
      binary("K", "==K"),
      binary("Exp", "<"),
      binary("Exp", "<="),
      // Internal sorts are neither vocabulary nor rewritten.
      binary("#Internal", "<=>"),
    ];
    let disambiguator =
        FollowRestrictionDisambiguator::new(&config, TerminalIndex::from_productions(&config, productions.iter()));

    assert_eq!(disambiguator.restrict(&productions[0]).to_string(), r#"Exp ::= Exp "=="(?!"K") Exp"#);
    assert_eq!(disambiguator.restrict(&productions[1]).to_string(), r#"K ::= K "==K" K"#);
    assert_eq!(disambiguator.restrict(&productions[2]).to_string(), r#"Exp ::= Exp "<"(?!"=") Exp"#);
    assert_eq!(disambiguator.restrict(&productions[4]), productions[4]);
  }

  #[test]
  fn existing_restrictions_are_kept() {
    let config = GrammarConfig::default();
    let production = Production::new(
      "Exp",
      vec![ProductionItem::Terminal {
        value : "-".into(),
        follow: [IString::from(">")].into_iter().collect(),
      }],
    );
    let index = TerminalIndex::new(["-", "--"].map(IString::from));
    let restricted = FollowRestrictionDisambiguator::new(&config, index).restrict(&production);
    assert_eq!(restricted.to_string(), r#"Exp ::= "-"(?!"-"|">")"#);
  }

  #[test]
  fn every_prefix_pair_is_covered() {
    let config = GrammarConfig::default();
    let operators = ["+", "++", "+=", "+++", "-", "->", "-->", ":", "::", ":=", "::="];
    let productions: Vec<Production> = operators.iter().map(|op| binary("Exp", op)).collect();
    let disambiguator =
        FollowRestrictionDisambiguator::new(&config, TerminalIndex::from_productions(&config, productions.iter()));

    for short in operators.iter() {
      let restricted = disambiguator.restrict(&binary("Exp", short));
      let follow = match &restricted.items[1] {
        ProductionItem::Terminal { follow, .. } => follow.clone(),
        ProductionItem::NonTerminal(_)          => unreachable!(),
      };
      for long in operators.iter().filter(|long| long.len() > short.len() && long.starts_with(short)) {
        assert!(follow.contains(&IString::from(&long[short.len()..])), "{} then {}", short, long);
      }
    }
  }

  #[test]
  fn unchanged_modules_are_not_copied() {
    let config = GrammarConfig::default();
    let index  = TerminalIndex::new([":K", ":KItem", "=="].map(IString::from));
    let disambiguator = FollowRestrictionDisambiguator::new(&config, index);

    let casts = Module::new("BASIC-K", [], [Sentence::from(binary("K", ":K"))]);
    let restricted = disambiguator.restrict_module(&casts).unwrap();
    assert_eq!(restricted.name, casts.name);
    assert_eq!(restricted.sentences.len(), 1);
    assert!(restricted.productions().all(|p| p.to_string() == r#"K ::= K ":K"(?!"Item") K"#));

    let plain = Module::new("PLAIN", [], [Sentence::from(binary("Exp", "=="))]);
    assert!(disambiguator.restrict_module(&plain).is_none());
  }
}
