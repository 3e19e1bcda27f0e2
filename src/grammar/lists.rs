/*!

User lists. The front end expands `syntax Exps ::= List{Exp, ","}` into a pair of productions tagged `userList`:

```txt
Exps ::= Exp "," Exps  [label(_,_), userList(*)]
Exps ::= ".Exps"       [label(.Exps), userList(*)]
```

The first is the *cons* production, the second the *terminator*. A `UserListSpec` is recovered from each such pair
and desugared in one of two forms.

The disambiguation form is the single injection `Exps ::= Exp`. The parse form is a right-recursive encoding through
two scaffolding sorts, which the parser handles far better than the sugar:

```txt
Exps#Terminator ::= ""                       [label(.Exps)]
Ne#Exps         ::= Exp "," Ne#Exps          [label(_,_)]
Ne#Exps         ::= Exp Exps#Terminator      [label(_,_)]
Exps            ::= Ne#Exps
Exps            ::= Exps#Terminator          (only if the list may be empty)
```

The sugar itself must not survive into a module that also holds the parse form, or every list would parse two ways.

*/

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  abstractions::IString,
  core::{
    attributes::Attributes,
    production::{Production, ProductionItem},
    sentence::{productions, Sentence},
    sort::Sort,
  },
  debug,
  grammar::config::GrammarConfig,
  warning,
};

/// One user list, recovered from its pair of `userList` productions.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UserListSpec {
  pub sort            : Sort,
  pub element         : Sort,
  pub separator       : IString,
  pub list_label      : IString,
  pub terminator_label: IString,
  pub non_empty       : bool,
  /// Attributes of the cons production without the `userList` marker.
  pub attributes      : Attributes,
  /// Display forms of the cons and terminator productions, kept as provenance.
  pub cons_production      : String,
  pub terminator_production: String,
}

impl UserListSpec {
  /// Recovers the user lists declared in `sentences`. Lists of reserved sorts are ignored, and a sort whose pair of
  /// productions is incomplete is skipped with a warning.
  pub fn collect<'a>(
    config   : &GrammarConfig,
    sentences: impl IntoIterator<Item = &'a Sentence>,
  ) -> Vec<UserListSpec>
  {
    let marker = &config.attributes.user_list;
    let mut by_sort: BTreeMap<&Sort, Vec<&Production>> = BTreeMap::new();
    for production in productions(sentences).filter(|p| p.has_attribute(marker)) {
      if !config.is_parser_sort(&production.sort) {
        by_sort.entry(&production.sort).or_default().push(production);
      }
    }

    let mut specs = Vec::with_capacity(by_sort.len());
    for (sort, declared) in by_sort {
      let cons = declared.iter().find(|p| {
        matches!(
          p.items.as_slice(),
          [ProductionItem::NonTerminal(_), ProductionItem::Terminal { .. }, ProductionItem::NonTerminal(tail)]
            if tail == sort
        )
      });
      let terminator = declared.iter().find(|p| p.items.len() == 1);

      let (cons, terminator) = match (cons, terminator) {
        (Some(cons), Some(terminator)) => (*cons, *terminator),
        _ => {
          warning!(1, "skipping user list {}: expected a cons and a terminator production, found {}", sort, declared.len());
          continue;
        }
      };

      let (element, separator) = match cons.items.as_slice() {
        [ProductionItem::NonTerminal(element), ProductionItem::Terminal { value, .. }, _] => {
          (element.clone(), value.clone())
        }
        _ => continue,
      };

      specs.push(UserListSpec {
        sort            : sort.clone(),
        element,
        list_label      : cons.label.clone().unwrap_or_else(|| IString::from(format!("_{}_", separator))),
        terminator_label: terminator.label.clone().unwrap_or_else(|| IString::from(format!(".{}", sort))),
        separator,
        non_empty       : cons.attributes.text(marker).is_some_and(|kind| &**kind == "+"),
        attributes      : cons.attributes.clone().without(marker),
        cons_production      : cons.to_string(),
        terminator_production: terminator.to_string(),
      });
    }

    specs
  }
}


pub struct ListDesugarer<'c> {
  config: &'c GrammarConfig,
}

impl<'c> ListDesugarer<'c> {
  pub fn new(config: &'c GrammarConfig) -> Self {
    ListDesugarer { config }
  }

  /// `Es ::= E`
  pub fn disambiguation_form(&self, spec: &UserListSpec) -> Vec<Sentence> {
    vec![Production::injection(spec.sort.clone(), spec.element.clone()).into()]
  }

  /// The recursive encoding of `spec`, including declarations of the two scaffolding sorts.
  pub fn parse_form(&self, spec: &UserListSpec) -> Vec<Sentence> {
    let keys           = &self.config.attributes;
    let non_empty_sort = self.config.non_empty_list_sort(&spec.sort);
    let terminator     = self.config.terminator_sort(&spec.sort);

    let terminator_attributes =
        spec.attributes.clone()
            .with(keys.klabel.clone(), spec.terminator_label.clone())
            .with(keys.original_production.clone(), spec.terminator_production.as_str());
    let cons_attributes =
        spec.attributes.clone()
            .with(keys.klabel.clone(), spec.list_label.clone())
            .with(keys.original_production.clone(), spec.cons_production.as_str());

    let mut sentences: Vec<Sentence> = vec![
      Sentence::SyntaxSort(terminator.clone()),
      Sentence::SyntaxSort(non_empty_sort.clone()),
      // Es#Terminator ::= ""
      Production::new(terminator.clone(), vec![ProductionItem::terminal("")])
          .with_label(spec.terminator_label.clone())
          .with_attributes(terminator_attributes)
          .into(),
      // Ne#Es ::= E "sep" Ne#Es
      Production::new(
        non_empty_sort.clone(),
        vec![
          ProductionItem::NonTerminal(spec.element.clone()),
          ProductionItem::terminal(spec.separator.clone()),
          ProductionItem::NonTerminal(non_empty_sort.clone()),
        ],
      ).with_label(spec.list_label.clone())
       .with_attributes(cons_attributes.clone())
       .into(),
      // Ne#Es ::= E Es#Terminator
      Production::new(
        non_empty_sort.clone(),
        vec![
          ProductionItem::NonTerminal(spec.element.clone()),
          ProductionItem::NonTerminal(terminator.clone()),
        ],
      ).with_label(spec.list_label.clone())
       .with_attributes(cons_attributes)
       .into(),
      // Es ::= Ne#Es
      Production::injection(spec.sort.clone(), non_empty_sort).into(),
    ];
    if !spec.non_empty {
      // Es ::= Es#Terminator
      sentences.push(Production::injection(spec.sort.clone(), terminator).into());
    }

    sentences
  }

  /// Adds the disambiguation form of every list in `specs` to `sentences`.
  pub fn apply_disambiguation(&self, sentences: &mut BTreeSet<Sentence>, specs: &[UserListSpec]) {
    for spec in specs {
      debug!(3, "user list {} of {}: adding {} ::= {}", spec.sort, spec.element, spec.sort, spec.element);
      sentences.extend(self.disambiguation_form(spec));
    }
  }

  /// Adds the parse form of every list in `specs` to `sentences`, then removes the sugar.
  pub fn apply_parse(&self, sentences: &mut BTreeSet<Sentence>, specs: &[UserListSpec]) {
    for spec in specs {
      debug!(
        3,
        "user list {} of {} separated by {:?}: desugared to recursive form",
        spec.sort,
        spec.element,
        &*spec.separator
      );
      sentences.extend(self.parse_form(spec));
    }
    self.remove_sugar(sentences);
  }

  /// Removes every production tagged `userList`.
  pub fn remove_sugar(&self, sentences: &mut BTreeSet<Sentence>) {
    let marker = &self.config.attributes.user_list;
    sentences.retain(|sentence| {
      match sentence {
        Sentence::Production(production) => !production.has_attribute(marker),
        Sentence::SyntaxSort(_)          => true,
      }
    });
  }
}
