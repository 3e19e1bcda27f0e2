/*!

Cast synthesis connects every user sort to the K sort lattice. For a user sort `S`, depending on the capabilities of
the module, it adds:

| Capability    | Productions                                                             |
|:--------------|:------------------------------------------------------------------------|
| `AutoCasts`   | `S ::= S "::S"`, `S ::= S ":S"`, `KBott ::= S "<:S"`, `S ::= K ":>S"` |
| `KTopSort`    | `K ::= S` (the upper diamond)                                           |
| `KBottomSort` | `S ::= KBott` (the lower diamond)                                       |

The four casts are labeled `#SyntacticCast`, `#SemanticCastToS`, `#InnerCast`, and `#OuterCast`, and each carries a
`sortKey(S)` attribute for the type-inference passes downstream. Reserved sorts (builtin K sorts and internal `#`
sorts) get nothing.

Synthesis is idempotent. Candidate productions already visible from the module are dropped, and when nothing is left
the input module is returned as is: the same `Arc`, not an equal copy.

*/

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
  abstractions::CompactIntSet,
  core::{
    attributes::Attributes,
    definition::Definition,
    error::GrammarError,
    module::{ArcModule, Module},
    production::{Production, ProductionItem},
    sentence::{defined_sorts, Sentence},
    sort::{Sort, SortTable},
  },
  debug,
  grammar::config::{Capabilities, Capability, GrammarConfig},
};

pub struct CastSynthesizer<'c> {
  config: &'c GrammarConfig,
}

impl<'c> CastSynthesizer<'c> {
  pub fn new(config: &'c GrammarConfig) -> Self {
    CastSynthesizer { config }
  }

  /// The four casts for `cast_sort`. The inner cast produces `outer`; the outer cast consumes `inner`.
  pub fn casts(&self, outer: &Sort, inner: &Sort, cast_sort: &Sort) -> [Production; 4] {
    let attributes = Attributes::new().with(self.config.attributes.sort_key.clone(), cast_sort.name.clone());
    let cast = |sort: &Sort, operand: &Sort, operator: &str, label: String| {
      Production::new(
        sort.clone(),
        vec![
          ProductionItem::NonTerminal(operand.clone()),
          ProductionItem::terminal(format!("{}{}", operator, cast_sort)),
        ],
      ).with_label(label)
       .with_attributes(attributes.clone())
    };

    [
      cast(cast_sort, cast_sort, "::", "#SyntacticCast".to_string()),
      cast(cast_sort, cast_sort, ":",  format!("#SemanticCastTo{}", cast_sort)),
      cast(outer,     cast_sort, "<:", "#InnerCast".to_string()),
      cast(cast_sort, inner,     ":>", "#OuterCast".to_string()),
    ]
  }

  /// Casts for the builtin sorts, added to the `BASIC-K` module of the base definition.
  pub fn builtin_casts(&self) -> Vec<Production> {
    let sorts = &self.config.sorts;
    [
      self.casts(&sorts.k_label, &sorts.k_label, &sorts.k_label),
      self.casts(&sorts.k_list, &sorts.k_list, &sorts.k_list),
      self.casts(&sorts.k_bottom, &sorts.k, &sorts.k_item),
      self.casts(&sorts.k_bottom, &sorts.k, &sorts.k),
    ].into_iter()
     .flatten()
     .collect()
  }

  /// Every production cast synthesis would generate for `sorts` under `capabilities`, reserved sorts excluded.
  pub fn candidates<'s>(
    &self,
    sorts       : impl IntoIterator<Item = &'s Sort>,
    capabilities: Capabilities,
  ) -> BTreeSet<Production>
  {
    let sorts_config = &self.config.sorts;
    let mut table    = SortTable::new();
    let eligible: CompactIntSet =
        sorts.into_iter()
             .filter(|sort| !self.config.is_parser_sort(sort))
             .map(|sort| table.intern(sort))
             .collect();

    let mut productions = BTreeSet::new();
    for sort in table.sorts_in(&eligible) {
      if capabilities.contains(Capability::AutoCasts) {
        productions.extend(self.casts(&sorts_config.k_bottom, &sorts_config.k, sort));
      }
      if capabilities.contains(Capability::KTopSort) {
        productions.insert(Production::injection(sorts_config.k.clone(), sort.clone()));
      }
      if capabilities.contains(Capability::KBottomSort) {
        productions.insert(Production::injection(sort.clone(), sorts_config.k_bottom.clone()));
      }
    }
    productions
  }

  /**
  Builds the extension module of `module`. The user sorts are the sorts defined by the user sentences of `module`
  (its own and those of non-base modules it imports). If anything is added, the result keeps the name of `module`,
  additionally imports the core `K` module, and holds the local sentences of `module` plus the new productions.
  */
  pub fn apply(
    &self,
    definition  : &Definition,
    module      : &ArcModule,
    capabilities: Capabilities,
  ) -> Result<ArcModule, GrammarError>
  {
    let user_sorts = defined_sorts(definition.user_sentences(module)?.iter());
    let visible    = definition.visible_sentences(module)?;

    let additions: Vec<Sentence> =
        self.candidates(user_sorts.iter(), capabilities)
            .into_iter()
            .map(Sentence::Production)
            .filter(|sentence| !visible.contains(sentence))
            .collect();

    if additions.is_empty() {
      debug!(3, "module {} already has every cast production", module.name);
      return Ok(Arc::clone(module));
    }
    debug!(3, "adding {} cast productions to module {}", additions.len(), module.name);

    let mut extended = Module::clone(module);
    extended.add_import(self.config.k_module.clone());
    extended.sentences.extend(additions);
    Ok(Arc::new(extended))
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::abstractions::IString;
  use crate::core::attributes::AttributeValue;

  fn user_definition() -> Definition {
    let base = Definition::from_modules([
      Module::new("AUTO-CASTS", [], []),
      Module::new("K", [], [Sentence::SyntaxSort(Sort::from("K"))]),
    ]);
    let mut definition = Definition::with_base(Arc::new(base));
    definition.insert(Module::new(
      "EXP",
      [],
      [
        Sentence::SyntaxSort(Sort::from("Exp")),
        Sentence::SyntaxSort(Sort::from("#Internal")),
        Sentence::SyntaxSort(Sort::from("KItem")),
      ],
    ));
    definition
  }

  #[test]
  fn auto_casts_for_one_sort() {
    let config      = GrammarConfig::default();
    let synthesizer = CastSynthesizer::new(&config);
    let definition  = user_definition();
    let seed = Arc::new(Module::new("SEED", ["EXP", "AUTO-CASTS"].map(IString::from), []));

    let extension = synthesizer.apply(&definition, &seed, Capability::AutoCasts.into()).unwrap();
    let added: Vec<&Production> = extension.productions().collect();
    assert_eq!(added.len(), 4);

    let mut labels: Vec<&str> = added.iter().filter_map(|p| p.label.as_deref()).collect();
    labels.sort();
    assert_eq!(labels, vec!["#InnerCast", "#OuterCast", "#SemanticCastToExp", "#SyntacticCast"]);
    for production in added.iter() {
      assert_eq!(
        production.attributes.get("sortKey"),
        Some(&AttributeValue::Text(IString::from("Exp")))
      );
    }
    assert!(extension.imports_directly("K"));
  }

  #[test]
  fn cast_shapes() {
    let config = GrammarConfig::default();
    let [syntactic, semantic, inner, outer] =
        CastSynthesizer::new(&config).casts(&Sort::from("KBott"), &Sort::from("K"), &Sort::from("Exp"));

    assert_eq!(syntactic.to_string(), r#"Exp ::= Exp "::Exp" [label(#SyntacticCast), sortKey(Exp)]"#);
    assert_eq!(semantic.to_string(), r#"Exp ::= Exp ":Exp" [label(#SemanticCastToExp), sortKey(Exp)]"#);
    assert_eq!(inner.to_string(), r#"KBott ::= Exp "<:Exp" [label(#InnerCast), sortKey(Exp)]"#);
    assert_eq!(outer.to_string(), r#"Exp ::= K ":>Exp" [label(#OuterCast), sortKey(Exp)]"#);
  }

  #[test]
  fn diamonds() {
    let config     = GrammarConfig::default();
    let candidates = CastSynthesizer::new(&config).candidates(
      [Sort::from("Exp"), Sort::from("K")].iter(),
      Capability::KTopSort | Capability::KBottomSort,
    );
    let rendered: Vec<String> = candidates.iter().map(|p| p.to_string()).collect();
    assert_eq!(rendered, vec!["Exp ::= KBott", "K ::= Exp"]);
  }

  #[test]
  fn synthesis_is_idempotent() {
    let config      = GrammarConfig::default();
    let synthesizer = CastSynthesizer::new(&config);
    let definition  = user_definition();
    let seed = Arc::new(Module::new("SEED", ["EXP", "AUTO-CASTS"].map(IString::from), []));
    let capabilities = Capability::AutoCasts | Capability::KTopSort | Capability::KBottomSort;

    let once  = synthesizer.apply(&definition, &seed, capabilities).unwrap();
    let twice = synthesizer.apply(&definition, &once, capabilities).unwrap();
    assert!(Arc::ptr_eq(&once, &twice));
    assert_eq!(once.productions().count(), 6);
  }

  #[test]
  fn no_capabilities_returns_input() {
    let config     = GrammarConfig::default();
    let definition = user_definition();
    let seed = Arc::new(Module::new("SEED", [IString::from("EXP")], []));

    let result = CastSynthesizer::new(&config).apply(&definition, &seed, Capabilities::empty()).unwrap();
    assert!(Arc::ptr_eq(&seed, &result));
  }

  #[test]
  fn builtin_casts_cover_the_k_sorts() {
    let config = GrammarConfig::default();
    let casts  = CastSynthesizer::new(&config).builtin_casts();
    assert_eq!(casts.len(), 16);
    assert!(casts.iter().any(|p| p.to_string().starts_with(r#"KItem ::= K ":>KItem""#)));
  }
}
