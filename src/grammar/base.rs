/*!

A minimal base definition, built in code. In a full toolchain the base definition is parsed from the K sources of the
builtin syntax; this one contains just enough of it for the grammar generator to do its work: the builtin sorts, the
cell syntax, the optional dots used inside rule cells, and one module per capability marker.

The rule and configuration cell markers import the capabilities their grammars need, so a seed module that imports
`RULE-CELLS` gets casts, both diamonds, follow restrictions, and rule lists. The program marker imports nothing else.

*/

use crate::{
  abstractions::IString,
  core::{
    definition::Definition,
    module::Module,
    production::{Production, ProductionItem},
    sentence::Sentence,
    sort::Sort,
  },
  grammar::config::{Capability, GrammarConfig},
};

fn terminal(text: &str) -> ProductionItem {
  ProductionItem::terminal(text)
}

fn non_terminal(sort: &Sort) -> ProductionItem {
  ProductionItem::NonTerminal(sort.clone())
}

/// Builds the base definition for `config`.
pub fn base_definition(config: &GrammarConfig) -> Definition {
  let sorts = &config.sorts;
  let mut definition = Definition::new();

  // BASIC-K: the sorts of the K AST.
  let basic_sentences: Vec<Sentence> = vec![
    Sentence::SyntaxSort(sorts.k.clone()),
    Sentence::SyntaxSort(sorts.k_item.clone()),
    Sentence::SyntaxSort(sorts.k_bottom.clone()),
    Sentence::SyntaxSort(sorts.k_label.clone()),
    Sentence::SyntaxSort(sorts.k_list.clone()),
    Production::injection(sorts.k.clone(), sorts.k_item.clone()).into(),
    Production::new(
      sorts.k_item.clone(),
      vec![non_terminal(&sorts.k_label), terminal("("), non_terminal(&sorts.k_list), terminal(")")],
    ).with_label("#KApply").into(),
    Production::injection(sorts.k_list.clone(), sorts.k.clone()).into(),
    Production::new(sorts.k_list.clone(), vec![terminal(".KList")]).with_label("#EmptyKList").into(),
    Production::new(
      sorts.k_list.clone(),
      vec![non_terminal(&sorts.k_list), terminal(","), non_terminal(&sorts.k_list)],
    ).with_label("#KList").into(),
  ];
  definition.insert(Module::new(config.basic_k_module.clone(), [], basic_sentences));

  // K: sequencing, rewrites, and cell syntax.
  let k_sentences: Vec<Sentence> = vec![
    Sentence::SyntaxSort(sorts.cell.clone()),
    Sentence::SyntaxSort(sorts.bag.clone()),
    Sentence::SyntaxSort(sorts.optional_dots.clone()),
    Production::new(
      sorts.k.clone(),
      vec![non_terminal(&sorts.k), terminal("~>"), non_terminal(&sorts.k)],
    ).with_label("#KSequence").into(),
    Production::new(sorts.k.clone(), vec![terminal(".K")]).with_label("#EmptyK").into(),
    Production::new(
      sorts.k.clone(),
      vec![non_terminal(&sorts.k), terminal("=>"), non_terminal(&sorts.k)],
    ).with_label("#KRewrite").into(),
    Production::new(
      sorts.bag.clone(),
      vec![non_terminal(&sorts.bag), non_terminal(&sorts.bag)],
    ).with_label("#cells").into(),
    Production::new(sorts.bag.clone(), vec![terminal(".Bag")]).with_label("#cells").into(),
    Production::injection(sorts.bag.clone(), sorts.cell.clone()).into(),
    Production::new(sorts.optional_dots.clone(), vec![terminal("...")]).with_label("#dots").into(),
    Production::new(sorts.optional_dots.clone(), vec![terminal("")]).with_label("#noDots").into(),
  ];
  definition.insert(Module::new(config.k_module.clone(), [config.basic_k_module.clone()], k_sentences));

  let marker = |capability: Capability| -> IString {
    config.marker(capability).cloned().unwrap_or_default()
  };
  for (capability, name) in config.markers.iter() {
    let imports: Vec<IString> = match capability {

      Capability::RuleCells => {
        vec![
          config.k_module.clone(),
          marker(Capability::AutoCasts),
          marker(Capability::KTopSort),
          marker(Capability::KBottomSort),
          marker(Capability::AutoFollow),
          marker(Capability::RuleLists),
        ]
      }

      Capability::ConfigCells => {
        vec![
          config.k_module.clone(),
          marker(Capability::AutoCasts),
          marker(Capability::KTopSort),
          marker(Capability::KBottomSort),
        ]
      }

      _ => vec![],

    };
    definition.insert(Module::new(name.clone(), imports, []));
  }

  definition
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_marker_is_defined() {
    let config = GrammarConfig::default();
    let base   = base_definition(&config);
    for (_, marker) in config.markers.iter() {
      assert!(base.contains(marker), "missing marker {}", marker);
    }
    assert!(base.contains(&config.k_module));
    assert!(base.contains(&config.basic_k_module));
  }

  #[test]
  fn rule_cells_pull_in_rule_capabilities() {
    let config = GrammarConfig::default();
    let base   = base_definition(&config);
    let rule_cells = base.get("RULE-CELLS").unwrap();
    let closure = base.imported_names(rule_cells).unwrap();
    for name in ["K", "BASIC-K", "AUTO-CASTS", "AUTO-FOLLOW", "RULE-LISTS"] {
      assert!(closure.contains(&IString::from(name)), "{} not imported", name);
    }
  }
}
