/*!

The configuration of the grammar generator: which module names are capability markers, which sorts are builtin, and
the names of the sorts and attributes the transforms generate or look for. A `GrammarConfig` is built once, usually
with `GrammarConfig::default()`, and passed explicitly to the assembler, which shares it behind `Arc`.

## Capabilities

A *marker module* is an import-only module whose presence in a module's import closure switches on one generation
step. The set of switched-on steps is a `BitFlags<Capability>`.

| Capability     | Marker          | Effect                                                        |
|:---------------|:----------------|:--------------------------------------------------------------|
| `RuleCells`    | `RULE-CELLS`    | cell productions are rewritten to bracket-tolerant forms      |
| `ConfigCells`  | `CONFIG-CELLS`  | seed marker for configuration grammars                        |
| `AutoCasts`    | `AUTO-CASTS`    | four cast productions per user sort                           |
| `KTopSort`     | `K-TOP-SORT`    | `K ::= S` for every user sort                                 |
| `KBottomSort`  | `K-BOTTOM-SORT` | `S ::= KBott` for every user sort                             |
| `AutoFollow`   | `AUTO-FOLLOW`   | follow restrictions for terminals that prefix other terminals |
| `ProgramLists` | `PROGRAM-LISTS` | user lists desugared to recursive form, top-sort injection    |
| `RuleLists`    | `RULE-LISTS`    | `Es ::= E` for every user list                                |

*/

use std::collections::BTreeSet;

use enumflags2::{bitflags, BitFlags};

use crate::{
  abstractions::{HashSet, IString},
  core::{
    definition::Definition,
    error::GrammarError,
    module::Module,
    sort::Sort,
  },
};

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Capability {
  RuleCells,
  ConfigCells,
  AutoCasts,
  KTopSort,
  KBottomSort,
  AutoFollow,
  ProgramLists,
  RuleLists,
}

pub type Capabilities = BitFlags<Capability, u8>;

/// Sorts the transforms refer to by role.
#[derive(Clone, Debug)]
pub struct WellKnownSorts {
  /// The universal top sort.
  pub k            : Sort,
  /// The universal bottom sort.
  pub k_bottom     : Sort,
  pub k_item       : Sort,
  pub k_label      : Sort,
  pub k_list       : Sort,
  /// The generic sort every cell is injected into.
  pub cell         : Sort,
  /// The generic content sort of composite cells.
  pub bag          : Sort,
  /// Optional `...` inside a rule cell.
  pub optional_dots: Sort,
}

/// Attribute keys the transforms read or write.
#[derive(Clone, Debug)]
pub struct AttributeKeys {
  pub cell               : IString,
  pub cell_fragment      : IString,
  pub user_list          : IString,
  pub sort_key           : IString,
  pub klabel             : IString,
  pub original_production: IString,
}

#[derive(Clone, Debug)]
pub struct GrammarConfig {
  /// The core module every extension module imports.
  pub k_module       : IString,
  /// The base module that receives casts for the builtin sorts.
  pub basic_k_module : IString,
  pub markers        : Vec<(Capability, IString)>,
  /// Builtin sorts, which never receive casts, diamonds, or list desugaring.
  pub k_sorts        : BTreeSet<Sort>,
  /// Sorts whose names start with this character are internal to the parser.
  pub internal_marker: char,
  pub sorts          : WellKnownSorts,
  pub attributes     : AttributeKeys,
}

impl Default for GrammarConfig {
  fn default() -> Self {
    let markers = vec![
      (Capability::RuleCells,    IString::from("RULE-CELLS")),
      (Capability::ConfigCells,  IString::from("CONFIG-CELLS")),
      (Capability::AutoCasts,    IString::from("AUTO-CASTS")),
      (Capability::KTopSort,     IString::from("K-TOP-SORT")),
      (Capability::KBottomSort,  IString::from("K-BOTTOM-SORT")),
      (Capability::AutoFollow,   IString::from("AUTO-FOLLOW")),
      (Capability::ProgramLists, IString::from("PROGRAM-LISTS")),
      (Capability::RuleLists,    IString::from("RULE-LISTS")),
    ];
    let k_sorts = ["KBott", "K", "KLabel", "KList", "KItem", "RuleContent", "KConfigVar", "KString"]
        .into_iter()
        .map(Sort::from)
        .collect();

    GrammarConfig {
      k_module       : IString::from("K"),
      basic_k_module : IString::from("BASIC-K"),
      markers,
      k_sorts,
      internal_marker: '#',
      sorts          : WellKnownSorts {
        k            : Sort::from("K"),
        k_bottom     : Sort::from("KBott"),
        k_item       : Sort::from("KItem"),
        k_label      : Sort::from("KLabel"),
        k_list       : Sort::from("KList"),
        cell         : Sort::from("Cell"),
        bag          : Sort::from("Bag"),
        optional_dots: Sort::from("#OptionalDots"),
      },
      attributes     : AttributeKeys {
        cell               : IString::from("cell"),
        cell_fragment      : IString::from("cellFragment"),
        user_list          : IString::from("userList"),
        sort_key           : IString::from("sortKey"),
        klabel             : IString::from("klabel"),
        original_production: IString::from("originalPrd"),
      },
    }
  }
}

impl GrammarConfig {
  /// The name of the marker module for `capability`.
  pub fn marker(&self, capability: Capability) -> Option<&IString> {
    self.markers
        .iter()
        .find(|(c, _)| *c == capability)
        .map(|(_, name)| name)
  }

  #[inline(always)]
  pub fn is_internal(&self, sort: &Sort) -> bool {
    sort.has_prefix(self.internal_marker)
  }

  /// Reserved sorts: builtin K sorts and internal sorts.
  pub fn is_parser_sort(&self, sort: &Sort) -> bool {
    self.k_sorts.contains(sort) || self.is_internal(sort)
  }

  /// The scaffolding sort for the nonempty case of list sort `list_sort`, `Ne#Es`.
  pub fn non_empty_list_sort(&self, list_sort: &Sort) -> Sort {
    Sort::new(format!("Ne{}{}", self.internal_marker, list_sort))
  }

  /// The scaffolding sort for the empty terminator of list sort `list_sort`, `Es#Terminator`.
  pub fn terminator_sort(&self, list_sort: &Sort) -> Sort {
    Sort::new(format!("{}{}Terminator", list_sort, self.internal_marker))
  }

  /// The capabilities switched on for `module`: those whose marker is a base module in the import closure.
  pub fn capabilities(&self, definition: &Definition, module: &Module) -> Result<Capabilities, GrammarError> {
    let imported: HashSet<IString> = definition.imported_names(module)?;
    let mut capabilities = Capabilities::empty();
    for (capability, marker) in self.markers.iter() {
      if imported.contains(marker) && definition.is_base_module(marker) {
        capabilities |= *capability;
      }
    }
    Ok(capabilities)
  }
}


#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;

  #[test]
  fn reserved_sorts() {
    let config = GrammarConfig::default();
    assert!(config.is_parser_sort(&Sort::from("KItem")));
    assert!(config.is_parser_sort(&Sort::from("#OptionalDots")));
    assert!(!config.is_parser_sort(&Sort::from("Exp")));
    // Scaffolding sorts contain the marker but do not start with it.
    assert!(!config.is_parser_sort(&config.non_empty_list_sort(&Sort::from("Exps"))));
    assert_eq!(config.terminator_sort(&Sort::from("Exps")).name(), "Exps#Terminator");
  }

  #[test]
  fn capabilities_come_from_base_markers_only() {
    let config = GrammarConfig::default();
    let base = Definition::from_modules([
      Module::new("AUTO-CASTS", [], []),
      Module::new("RULE-CELLS", [IString::from("AUTO-FOLLOW")], []),
      Module::new("AUTO-FOLLOW", [], []),
    ]);
    let mut user = Definition::with_base(Arc::new(base));
    // A user module that happens to share a marker's name is not a marker.
    user.insert(Module::new("K-TOP-SORT", [], []));

    let seed = Module::new(
      "SEED",
      ["RULE-CELLS", "AUTO-CASTS", "K-TOP-SORT"].map(IString::from),
      [],
    );
    let capabilities = config.capabilities(&user, &seed).unwrap();
    assert_eq!(
      capabilities,
      Capability::RuleCells | Capability::AutoCasts | Capability::AutoFollow
    );
  }
}
