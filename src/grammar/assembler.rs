/*!

The grammar assembler turns one user module into the four modules the parser needs:

| Module           | Contents                                                                          |
|:-----------------|:----------------------------------------------------------------------------------|
| `seed`           | imports the user module and the marker module of the grammar mode                 |
| `extension`      | the seed plus cast and diamond productions                                        |
| `disambiguation` | the user side of the extension, flattened, with cells, follow, and list rewrites  |
| `parse`          | the disambiguation module with user lists desugared and top-sort injections added |

Follow restrictions apply to every terminal the parser sees, including those of the base modules. Since the base is
shared, a bundle gets its own definition layer holding restricted copies of the base modules, under their own names.

Each stage runs only if the seed's import closure switches on its capability. A missing capability is not an error;
the stage is skipped and its input passes through. When the parse stage is skipped, `parse` is the same `Arc` as
`disambiguation`.

The assembler owns the base definition and the configuration behind `Arc`s and never modifies either after
construction, so one assembler can build bundles for many user definitions, on many threads, at once.

*/

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::{
  core::{
    definition::Definition,
    error::GrammarError,
    module::{ArcModule, Module},
    production::Production,
    sentence::{productions, Sentence},
    sort::Sort,
  },
  debug,
  grammar::{
    casts::CastSynthesizer,
    cells::{CellBracketRewriter, ConfigurationInfo},
    config::{Capability, GrammarConfig},
    follow::{FollowRestrictionDisambiguator, TerminalIndex},
    lists::{ListDesugarer, UserListSpec},
  },
  info,
};

/// Which grammar to build. The mode decides the marker module the seed imports.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GrammarMode {
  /// Rule bodies: cells with optional dots, casts, diamonds, follow restrictions, rule lists.
  Rule,
  /// Configuration declarations.
  Config,
  /// Object-language programs: desugared lists and top-sort injections.
  Program,
}

impl GrammarMode {
  pub fn capability(self) -> Capability {
    match self {
      GrammarMode::Rule    => Capability::RuleCells,
      GrammarMode::Config  => Capability::ConfigCells,
      GrammarMode::Program => Capability::ProgramLists,
    }
  }
}

impl Display for GrammarMode {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      GrammarMode::Rule    => write!(f, "rule"),
      GrammarMode::Config  => write!(f, "configuration"),
      GrammarMode::Program => write!(f, "program"),
    }
  }
}

/// The four modules handed to the parser.
#[derive(Clone)]
pub struct GrammarBundle {
  pub seed          : ArcModule,
  pub extension     : ArcModule,
  pub disambiguation: ArcModule,
  pub parse         : ArcModule,
  /// Whether inferred variable sorts are kept as explicit sort-predicate requirements.
  pub strict        : bool,
  /// Resolves the imports of the bundled modules. With follow restrictions on, this is a layer over the user
  /// definition in which restricted copies of the visible base modules shadow the originals.
  pub definition    : Arc<Definition>,
}

impl GrammarBundle {
  /// Everything the parser builds its tables from.
  pub fn parse_sentences(&self) -> Result<BTreeSet<Sentence>, GrammarError> {
    self.definition.visible_sentences(&self.parse)
  }

  /// Everything the tree disambiguation heuristics look at.
  pub fn disambiguation_sentences(&self) -> Result<BTreeSet<Sentence>, GrammarError> {
    self.definition.visible_sentences(&self.disambiguation)
  }

  pub fn modules(&self) -> [&ArcModule; 4] {
    [&self.seed, &self.extension, &self.disambiguation, &self.parse]
  }
}

/// `K ::= S` for every local sort `S` of `module` that is neither reserved nor a user list sort, so a program may be
/// any user sort without a cast.
pub fn top_sort_injections(config: &GrammarConfig, module: &Module) -> Vec<Sentence> {
  let list_sorts: BTreeSet<&Sort> =
      module.productions()
            .filter(|production| production.has_attribute(&config.attributes.user_list))
            .map(|production| &production.sort)
            .collect();

  module.local_sorts()
        .into_iter()
        .filter(|sort| !config.is_parser_sort(sort) && !list_sorts.contains(sort))
        .map(|sort| Production::injection(config.sorts.k.clone(), sort).into())
        .collect()
}


pub struct GrammarAssembler {
  base  : Arc<Definition>,
  config: Arc<GrammarConfig>,
  strict: bool,
}

impl GrammarAssembler {
  /// Takes ownership of the base definition and adds the casts of the builtin sorts to its `BASIC-K` module. The base
  /// must contain the core `K` module.
  pub fn new(mut base: Definition, config: Arc<GrammarConfig>, strict: bool) -> Result<Self, GrammarError> {
    if !base.contains(&config.k_module) {
      return Err(GrammarError::MissingBaseModule { name: config.k_module.clone() });
    }

    if let Some(basic_k) = base.get(&config.basic_k_module).cloned() {
      let mut decorated = Module::clone(&basic_k);
      decorated.sentences.extend(
        CastSynthesizer::new(&config).builtin_casts().into_iter().map(Sentence::Production)
      );
      debug!(3, "added builtin casts to {}", decorated.name);
      base.insert(decorated);
    }

    Ok(GrammarAssembler {
      base: Arc::new(base),
      config,
      strict,
    })
  }

  pub fn base(&self) -> &Arc<Definition> {
    &self.base
  }

  pub fn config(&self) -> &GrammarConfig {
    &self.config
  }

  #[inline(always)]
  pub fn strict(&self) -> bool {
    self.strict
  }

  /// An empty user definition layered on the shared base.
  pub fn user_definition(&self) -> Definition {
    Definition::with_base(Arc::clone(&self.base))
  }

  /// The seed module of `mode` for the user module `module_name`, named `<module>-<MARKER>`. If the base lacks the
  /// marker module, the seed imports the user module alone.
  pub fn seed_module(&self, definition: &Definition, module_name: &str, mode: GrammarMode) -> Result<Module, GrammarError> {
    let user   = definition.module(module_name)?;
    let marker = self.config.marker(mode.capability()).filter(|marker| definition.is_base_module(marker));

    match marker {
      Some(marker) => {
        Ok(Module::new(
          format!("{}-{}", user.name, marker),
          [user.name.clone(), marker.clone()],
          [],
        ))
      }
      None => {
        debug!(3, "no marker module for {} grammars; seeding {} without one", mode, user.name);
        Ok(Module::new(format!("{}-{}", user.name, mode), [user.name.clone()], []))
      }
    }
  }

  pub fn rule_grammar(&self, definition: &Arc<Definition>, module_name: &str) -> Result<GrammarBundle, GrammarError> {
    self.bundle(definition, module_name, GrammarMode::Rule)
  }

  pub fn config_grammar(&self, definition: &Arc<Definition>, module_name: &str) -> Result<GrammarBundle, GrammarError> {
    self.bundle(definition, module_name, GrammarMode::Config)
  }

  pub fn program_grammar(&self, definition: &Arc<Definition>, module_name: &str) -> Result<GrammarBundle, GrammarError> {
    self.bundle(definition, module_name, GrammarMode::Program)
  }

  /// Builds the seed of `mode` for `module_name` and assembles its bundle.
  pub fn bundle(
    &self,
    definition : &Arc<Definition>,
    module_name: &str,
    mode       : GrammarMode,
  ) -> Result<GrammarBundle, GrammarError>
  {
    let seed = self.seed_module(definition, module_name, mode)?;
    info!(2, "building the {} grammar of {}", mode, module_name);
    self.combined_grammar(definition, seed)
  }

  /// Assembles the bundle of an arbitrary seed module. Imports of `seed` are resolved through `definition`.
  pub fn combined_grammar(&self, definition: &Arc<Definition>, seed: Module) -> Result<GrammarBundle, GrammarError> {
    let config       = &*self.config;
    let seed         = Arc::new(seed);
    let capabilities = config.capabilities(definition, &seed)?;
    debug!(3, "{}: capabilities {:?}", seed.name, capabilities);

    // Extension
    info!(2, "{}: extension", seed.name);
    let extension = CastSynthesizer::new(config).apply(definition, &seed, capabilities)?;

    // Disambiguation
    info!(2, "{}: disambiguation", seed.name);
    let Module { name, imports, mut sentences, attributes } = definition.flatten(&extension)?;

    if capabilities.contains(Capability::RuleCells) {
      match ConfigurationInfo::from_sentences(config, sentences.iter()) {
        Some(info) => {
          sentences = CellBracketRewriter::new(config, &info).apply(&sentences)?;
        }
        None => {
          debug!(3, "{}: no cells to rewrite", name);
        }
      }
    }

    // Restricted copies of base modules shadow the originals in a layer private to this bundle.
    let mut bundle_definition = Arc::clone(definition);
    if capabilities.contains(Capability::AutoFollow) {
      let visible = definition.visible_sentences(&extension)?;
      let index   = TerminalIndex::from_productions(config, productions(visible.iter()));
      debug!(3, "{}: follow restrictions over {} terminals", name, index.len());
      let disambiguator = FollowRestrictionDisambiguator::new(config, index);
      sentences = disambiguator.apply(&sentences);

      let mut layer    = Definition::with_base(Arc::clone(definition));
      let mut shadowed = 0;
      for module in definition.import_closure(&extension)? {
        if !definition.is_base_module(&module.name) {
          continue;
        }
        if let Some(restricted) = disambiguator.restrict_module(&module) {
          debug!(4, "{}: restricted terminals of {}", name, restricted.name);
          layer.insert(restricted);
          shadowed += 1;
        }
      }
      if shadowed > 0 {
        bundle_definition = Arc::new(layer);
      }
    }

    let desugarer = ListDesugarer::new(config);
    if capabilities.contains(Capability::RuleLists) {
      let specs = UserListSpec::collect(config, sentences.iter());
      desugarer.apply_disambiguation(&mut sentences, &specs);
    }

    let disambiguation = Arc::new(Module { name, imports, sentences, attributes });

    // Parse
    let parse =
        if capabilities.contains(Capability::ProgramLists) {
          info!(2, "{}: parse", seed.name);
          let mut parse = Module::clone(&disambiguation);
          let injections = top_sort_injections(config, &parse);
          let specs      = UserListSpec::collect(config, parse.sentences.iter());
          parse.sentences.extend(injections);
          desugarer.apply_parse(&mut parse.sentences, &specs);
          Arc::new(parse)
        } else {
          Arc::clone(&disambiguation)
        };

    debug!(
      3,
      "{}: {} extension, {} disambiguation, {} parse sentences",
      seed.name,
      extension.sentences.len(),
      disambiguation.sentences.len(),
      parse.sentences.len()
    );

    Ok(GrammarBundle {
      seed,
      extension,
      disambiguation,
      parse,
      strict    : self.strict,
      definition: bundle_definition,
    })
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::abstractions::IString;
  use crate::core::{attributes::Attributes, production::ProductionItem};
  use crate::grammar::base::base_definition;

  fn assembler() -> GrammarAssembler {
    let config = Arc::new(GrammarConfig::default());
    GrammarAssembler::new(base_definition(&config), config, false).unwrap()
  }

  #[test]
  fn base_without_k_is_rejected() {
    let config = Arc::new(GrammarConfig::default());
    match GrammarAssembler::new(Definition::new(), config, true) {
      Err(GrammarError::MissingBaseModule { name }) => assert_eq!(&*name, "K"),
      Err(other) => panic!("unexpected error {}", other),
      Ok(_)      => panic!("expected a missing base module error"),
    }
  }

  #[test]
  fn basic_k_receives_builtin_casts() {
    let assembler = assembler();
    let basic_k   = assembler.base().get("BASIC-K").unwrap();
    assert!(basic_k.productions().any(|p| p.label.as_deref() == Some("#SemanticCastToKItem")));
  }

  #[test]
  fn seed_names_and_imports() {
    let assembler  = assembler();
    let mut definition = assembler.user_definition();
    definition.insert(Module::new("IMP", [IString::from("K")], []));

    let seed = assembler.seed_module(&definition, "IMP", GrammarMode::Program).unwrap();
    assert_eq!(&*seed.name, "IMP-PROGRAM-LISTS");
    assert_eq!(seed.imports, vec![IString::from("IMP"), IString::from("PROGRAM-LISTS")]);

    assert!(matches!(
      assembler.seed_module(&definition, "NOPE", GrammarMode::Rule),
      Err(GrammarError::UnknownModule { .. })
    ));
  }

  #[test]
  fn top_sorts_skip_lists_and_reserved_sorts() {
    let config = GrammarConfig::default();
    let module = Module::new(
      "IMP",
      [],
      [
        Sentence::SyntaxSort(Sort::from("Stmt")),
        Sentence::SyntaxSort(Sort::from("KItem")),
        Sentence::SyntaxSort(Sort::from("#Hidden")),
        Production::new("Ids", vec![ProductionItem::terminal(".Ids")])
            .with_attributes(Attributes::new().with("userList", "*"))
            .into(),
      ],
    );
    let rendered: Vec<String> = top_sort_injections(&config, &module).iter().map(|s| s.to_string()).collect();
    assert_eq!(rendered, vec!["syntax K ::= Stmt"]);
  }

  #[test]
  fn without_program_lists_parse_is_disambiguation() {
    let assembler  = assembler();
    let mut definition = assembler.user_definition();
    definition.insert(Module::new("EXP", [IString::from("K")], [Sentence::SyntaxSort(Sort::from("Exp"))]));
    let definition = Arc::new(definition);

    let bundle = assembler.rule_grammar(&definition, "EXP").unwrap();
    assert!(Arc::ptr_eq(&bundle.disambiguation, &bundle.parse));
    assert!(!bundle.strict);
  }
}
