/*!

A `Definition` is the index from module names to modules. A definition may be layered on top of a *base* definition,
which holds the builtin K modules and the capability marker modules. The base is shared behind `Arc` and is never
modified after construction, so any number of user definitions, possibly on different threads, can sit on top of the
same base.

Name lookup checks the definition's own modules first and then falls through to the base. A module is a *base module*
of a definition if it is found only in the base. The distinction matters to the grammar transforms: they rewrite the
user's sentences, and when they must rewrite a base module they put the copy in a new layer, where it shadows the
original.

*/

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
  abstractions::{HashMap, HashSet, IString},
  core::{
    error::GrammarError,
    module::{ArcModule, Module},
    sentence::Sentence,
  },
};

#[derive(Clone, Default)]
pub struct Definition {
  modules: HashMap<IString, ArcModule>,
  base   : Option<Arc<Definition>>,
}

impl Definition {
  pub fn new() -> Self {
    Self::default()
  }

  /// An empty definition whose name lookups fall through to `base`.
  pub fn with_base(base: Arc<Definition>) -> Self {
    Definition {
      modules: HashMap::default(),
      base   : Some(base),
    }
  }

  pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Self {
    let mut definition = Definition::new();
    for module in modules {
      definition.insert(module);
    }
    definition
  }

  pub fn base(&self) -> Option<&Arc<Definition>> {
    self.base.as_ref()
  }

  /// Adds `module`, replacing any module of the same name in this layer, and returns the shared handle.
  pub fn insert(&mut self, module: Module) -> ArcModule {
    let module = Arc::new(module);
    self.modules.insert(module.name.clone(), Arc::clone(&module));
    module
  }

  pub fn get(&self, name: &str) -> Option<&ArcModule> {
    match self.modules.get(&IString::from(name)) {
      Some(module) => Some(module),
      None         => self.base.as_ref().and_then(|base| base.get(name)),
    }
  }

  /// Like `get`, but an absent module is an error.
  pub fn module(&self, name: &str) -> Result<&ArcModule, GrammarError> {
    self.get(name).ok_or_else(|| GrammarError::UnknownModule { name: name.into(), importer: None })
  }

  #[inline(always)]
  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// Whether `name` resolves to a module of the base rather than of this layer.
  pub fn is_base_module(&self, name: &str) -> bool {
    !self.modules.contains_key(&IString::from(name))
        && self.base.as_ref().is_some_and(|base| base.contains(name))
  }

  /// Names of the modules in this layer, excluding the base, in sorted order.
  pub fn module_names(&self) -> Vec<IString> {
    let mut names: Vec<IString> = self.modules.keys().cloned().collect();
    names.sort();
    names
  }

  /// The transitive closure of the imports of `module`. Modules appear once each, in depth-first preorder following
  /// declaration order. Cycles at the name level are harmless; a module reachable from its own imports appears in
  /// its own closure.
  pub fn import_closure(&self, module: &Module) -> Result<Vec<ArcModule>, GrammarError> {
    let mut visited: HashSet<IString> = HashSet::default();
    let mut closure = Vec::new();
    let mut pending: Vec<(IString, IString)> =
        module.imports
              .iter()
              .rev()
              .map(|import| (module.name.clone(), import.clone()))
              .collect();

    while let Some((importer, name)) = pending.pop() {
      if !visited.insert(name.clone()) {
        continue;
      }
      let imported = self.get(&name).ok_or_else(|| GrammarError::UnknownModule {
        name    : name.clone(),
        importer: Some(importer),
      })?;
      pending.extend(imported.imports.iter().rev().map(|next| (imported.name.clone(), next.clone())));
      closure.push(Arc::clone(imported));
    }

    Ok(closure)
  }

  /// Names of every module in the import closure of `module`.
  pub fn imported_names(&self, module: &Module) -> Result<HashSet<IString>, GrammarError> {
    Ok(self.import_closure(module)?.iter().map(|m| m.name.clone()).collect())
  }

  /// The local sentences of `module` and of every non-base module in its import closure.
  pub fn user_sentences(&self, module: &Module) -> Result<BTreeSet<Sentence>, GrammarError> {
    let mut sentences = module.sentences.clone();
    for imported in self.import_closure(module)? {
      if !self.is_base_module(&imported.name) {
        sentences.extend(imported.sentences.iter().cloned());
      }
    }
    Ok(sentences)
  }

  /// Every sentence visible from `module`: its own and those of its entire import closure.
  pub fn visible_sentences(&self, module: &Module) -> Result<BTreeSet<Sentence>, GrammarError> {
    let mut sentences = module.sentences.clone();
    for imported in self.import_closure(module)? {
      sentences.extend(imported.sentences.iter().cloned());
    }
    Ok(sentences)
  }

  /**
  Collapses the user side of `module` into a single module with the same name. The result holds the user sentences
  of `module` as local sentences and imports the base modules that `module` or any of its non-base imports import
  directly. The sentences visible from the result are the same as those visible from `module`.
  */
  pub fn flatten(&self, module: &Module) -> Result<Module, GrammarError> {
    let closure = self.import_closure(module)?;
    let mut imports: Vec<IString> = Vec::new();

    let user_side = std::iter::once(module)
        .chain(closure.iter().map(|m| m.as_ref()).filter(|m| !self.is_base_module(&m.name)));
    let mut sentences = BTreeSet::new();
    for user_module in user_side {
      sentences.extend(user_module.sentences.iter().cloned());
      for import in user_module.imports.iter() {
        if self.is_base_module(import) && !imports.contains(import) {
          imports.push(import.clone());
        }
      }
    }

    Ok(Module {
      name      : module.name.clone(),
      imports,
      sentences,
      attributes: module.attributes.clone(),
    })
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::{production::Production, sort::Sort};

  fn names(modules: &[ArcModule]) -> Vec<String> {
    modules.iter().map(|m| m.name.to_string()).collect()
  }

  fn layered() -> Definition {
    let base = Definition::from_modules([
      Module::new("K", [], [Sentence::SyntaxSort(Sort::from("K"))]),
      Module::new("AUTO-CASTS", [], []),
    ]);
    let mut user = Definition::with_base(Arc::new(base));
    user.insert(Module::new(
      "BOOL",
      [IString::from("K")],
      [Sentence::from(Production::injection("Bool", "K"))],
    ));
    user.insert(Module::new(
      "IMP",
      ["BOOL", "AUTO-CASTS", "IMP"].map(IString::from),
      [Sentence::SyntaxSort(Sort::from("Stmt"))],
    ));
    user
  }

  #[test]
  fn closure_is_ordered_and_deduplicated() {
    let definition = layered();
    let imp = Arc::clone(definition.get("IMP").unwrap());
    let closure = definition.import_closure(&imp).unwrap();
    assert_eq!(names(&closure), vec!["BOOL", "K", "AUTO-CASTS", "IMP"]);
  }

  #[test]
  fn base_modules_are_distinguished() {
    let definition = layered();
    assert!(definition.is_base_module("K"));
    assert!(!definition.is_base_module("IMP"));
    assert!(!definition.is_base_module("NOWHERE"));
    assert_eq!(definition.module_names(), vec![IString::from("BOOL"), IString::from("IMP")]);
  }

  #[test]
  fn unknown_import_is_reported() {
    let definition = layered();
    let broken = Module::new("BROKEN", [IString::from("MISSING")], []);
    match definition.import_closure(&broken) {
      Err(GrammarError::UnknownModule { name, importer }) => {
        assert_eq!(&*name, "MISSING");
        assert_eq!(importer.as_deref(), Some("BROKEN"));
      }
      other => panic!("expected an unknown module error, got {:?}", other.map(|c| names(&c))),
    }
  }

  #[test]
  fn flatten_keeps_user_sentences_and_base_imports() {
    let definition = layered();
    let seed = Module::new("IMP-SEED", [IString::from("IMP")], []);
    let flat = definition.flatten(&seed).unwrap();

    assert_eq!(flat.name, IString::from("IMP-SEED"));
    assert_eq!(flat.imports, vec![IString::from("AUTO-CASTS"), IString::from("K")]);
    assert_eq!(flat.sentences.len(), 2);
    assert_eq!(definition.visible_sentences(&seed).unwrap().len(), 3);
    assert_eq!(definition.user_sentences(&seed).unwrap(), flat.sentences);
  }
}
