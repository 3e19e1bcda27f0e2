/*!

A `Module` is a named set of declarations plus the names of the modules it imports. Modules are immutable values and
are shared behind `Arc`; every grammar transform produces a new module rather than editing its input. Module equality
is structural (name and content).

## Imports

A module stores the *names* of the modules it imports, in declaration order, not references to them. Names are
resolved through a [`Definition`](crate::core::definition::Definition), which is the index from names to modules. This
keeps the import relation free of ownership cycles even when it is cyclic at the name level.

## Local Sentences

The `sentences` of a module are only those declared in the module itself. The sentences visible from a module are its
local sentences together with those of every module in its import closure; computing that requires the definition.

*/

use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::{
  abstractions::{IString, join_string},
  core::{
    attributes::Attributes,
    production::Production,
    sentence::{defined_sorts, productions, Sentence},
    sort::Sort,
  },
};

const DISPLAY_INDENT: usize = 2;

/// Modules are shared, immutable, and compared by identity where a transform promises to return its input unchanged.
pub type ArcModule = Arc<Module>;

#[derive(Clone, Default, Eq, PartialEq)]
pub struct Module {
  pub name      : IString,
  pub imports   : Vec<IString>,
  pub sentences : BTreeSet<Sentence>,
  pub attributes: Attributes,
}

impl Module {
  pub fn new(
    name     : impl Into<IString>,
    imports  : impl IntoIterator<Item = IString>,
    sentences: impl IntoIterator<Item = Sentence>,
  ) -> Module
  {
    Module {
      name      : name.into(),
      imports   : imports.into_iter().collect(),
      sentences : sentences.into_iter().collect(),
      attributes: Attributes::default(),
    }
  }

  /// Adds `name` to the imports unless it is already imported.
  pub fn add_import(&mut self, name: IString) {
    if !self.imports.contains(&name) {
      self.imports.push(name);
    }
  }

  pub fn imports_directly(&self, name: &str) -> bool {
    self.imports.iter().any(|import| &**import == name)
  }

  pub fn productions(&self) -> impl Iterator<Item = &Production> {
    productions(self.sentences.iter())
  }

  /// The sorts defined by local sentences, either as the sort of a production or by a bare sort declaration.
  pub fn local_sorts(&self) -> BTreeSet<Sort> {
    defined_sorts(self.sentences.iter())
  }

  /// Formats the module for display with `prefix` for each line. The `Debug` impl defers to this method. Interior
  /// indentation is affixed to `prefix`.
  fn debug_fmt(&self, f: &mut Formatter<'_>, prefix: &str) -> std::fmt::Result {
    let inner_prefix = format!("{}{}", prefix, " ".repeat(DISPLAY_INDENT));
    writeln!(f, "{}Module {{", prefix)?;
    writeln!(f, "{}name: {}", inner_prefix, self.name)?;
    if !self.imports.is_empty() {
      writeln!(f, "{}imports: [{}]", inner_prefix, join_string(self.imports.iter(), ", "))?;
    }
    if !self.attributes.is_empty() {
      writeln!(f, "{}attributes: [{}]", inner_prefix, self.attributes)?;
    }
    let sorts: Vec<Sort> = self.local_sorts().into_iter().collect();
    if !sorts.is_empty() {
      writeln!(f, "{}sorts: [{}]", inner_prefix, join_string(sorts.iter(), ", "))?;
    }
    let productions: Vec<&Production> = self.productions().collect();
    if !productions.is_empty() {
      format_named_list(f, inner_prefix.as_str(), "productions", &productions)?
    }
    writeln!(f, "{}}}", prefix)
  }
}

impl Debug for Module {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.debug_fmt(f, "")
  }
}

impl Display for Module {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "module {}", self.name)?;
    for import in self.imports.iter() {
      writeln!(f, "  imports {}", import)?;
    }
    for sentence in self.sentences.iter() {
      writeln!(f, "  {}", sentence)?;
    }
    write!(f, "endmodule")
  }
}


/// Helper function to format a named list of something:
/// ```txt
/// thing_name: [
///   thing1
///   thing2
///   thing3
/// ]
/// ```
fn format_named_list<T: Display>(f: &mut Formatter<'_>, prefix: &str, name: &str, list: &[T])
  -> std::fmt::Result
{
  let tab = " ".repeat(DISPLAY_INDENT);
  writeln!(f, "{}{}: [", prefix, name)?;
  for item in list.iter() {
    writeln!(f, "{}{}{}", prefix, tab, item)?;
  }
  writeln!(f, "{}]", prefix)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::production::ProductionItem;

  fn exp_module() -> Module {
    Module::new(
      "EXP",
      [IString::from("BOOL")],
      [
        Sentence::SyntaxSort(Sort::from("Exp")),
        Production::new(
          "Exp",
          vec![
            ProductionItem::non_terminal("Exp"),
            ProductionItem::terminal("+"),
            ProductionItem::non_terminal("Exp"),
          ],
        ).into(),
        Production::injection("Stmt", "Exp").into(),
      ],
    )
  }

  #[test]
  fn local_sorts_and_productions() {
    let module = exp_module();
    let sorts: Vec<String> = module.local_sorts().iter().map(|s| s.to_string()).collect();
    assert_eq!(sorts, vec!["Exp", "Stmt"]);
    assert_eq!(module.productions().count(), 2);
    assert!(module.imports_directly("BOOL"));
  }

  #[test]
  fn add_import_is_idempotent() {
    let mut module = exp_module();
    module.add_import(IString::from("K"));
    module.add_import(IString::from("K"));
    assert_eq!(module.imports, vec![IString::from("BOOL"), IString::from("K")]);
  }

  #[test]
  fn debug_lists_contents() {
    let rendered = format!("{:?}", exp_module());
    assert!(rendered.contains("name: EXP"));
    assert!(rendered.contains("imports: [BOOL]"));
    assert!(rendered.contains(r#"Exp ::= Exp "+" Exp"#));
  }
}
