/*!

Errors that abort the grammar build of a single module. Absent capabilities are not errors: a missing marker module
silently disables the corresponding generation step.

*/

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::{
  abstractions::IString,
  core::{
    production::Location,
    sort::Sort,
  },
};

pub enum GrammarError {
  /// A production tagged `cell` does not begin and end with terminals (the cell's brackets).
  MalformedCell {
    sort      : Sort,
    production: String,
    location  : Option<Location>,
  },

  /// An import names a module the definition does not contain. `importer` is `None` when the module was requested
  /// directly rather than through an import.
  UnknownModule {
    name    : IString,
    importer: Option<IString>,
  },

  /// The base definition lacks a module the grammar assembler cannot do without.
  MissingBaseModule {
    name: IString,
  },
}

impl Display for GrammarError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      GrammarError::MalformedCell { sort, production, location } => {
        if let Some(location) = location {
          write!(f, "{}: ", location)?;
        }
        write!(
          f,
          "malformed cell production for sort {}: a cell must begin and end with terminal brackets, found `{}`",
          sort,
          production
        )
      }

      GrammarError::UnknownModule { name, importer: Some(importer) } => {
        write!(f, "module {} imports unknown module {}", importer, name)
      }

      GrammarError::UnknownModule { name, importer: None } => {
        write!(f, "unknown module {}", name)
      }

      GrammarError::MissingBaseModule { name } => {
        write!(f, "the base definition does not contain the required module {}", name)
      }

    }
  }
}

impl Debug for GrammarError {
  fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for GrammarError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn malformed_cell_reports_sort_and_location() {
    let error = GrammarError::MalformedCell {
      sort      : Sort::from("KCell"),
      production: r#"KCell ::= K "</k>""#.to_string(),
      location  : Some(Location { source: "imp.k".into(), line: 12, column: 5 }),
    };
    let message = error.to_string();
    assert!(message.starts_with("imp.k:12:5: "));
    assert!(message.contains("sort KCell"));
  }
}
