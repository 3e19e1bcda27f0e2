use std::iter::once;
use std::fmt::Display;

/**
Interleaves a separator between the items of an iterator. The separator is computed from the item that follows it,
which lets callers vary it, though every caller in this crate uses a constant.

    # use kgrammar::abstractions::join_iter;
    let items = ["Exp", "\",\"", "Exps"].iter().cloned();
    let joined = join_iter(items, |_| " ").collect::<String>();
    // "Exp \",\" Exps"
 */
pub fn join_iter<T>(mut iter: impl Iterator<Item = T>, sep: impl Fn(&T) -> T)
                    -> impl Iterator<Item = T>
{
  iter
      .next()
      .into_iter()
      .chain(iter.flat_map(move |s| once(sep(&s)).chain(once(s))))
}

/// Displays each item and joins the results with `sep`. Used to render production item sequences, import lists, and
/// attribute lists.
pub fn join_string<T: Display>(iter: impl Iterator<Item = T>, sep: &str) -> String {
  join_iter(iter.map(|t| t.to_string()), |_| sep.to_string()).collect::<String>()
}

#[cfg(test)]
mod tests {
  use super::{join_iter, join_string};

  #[test]
  fn join_items_with_computed_separator() {
    let iter   = ["<k>", "K", "</k>"].iter().cloned();
    let joined = join_iter(iter, |_| " ").collect::<String>();
    assert_eq!(joined, "<k> K </k>");

    let empty: Vec<&str> = vec![];
    assert_eq!(join_iter(empty.into_iter(), |_| ", ").collect::<String>(), "");
  }

  #[test]
  fn join_displayable_items() {
    let sorts = ["Exp", "Exps", "Stmt"];
    assert_eq!(join_string(sorts.iter(), ", "), "Exp, Exps, Stmt");
    assert_eq!(join_string([42].iter(), ", "), "42");
  }
}
