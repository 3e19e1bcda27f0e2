use std::collections::hash_map::Entry;

use crate::{
  abstractions::{CompactIntSet, HashMap},
  core::sort::Sort,
};

/// Assigns dense indices to sorts so that sets of sorts can be represented as `CompactIntSet`s. Indices are handed
/// out in first-seen order, so interning sorts from an ordered collection gives a deterministic numbering.
#[derive(Default)]
pub struct SortTable {
  indices: HashMap<Sort, usize>,
  sorts  : Vec<Sort>,
}

impl SortTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the index of `sort`, assigning a fresh one if the sort has not been seen.
  pub fn intern(&mut self, sort: &Sort) -> usize {
    match self.indices.entry(sort.clone()) {
      Entry::Occupied(entry) => *entry.get(),
      Entry::Vacant(entry) => {
        let index = self.sorts.len();
        self.sorts.push(sort.clone());
        entry.insert(index);
        index
      }
    }
  }

  pub fn index_of(&self, sort: &Sort) -> Option<usize> {
    self.indices.get(sort).copied()
  }

  /// The sort with the given index. Indices come from `intern`, so an unknown index is a programmer error.
  pub fn sort(&self, index: usize) -> &Sort {
    &self.sorts[index]
  }

  /// Interns every sort yielded by `sorts` and returns the set of their indices.
  pub fn intern_all<'a>(&mut self, sorts: impl IntoIterator<Item = &'a Sort>) -> CompactIntSet {
    sorts.into_iter().map(|sort| self.intern(sort)).collect()
  }

  /// The set of indices of those sorts in `sorts` that are already interned. Unknown sorts are ignored.
  pub fn set_of<'a>(&self, sorts: impl IntoIterator<Item = &'a Sort>) -> CompactIntSet {
    sorts.into_iter().filter_map(|sort| self.index_of(sort)).collect()
  }

  /// Resolves a set of indices back to sorts, in index order.
  pub fn sorts_in<'s>(&'s self, set: &'s CompactIntSet) -> impl Iterator<Item = &'s Sort> + 's {
    set.iter().map(move |index| self.sort(index))
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.sorts.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.sorts.is_empty()
  }
}
