/*!

A `CompactIntSet` is a set of small natural numbers, used for sets of sorts, terminals, and productions. Such sets
are overwhelmingly empty or singletons in practice, so the set has three representations:

| Mode        | Cardinality | Storage                         |
|:------------|:------------|:--------------------------------|
| `Empty`     | 0           | nothing                         |
| `Singleton` | 1           | the value inline, no allocation |
| `Vector`    | 2 or more   | a dense `bit_set::BitSet`       |

The mode always matches the true cardinality. Every mutating operation that can shrink the set (only
`intersect_in_place`) demotes a `Vector` back to `Singleton` or `Empty` when at most one member remains, so that
later operations on the set stay cheap. Because the representation is an enum, there is no stale data left behind in
an unused mode.

*/

use std::fmt::{Debug, Display, Formatter};

use bit_set::BitSet;

use crate::abstractions::join_string;

/// The observable representation of a `CompactIntSet`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SetMode {
  Empty,
  Singleton,
  Vector,
}

#[derive(Clone, Default)]
enum Repr {
  #[default]
  Empty,
  Singleton(usize),
  // Invariant: holds at least two members.
  Vector(BitSet),
}

#[derive(Clone, Default)]
pub struct CompactIntSet {
  repr: Repr,
}

impl CompactIntSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn singleton(value: usize) -> Self {
    CompactIntSet {
      repr: Repr::Singleton(value),
    }
  }

  /// The set `{0, 1, …, n - 1}`.
  pub fn with_range(n: usize) -> Self {
    let mut set = Self::new();
    set.fill_range(n);
    set
  }

  pub fn mode(&self) -> SetMode {
    match self.repr {
      Repr::Empty        => SetMode::Empty,
      Repr::Singleton(_) => SetMode::Singleton,
      Repr::Vector(_)    => SetMode::Vector,
    }
  }

  /// The number of members.
  pub fn len(&self) -> usize {
    match &self.repr {
      Repr::Empty        => 0,
      Repr::Singleton(_) => 1,
      Repr::Vector(bits) => bits.len(),
    }
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    matches!(self.repr, Repr::Empty)
  }

  /// One more than the largest member, or 0 for the empty set.
  pub fn length(&self) -> usize {
    match &self.repr {
      Repr::Empty        => 0,
      Repr::Singleton(v) => v + 1,
      Repr::Vector(bits) => bits.iter().last().map_or(0, |v| v + 1),
    }
  }

  pub fn contains(&self, value: usize) -> bool {
    match &self.repr {
      Repr::Empty        => false,
      Repr::Singleton(v) => *v == value,
      Repr::Vector(bits) => bits.contains(value),
    }
  }

  /// Inserts `value`, returning `true` if it was not already a member.
  pub fn insert(&mut self, value: usize) -> bool {
    match &mut self.repr {

      Repr::Empty => {
        self.repr = Repr::Singleton(value);
        true
      }

      Repr::Singleton(v) => {
        if *v == value {
          return false;
        }
        self.repr = Repr::Vector(pair(*v, value));
        true
      }

      Repr::Vector(bits) => bits.insert(value),

    }
  }

  /// Inserts every value in `0..n`.
  pub fn fill_range(&mut self, n: usize) {
    let range = match n {
      0 => return,
      1 => Repr::Singleton(0),
      _ => {
        let mut bits = BitSet::with_capacity(n);
        for i in 0..n {
          bits.insert(i);
        }
        Repr::Vector(bits)
      }
    };

    if self.is_empty() {
      self.repr = range;
    } else {
      self.union_in_place(&CompactIntSet { repr: range });
    }
  }

  /// Replaces `self` with `self ∪ other`.
  pub fn union_in_place(&mut self, other: &CompactIntSet) {
    let repr = std::mem::take(&mut self.repr);
    self.repr = match (repr, &other.repr) {
      (repr, Repr::Empty) => repr,

      (Repr::Empty, other_repr) => other_repr.clone(),

      (Repr::Singleton(a), Repr::Singleton(b)) => {
        if a == *b {
          Repr::Singleton(a)
        } else {
          Repr::Vector(pair(a, *b))
        }
      }

      (Repr::Singleton(a), Repr::Vector(other_bits)) => {
        let mut bits = other_bits.clone();
        bits.insert(a);
        Repr::Vector(bits)
      }

      (Repr::Vector(mut bits), Repr::Singleton(b)) => {
        bits.insert(*b);
        Repr::Vector(bits)
      }

      (Repr::Vector(mut bits), Repr::Vector(other_bits)) => {
        bits.union_with(other_bits);
        Repr::Vector(bits)
      }
    };
  }

  /// Replaces `self` with `self ∩ other`, demoting the representation when one or zero members remain.
  pub fn intersect_in_place(&mut self, other: &CompactIntSet) {
    let repr = std::mem::take(&mut self.repr);
    self.repr = match (repr, &other.repr) {
      (Repr::Empty, _) | (_, Repr::Empty) => Repr::Empty,

      (Repr::Singleton(a), _) => {
        if other.contains(a) { Repr::Singleton(a) } else { Repr::Empty }
      }

      (Repr::Vector(bits), Repr::Singleton(b)) => {
        if bits.contains(*b) { Repr::Singleton(*b) } else { Repr::Empty }
      }

      (Repr::Vector(mut bits), Repr::Vector(other_bits)) => {
        bits.intersect_with(other_bits);
        demote(bits)
      }
    };
  }

  /// Whether `self ∩ other` is nonempty. The intersection is never materialized.
  pub fn intersects(&self, other: &CompactIntSet) -> bool {
    match (&self.repr, &other.repr) {
      (Repr::Empty, _) | (_, Repr::Empty)           => false,
      (Repr::Singleton(a), _)                       => other.contains(*a),
      (_, Repr::Singleton(b))                       => self.contains(*b),
      (Repr::Vector(bits), Repr::Vector(other_bits)) => !bits.is_disjoint(other_bits),
    }
  }

  /// The smallest member `>= from`, if any.
  pub fn next_set_bit(&self, from: usize) -> Option<usize> {
    match &self.repr {
      Repr::Empty        => None,
      Repr::Singleton(v) => (*v >= from).then_some(*v),
      Repr::Vector(bits) => bits.iter().find(|v| *v >= from),
    }
  }

  /// Iterates over the members in ascending order.
  pub fn iter(&self) -> CompactIntSetIter<'_> {
    let inner = match &self.repr {
      Repr::Empty        => IterInner::Single(None),
      Repr::Singleton(v) => IterInner::Single(Some(*v)),
      Repr::Vector(bits) => IterInner::Bits(bits.iter()),
    };
    CompactIntSetIter { inner }
  }
}

/// A two element bit vector.
fn pair(a: usize, b: usize) -> BitSet {
  let mut bits = BitSet::new();
  bits.insert(a);
  bits.insert(b);
  bits
}

/// Chooses the minimal representation for the contents of `bits`.
fn demote(bits: BitSet) -> Repr {
  let (first, second) = {
    let mut members = bits.iter();
    (members.next(), members.next())
  };
  match (first, second) {
    (None, _)           => Repr::Empty,
    (Some(v), None)     => Repr::Singleton(v),
    (Some(_), Some(_))  => Repr::Vector(bits),
  }
}

pub struct CompactIntSetIter<'a> {
  inner: IterInner<'a>,
}

enum IterInner<'a> {
  Single(Option<usize>),
  Bits(bit_set::Iter<'a, u32>),
}

impl<'a> Iterator for CompactIntSetIter<'a> {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    match &mut self.inner {
      IterInner::Single(value) => value.take(),
      IterInner::Bits(bits)    => bits.next(),
    }
  }
}

impl<'a> IntoIterator for &'a CompactIntSet {
  type Item     = usize;
  type IntoIter = CompactIntSetIter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl FromIterator<usize> for CompactIntSet {
  fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
    let mut set = CompactIntSet::new();
    set.extend(iter);
    set
  }
}

impl Extend<usize> for CompactIntSet {
  fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
    for value in iter {
      self.insert(value);
    }
  }
}

impl PartialEq for CompactIntSet {
  fn eq(&self, other: &Self) -> bool {
    self.mode() == other.mode() && self.iter().eq(other.iter())
  }
}

impl Eq for CompactIntSet {}

impl Display for CompactIntSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{{{}}}", join_string(self.iter(), ", "))
  }
}

impl Debug for CompactIntSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}{}", self.mode(), self)
  }
}


#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use rand::{rngs::StdRng, Rng, SeedableRng};

  use super::*;

  /// The mode must agree with the cardinality reported by a reference set.
  fn assert_mode_matches(set: &CompactIntSet, oracle: &BTreeSet<usize>) {
    let expected = match oracle.len() {
      0 => SetMode::Empty,
      1 => SetMode::Singleton,
      _ => SetMode::Vector,
    };
    assert_eq!(set.mode(), expected, "set {:?} vs oracle {:?}", set, oracle);
    assert_eq!(set.len(), oracle.len());
    assert!(set.iter().eq(oracle.iter().copied()));
  }

  fn random_set(rng: &mut StdRng) -> (CompactIntSet, BTreeSet<usize>) {
    // Bias towards tiny sets, which is where the mode transitions happen.
    let size = match rng.random_range(0..4u8) {
      0 => 0,
      1 => 1,
      2 => 2,
      _ => rng.random_range(0..12usize),
    };
    let mut set    = CompactIntSet::new();
    let mut oracle = BTreeSet::new();
    for _ in 0..size {
      let v = rng.random_range(0..40usize);
      set.insert(v);
      oracle.insert(v);
    }
    (set, oracle)
  }

  #[test]
  fn insert_walks_through_modes() {
    let mut set = CompactIntSet::new();
    assert_eq!(set.mode(), SetMode::Empty);

    assert!(set.insert(7));
    assert_eq!(set.mode(), SetMode::Singleton);

    assert!(!set.insert(7));
    assert_eq!(set.mode(), SetMode::Singleton);

    assert!(set.insert(3));
    assert_eq!(set.mode(), SetMode::Vector);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 7]);
  }

  #[test]
  fn union_of_equal_singletons_stays_singleton() {
    let mut a = CompactIntSet::singleton(5);
    a.union_in_place(&CompactIntSet::singleton(5));
    assert_eq!(a.mode(), SetMode::Singleton);

    a.union_in_place(&CompactIntSet::new());
    assert_eq!(a.mode(), SetMode::Singleton);

    let mut empty = CompactIntSet::new();
    empty.union_in_place(&a);
    assert_eq!(empty, a);

    a.union_in_place(&CompactIntSet::singleton(6));
    assert_eq!(a.mode(), SetMode::Vector);
  }

  #[test]
  fn intersection_demotes_vector() {
    let mut a: CompactIntSet = [1, 2, 3].into_iter().collect();
    let b: CompactIntSet     = [3, 4, 5].into_iter().collect();
    a.intersect_in_place(&b);
    assert_eq!(a.mode(), SetMode::Singleton);
    assert!(a.contains(3));

    let mut c: CompactIntSet = [1, 2].into_iter().collect();
    c.intersect_in_place(&b);
    assert_eq!(c.mode(), SetMode::Empty);

    let mut d: CompactIntSet = [1, 2, 9].into_iter().collect();
    d.intersect_in_place(&CompactIntSet::singleton(9));
    assert_eq!(d, CompactIntSet::singleton(9));
  }

  #[test]
  fn next_set_bit_and_length() {
    let set: CompactIntSet = [2, 10, 33].into_iter().collect();
    assert_eq!(set.next_set_bit(0), Some(2));
    assert_eq!(set.next_set_bit(3), Some(10));
    assert_eq!(set.next_set_bit(33), Some(33));
    assert_eq!(set.next_set_bit(34), None);
    assert_eq!(set.length(), 34);

    let single = CompactIntSet::singleton(4);
    assert_eq!(single.next_set_bit(4), Some(4));
    assert_eq!(single.next_set_bit(5), None);
    assert_eq!(single.length(), 5);

    assert_eq!(CompactIntSet::new().length(), 0);
    assert_eq!(CompactIntSet::new().next_set_bit(0), None);
  }

  #[test]
  fn fill_range_sets_prefix() {
    assert_eq!(CompactIntSet::with_range(0).mode(), SetMode::Empty);
    assert_eq!(CompactIntSet::with_range(1), CompactIntSet::singleton(0));

    let set = CompactIntSet::with_range(5);
    assert_eq!(set.mode(), SetMode::Vector);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(set.length(), 5);
    assert_eq!(CompactIntSet::with_range(2).mode(), SetMode::Vector);
  }

  #[test]
  fn fill_range_merges_with_members() {
    let mut set = CompactIntSet::singleton(0);
    set.fill_range(1);
    assert_eq!(set.mode(), SetMode::Singleton);

    let mut set = CompactIntSet::singleton(9);
    set.fill_range(3);
    assert_eq!(set.mode(), SetMode::Vector);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 9]);

    let mut set: CompactIntSet = [1, 40].into_iter().collect();
    set.fill_range(0);
    set.fill_range(4);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 40]);
    assert_eq!(set.len(), 5);
  }

  #[test]
  fn clone_is_independent() {
    let source: CompactIntSet = [1, 8].into_iter().collect();
    let mut copy = source.clone();
    copy.insert(20);
    copy.intersect_in_place(&CompactIntSet::singleton(20));
    assert_eq!(copy, CompactIntSet::singleton(20));
    assert_eq!(source.iter().collect::<Vec<_>>(), vec![1, 8]);

    let single = CompactIntSet::singleton(3);
    let mut copy = single.clone();
    copy.insert(4);
    assert_eq!(single.mode(), SetMode::Singleton);
  }

  #[test]
  fn random_operation_sequences_keep_mode_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5EED_1234);

    for _ in 0..500 {
      let (mut set, mut oracle) = random_set(&mut rng);
      assert_mode_matches(&set, &oracle);

      for _ in 0..8 {
        let (other, other_oracle) = random_set(&mut rng);

        let expected_intersects = oracle.iter().any(|v| other_oracle.contains(v));
        assert_eq!(set.intersects(&other), expected_intersects);
        assert_eq!(other.intersects(&set), expected_intersects);

        match rng.random_range(0..3u8) {
          0 => {
            let v = rng.random_range(0..40usize);
            set.insert(v);
            oracle.insert(v);
          }
          1 => {
            set.union_in_place(&other);
            oracle.extend(other_oracle.iter().copied());
          }
          _ => {
            set.intersect_in_place(&other);
            oracle.retain(|v| other_oracle.contains(v));
          }
        }
        assert_mode_matches(&set, &oracle);
        assert_eq!(set.length(), oracle.iter().next_back().map_or(0, |v| v + 1));
      }
    }
  }

  #[test]
  fn display_lists_members() {
    let set: CompactIntSet = [4, 1].into_iter().collect();
    assert_eq!(set.to_string(), "{1, 4}");
    assert_eq!(CompactIntSet::new().to_string(), "{}");
  }
}
