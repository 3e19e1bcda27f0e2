/*!

A sort (represented in code by the [`Sort`](crate::core::sort::Sort) struct) is a syntactic category, i.e. a
nonterminal of the grammar. Unlike a full order-sorted signature, the grammar layer does not need the subsort lattice
itself: the lattice is *encoded into the grammar* by the productions that the cast synthesizer adds. What the grammar
layer does need is to classify sorts and to manipulate sets of them cheaply.

## Reserved Sorts

Two families of sorts never receive generated syntax (casts, top/bottom diamonds, list desugaring):

 1. the builtin K sorts (`K`, `KItem`, `KBott`, `KLabel`, `KList`, …), listed in the
    [`GrammarConfig`](crate::grammar::GrammarConfig), and
 2. *internal* sorts, whose names begin with the reserved marker character `#` (for example `#OptionalDots`).

Whether a sort is reserved depends on the configuration, so the test lives on `GrammarConfig::is_parser_sort`
rather than on `Sort`.

## Sets of Sorts

Transforms that need set algebra over sorts first intern them in a [`SortTable`](crate::core::sort::SortTable), which
assigns each sort a dense index, and then work with [`CompactIntSet`](crate::abstractions::CompactIntSet)s of
indices. A table only lives for the duration of one transform invocation.

*/

pub mod sort;
pub mod collection;

pub use sort::*;
pub use collection::SortTable;
