/*!

Types/type aliases that abstract over the implementing backing type.

A motivating example is `IString`, an interned string. Several crates provide interning, and the grammar transforms
compare sort names and terminal text constantly, so the choice of backing crate is made once here and the rest of the
codebase only ever names `IString`. The same goes for `CompactIntSet`, whose vector mode is backed by `bit-set`.

*/

mod compact_int_set;
mod string_join;

// Logging
pub mod log;

// A set of small natural numbers with an allocation-free representation for zero or one members.
pub use compact_int_set::{CompactIntSet, CompactIntSetIter, SetMode};

// Interned string.
pub use string_cache::DefaultAtom as IString;

// Join sequences with a separator
pub use string_join::{join_iter, join_string};

// Hash containers. Ordered containers come straight from `std::collections` because transform output must be
// deterministic.
pub use std::collections::{HashMap, HashSet};
