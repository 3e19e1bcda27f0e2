/*!

The object model the grammar transforms operate on.

|                 | Represents                              | Identity                  |
|:----------------|:----------------------------------------|:--------------------------|
| `Sort`          | a syntactic category (nonterminal)      | name                      |
| `Production`    | one grammar rule                        | structural                |
| `Sentence`      | one local declaration of a module       | structural                |
| `Module`        | named set of sentences plus import names | structural, shared by `Arc` |
| `Definition`    | index from module names to modules      | layered over a shared base |

Everything here is an immutable value once built. Transforms clone what they keep and construct what they change, so
the shared base definition can be read from several threads at once without locking.

*/

pub mod sort;
pub mod attributes;
pub mod production;
pub mod sentence;
pub mod module;
pub mod definition;
pub mod error;

// Reexports to flatten some of the smaller modules
pub use attributes::{AttributeValue, Attributes};
pub use definition::Definition;
pub use error::GrammarError;
pub use module::{ArcModule, Module};
pub use production::{Location, Production, ProductionItem};
pub use sentence::Sentence;
pub use sort::{Sort, SortTable};
