/*!

Grammar generation. Every transform here takes modules and returns new modules; nothing is edited in place.

| Module      | Responsibility                                                  |
|:------------|:----------------------------------------------------------------|
| `config`    | marker names, reserved sorts, attribute keys, `Capability`      |
| `base`      | a minimal base definition built in code                         |
| `casts`     | cast and diamond productions for user sorts                     |
| `cells`     | bracket-tolerant cell productions for rule grammars             |
| `follow`    | follow restrictions for terminals that prefix other terminals   |
| `lists`     | user-list recognition and desugaring                            |
| `assembler` | sequencing the above into a `GrammarBundle`                     |

*/

pub mod assembler;
pub mod base;
pub mod casts;
pub mod cells;
pub mod config;
pub mod follow;
pub mod lists;


pub use assembler::{top_sort_injections, GrammarAssembler, GrammarBundle, GrammarMode};
pub use base::base_definition;
pub use casts::CastSynthesizer;
pub use cells::{CellBracketRewriter, CellKind, ConfigurationInfo};
pub use config::{Capabilities, Capability, GrammarConfig};
pub use follow::{FollowRestrictionDisambiguator, TerminalIndex};
pub use lists::{ListDesugarer, UserListSpec};
