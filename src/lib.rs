/*!

Grammar synthesis for K definitions. Given a user module, the grammar assembler derives the grammars used to parse
rule bodies, configurations, and programs: it adds casts between sorts, makes cell syntax tolerant of partial content,
adds follow restrictions to terminals that prefix other terminals, and desugars user lists.

```ignore
let config    = Arc::new(GrammarConfig::default());
let assembler = GrammarAssembler::new(base_definition(&config), config, false)?;
let mut user  = assembler.user_definition();
user.insert(my_module);
let bundle = assembler.program_grammar(&Arc::new(user), "MY-MODULE")?;
```

*/

pub mod abstractions;
pub mod core;
pub mod grammar;

// We re-export abstractions that are meant to be used publicly.
pub use abstractions::{
  log,
  IString
};

pub use crate::core::{Definition, GrammarError, Module, Production, ProductionItem, Sentence, Sort};
pub use grammar::{base_definition, GrammarAssembler, GrammarBundle, GrammarConfig, GrammarMode};
