use std::sync::Arc;

use once_cell::sync::Lazy;

use kgrammar::{
  base_definition,
  core::Attributes,
  log::set_global_logging_threshold,
  GrammarAssembler,
  GrammarConfig,
  GrammarError,
  GrammarMode,
  IString,
  Module,
  Production,
  ProductionItem,
  Sentence,
  Sort,
};

static CONFIG: Lazy<Arc<GrammarConfig>> = Lazy::new(|| Arc::new(GrammarConfig::default()));

fn nt(sort: &str) -> ProductionItem {
  ProductionItem::non_terminal(sort)
}

fn t(text: &str) -> ProductionItem {
  ProductionItem::terminal(text)
}

fn lambda_module() -> Module {
  let list = Attributes::new().with("userList", "*");
  let cell = Attributes::new().with_flag("cell");

  Module::new(
    "LAMBDA",
    [IString::from("K")],
    [
      Sentence::SyntaxSort(Sort::from("Exp")),
      Sentence::SyntaxSort(Sort::from("Id")),
      Production::injection("Exp", "Id").into(),
      Production::new("Exp", vec![t("lambda"), nt("Id"), t("."), nt("Exp")]).with_label("lambda").into(),
      Production::new("Exp", vec![nt("Exp"), nt("Exp")]).with_label("app").into(),
      Production::new("Exp", vec![t("("), nt("Exp"), t(")")]).with_label("brackets").into(),
      Production::new("Exp", vec![t("let"), nt("Id"), t("="), nt("Exp"), t("in"), nt("Exp")]).with_label("let").into(),
      Production::new("Exp", vec![nt("Exp"), t("=="), nt("Exp")]).with_label("_==_").into(),
      Production::new("Exp", vec![t("tuple"), t("("), nt("Exps"), t(")")]).with_label("tuple").into(),
      Production::new("Exps", vec![nt("Exp"), t(","), nt("Exps")]).with_label("_,_").with_attributes(list.clone()).into(),
      Production::new("Exps", vec![t(".Exps")]).with_label(".Exps").with_attributes(list).into(),
      Production::new("TCell", vec![t("<T>"), nt("KCell"), nt("EnvCell"), t("</T>")])
          .with_label("<T>")
          .with_attributes(cell.clone())
          .into(),
      Production::new("KCell", vec![t("<k>"), nt("K"), t("</k>")]).with_label("<k>").with_attributes(cell.clone()).into(),
      Production::new("EnvCell", vec![t("<env>"), nt("Map"), t("</env>")]).with_label("<env>").with_attributes(cell).into(),
    ],
  )
}

fn main() -> Result<(), GrammarError> {
  set_global_logging_threshold(2);

  let assembler  = GrammarAssembler::new(base_definition(&CONFIG), Arc::clone(&CONFIG), false)?;
  let mut user   = assembler.user_definition();
  user.insert(lambda_module());
  let definition = Arc::new(user);

  for mode in [GrammarMode::Rule, GrammarMode::Config, GrammarMode::Program] {
    let bundle = assembler.bundle(&definition, "LAMBDA", mode)?;
    println!("== {} grammar ==", mode);
    println!("{}", bundle.disambiguation);
    if !Arc::ptr_eq(&bundle.disambiguation, &bundle.parse) {
      println!("{}", bundle.parse);
    }
    println!("{} sentences visible to the parser\n", bundle.parse_sentences()?.len());
  }

  Ok(())
}
