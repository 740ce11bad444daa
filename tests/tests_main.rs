#[path = "helpers/mod.rs"]
mod helpers;

#[path = "parser/mod.rs"]
mod parser;

#[path = "hir/mod.rs"]
mod hir;

#[path = "emit/mod.rs"]
mod emit;

#[path = "project/mod.rs"]
mod project;
