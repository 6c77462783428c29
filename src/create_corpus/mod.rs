mod compiler;
mod create_corpus;
mod output_path;
mod run_compilations;

pub use self::{compiler::*, create_corpus::*, output_path::*, run_compilations::*};
