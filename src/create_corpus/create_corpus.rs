use super::{run_compilations, CompileSummary, Compiler};
use crate::utils::{find_files, resolve_path};
use crate::Error;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SOURCE_EXTENSION: &str = "js";

pub fn iter_js_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    find_files(root, |ext| ext == SOURCE_EXTENSION)
}

/// Compiles every JavaScript file below `input_dir` into a mirrored tree below `output_dir`.
pub fn create_corpus(
    input_dir: &Path,
    output_dir: &Path,
    compiler: Compiler,
    workers: usize,
) -> Result<CompileSummary, Error> {
    if !input_dir.is_dir() {
        return Err(Error::InputDirNotFound(resolve_path(input_dir)));
    }
    let input_dir = fs::canonicalize(input_dir)?;

    fs::create_dir_all(output_dir)?;
    let output_dir = fs::canonicalize(output_dir)?;

    let sources: Vec<_> = iter_js_files(&input_dir).collect();
    if sources.is_empty() {
        return Ok(CompileSummary::default());
    }

    info!(
        "compiling {} file(s) from {} into {} with {} worker(s)",
        sources.len(),
        input_dir.display(),
        output_dir.display(),
        workers
    );
    run_compilations(sources, input_dir, output_dir, Arc::new(compiler), workers)
}
