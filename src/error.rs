use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("Corpus directory not found: {}", .0.display())]
    CorpusDirNotFound(PathBuf),

    /// The `--compiler` command line could not be split into a program and its arguments.
    #[error("Invalid compiler command: {0:?}")]
    InvalidCompiler(String),

    #[error("{} is not located under {}", .path.display(), .root.display())]
    RelativePath { path: PathBuf, root: PathBuf },

    #[error("Failed to run compiler on {}: {source}", .path.display())]
    Spawn { path: PathBuf, source: io::Error },

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
