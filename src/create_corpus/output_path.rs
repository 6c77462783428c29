use crate::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub const COMPILED_EXTENSION: &str = "protobuf";

/// Mirrors `source` from `input_root` into `output_root`, swapping its extension for
/// [`COMPILED_EXTENSION`].
pub fn compilation_output_path(
    source: &Path,
    input_root: &Path,
    output_root: &Path,
) -> Result<PathBuf, Error> {
    let relative = pathdiff::diff_paths(source, input_root)
        .filter(|rel| !rel.starts_with(".."))
        .ok_or_else(|| Error::RelativePath {
            path: source.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;
    Ok(output_root.join(relative).with_extension(COMPILED_EXTENSION))
}

pub fn ensure_parent_directory(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        // create_dir_all tolerates directories created concurrently by other workers.
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
