use crate::Error;
use log::warn;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{copy, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn compute_hash(read: &mut impl Read) -> Result<String, Error> {
    let mut hasher = Sha256::new();
    copy(read, &mut hasher)?;
    let hash = hex::encode(hasher.finalize());
    Ok(hash)
}

/// Lazily walks `root` recursively and yields every regular file whose extension
/// is accepted by `matches_extension`.
///
/// Each call starts a fresh traversal. Symlinked directories are not entered, symlinks to
/// files are yielded and dangling links are skipped. Unreadable directories are skipped
/// with a warning.
pub fn find_files<F>(root: &Path, matches_extension: F) -> impl Iterator<Item = PathBuf>
where
    F: Fn(&str) -> bool,
{
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(move |path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| matches_extension(ext))
        })
        // is_file follows the link, so file symlinks count and dangling ones do not.
        .filter(|path| path.is_file())
}

/// Absolute form of `path` for messages, resolving as much of it as exists.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if parent.as_os_str().is_empty() => {
            resolve_path(Path::new(".")).join(name)
        }
        (Some(parent), Some(name)) => resolve_path(parent).join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(root: &Path, ext: &str) -> Vec<PathBuf> {
        let mut files: Vec<_> = find_files(root, |e| e == ext).collect();
        files.sort();
        files
    }

    #[test]
    fn test_compute_hash_is_sha256() {
        let hash = compute_hash(&mut "abc".as_bytes()).unwrap();
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_find_files_recurses_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested").join("deeper")).unwrap();
        fs::write(root.join("top.js"), "1").unwrap();
        fs::write(root.join("nested").join("mid.js"), "2").unwrap();
        fs::write(root.join("nested").join("deeper").join("low.js"), "3").unwrap();
        fs::write(root.join("nested").join("readme.txt"), "4").unwrap();

        let files = collect(root, "js");
        assert_eq!(
            files,
            vec![
                root.join("nested").join("deeper").join("low.js"),
                root.join("nested").join("mid.js"),
                root.join("top.js"),
            ]
        );
    }

    #[test]
    fn test_find_files_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("looks_like.js")).unwrap();
        fs::write(root.join("looks_like.js").join("inner.js"), "x").unwrap();

        let files = collect(root, "js");
        assert_eq!(files, vec![root.join("looks_like.js").join("inner.js")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_files_skips_dangling_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("missing.js"), root.join("dangling.js")).unwrap();
        fs::write(root.join("real.js"), "x").unwrap();

        assert_eq!(collect(root, "js"), vec![root.join("real.js")]);
    }

    #[test]
    fn test_find_files_is_restartable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.fil"), "x").unwrap();

        assert_eq!(collect(root, "fil").len(), 1);
        assert_eq!(collect(root, "fil").len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_files_does_not_enter_symlinked_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("corpus");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("seed.fil"), "x").unwrap();
        std::os::unix::fs::symlink(&root, root.join("sub").join("loop")).unwrap();

        assert_eq!(collect(&root, "fil"), vec![root.join("sub").join("seed.fil")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_files_yields_symlinked_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("target.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.js")).unwrap();

        assert_eq!(collect(root, "js"), vec![root.join("link.js")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_files_skips_unreadable_directories() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.js"), "x").unwrap();
        fs::write(root.join("visible.js"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read the directory.
        let readable = fs::read_dir(&locked).is_ok();
        let files = collect(root, "js");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if readable {
            assert_eq!(files.len(), 2);
        } else {
            assert_eq!(files, vec![root.join("visible.js")]);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_find_files_accepts_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let name = OsStr::from_bytes(b"caf\xe9.js");
        fs::write(root.join(name), "x").unwrap();

        assert_eq!(collect(root, "js"), vec![root.join(name)]);
    }

    #[test]
    fn test_resolve_path_of_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").join("deeper");

        let resolved = resolve_path(&missing);
        assert!(resolved.is_absolute());
        assert_eq!(
            resolved,
            fs::canonicalize(temp_dir.path())
                .unwrap()
                .join("missing")
                .join("deeper")
        );
    }
}
