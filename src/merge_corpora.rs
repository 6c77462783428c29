use super::compute_hash;
use crate::utils::{find_files, resolve_path};
use crate::Error;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

pub const CORPUS_EXTENSIONS: [&str; 2] = ["protobuf", "fil"];

/// Digests of the files copied so far during one merge.
#[derive(Debug, Default)]
pub struct SeenDigests {
    digests: HashSet<String>,
}

impl SeenDigests {
    pub fn new() -> SeenDigests {
        SeenDigests::default()
    }

    /// Returns `false` if `digest` was already recorded.
    pub fn insert(&mut self, digest: String) -> bool {
        self.digests.insert(digest)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub copied: usize,
    pub skipped: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.copied + self.skipped
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Copied {} file(s), skipped {} duplicate(s).",
            self.copied, self.skipped
        )
    }
}

pub fn iter_corpus_files(corpus_dir: &Path) -> impl Iterator<Item = PathBuf> {
    find_files(corpus_dir, |ext| CORPUS_EXTENSIONS.contains(&ext))
}

/// Picks `destination_dir/<name>`, or the first free `<stem>_<n>.<ext>` if that is taken.
pub fn unique_destination(path: &Path, destination_dir: &Path) -> PathBuf {
    let target = destination_dir.join(path.file_name().unwrap_or_default());
    if !target.exists() {
        return target;
    }

    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();
    let mut counter = 1;
    loop {
        let mut file_name = OsString::new();
        file_name.push(stem);
        file_name.push(format!("_{}", counter));
        if let Some(extension) = extension {
            file_name.push(".");
            file_name.push(extension);
        }

        let candidate = destination_dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copies `from` to `to` and carries the access and modification times over when possible.
fn copy_with_times(from: &Path, to: &Path) -> Result<(), Error> {
    fs::copy(from, to)?;
    if let Err(err) = copy_times(from, to) {
        warn!("could not preserve timestamps of {}: {}", from.display(), err);
    }
    Ok(())
}

fn copy_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    // Setting explicit times needs ownership, not write access, so read-only copies work too.
    File::open(to)?.set_times(times)
}

pub fn copy_unique_files<I>(
    sources: I,
    destination_dir: &Path,
    seen: &mut SeenDigests,
) -> Result<MergeSummary, Error>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut summary = MergeSummary::default();

    for source in sources {
        let digest = compute_hash(&mut File::open(&source)?)?;
        if !seen.insert(digest) {
            debug!("skipping duplicate {}", source.display());
            summary.skipped += 1;
            continue;
        }

        let destination = unique_destination(&source, destination_dir);
        debug!("copying {} to {}", source.display(), destination.display());
        copy_with_times(&source, &destination)?;
        summary.copied += 1;
    }

    Ok(summary)
}

/// Merges the corpus files of all `corpora`, in order, into `output_dir`.
///
/// Every corpus directory is checked before anything is written.
pub fn merge_corpora(corpora: &[PathBuf], output_dir: &Path) -> Result<MergeSummary, Error> {
    let mut resolved = Vec::with_capacity(corpora.len());
    for corpus in corpora {
        if !corpus.is_dir() {
            return Err(Error::CorpusDirNotFound(resolve_path(corpus)));
        }
        resolved.push(fs::canonicalize(corpus)?);
    }

    fs::create_dir_all(output_dir)?;
    let output_dir = fs::canonicalize(output_dir)?;

    let mut sources = Vec::new();
    for corpus in &resolved {
        sources.extend(iter_corpus_files(corpus));
    }
    if sources.is_empty() {
        return Ok(MergeSummary::default());
    }

    info!(
        "merging {} file(s) from {} corpora into {}",
        sources.len(),
        resolved.len(),
        output_dir.display()
    );
    copy_unique_files(sources, &output_dir, &mut SeenDigests::new())
}
