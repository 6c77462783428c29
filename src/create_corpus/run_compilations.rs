use super::{compile_js_file, Compiler};
use crate::Error;
use log::debug;
use std::fmt;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

const MAX_WORKERS: usize = 32;

/// `min(32, cpus + 4)`: compilations mostly wait on the child process.
pub fn default_worker_count() -> usize {
    MAX_WORKERS.min(num_cpus::get() + 4)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl CompileSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl fmt::Display for CompileSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Compiled {} file(s), {} failed.",
            self.succeeded, self.failed
        )
    }
}

/// Submits one compilation per source to a pool of `workers` threads and tallies the
/// results as they complete.
///
/// A non-zero compiler exit only counts as a failure. Any other error aborts the batch.
pub fn run_compilations(
    sources: Vec<PathBuf>,
    input_root: PathBuf,
    output_root: PathBuf,
    compiler: Arc<Compiler>,
    workers: usize,
) -> Result<CompileSummary, Error> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|idx| format!("compile-{}", idx))
        .build()?;

    let input_root = Arc::new(input_root);
    let output_root = Arc::new(output_root);
    let (tx, rx) = mpsc::channel();

    for source in sources {
        let tx = tx.clone();
        let compiler = Arc::clone(&compiler);
        let input_root = Arc::clone(&input_root);
        let output_root = Arc::clone(&output_root);
        pool.spawn(move || {
            let result = compile_js_file(&compiler, &source, &input_root, &output_root);
            // The receiver is gone only if the batch already failed.
            let _ = tx.send(result);
        });
    }
    drop(tx);

    let mut summary = CompileSummary::default();
    for result in rx {
        let result = result?;
        if result.success {
            debug!("compiled {} to {}", result.source.display(), result.output.display());
            summary.succeeded += 1;
        } else {
            let stderr = result.error.unwrap_or_default();
            debug!("failed to compile {}: {}", result.source.display(), stderr.trim_end());
            summary.failed += 1;
        }
    }
    Ok(summary)
}
