use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

mod create_corpus;
mod error;
mod merge_corpora;
mod utils;

pub use error::Error;
pub use utils::compute_hash;

use create_corpus::{default_worker_count, Compiler};

#[derive(StructOpt, Debug)]
#[structopt(name = "fuzzil-corpus", about = "Helpers for managing FuzzIL corpora.")]
pub enum CliCommand {
    /// Compile JavaScript files into FuzzIL protobuf format.
    #[structopt(name = "create")]
    Create {
        /// Directory containing JavaScript inputs.
        #[structopt(long = "input-dir", parse(from_os_str))]
        input_dir: PathBuf,

        /// Directory to store compiled protobuf files.
        #[structopt(long = "output-dir", parse(from_os_str))]
        output_dir: PathBuf,

        /// Command line of the JavaScript-to-FuzzIL compiler.
        #[structopt(long = "compiler", default_value = "FuzzILTool")]
        compiler: String,

        /// Number of concurrent compiler processes.
        #[structopt(short = "j", long = "jobs")]
        jobs: Option<usize>,
    },

    /// Merge existing corpora into a single directory.
    #[structopt(name = "merge")]
    Merge {
        /// One or more corpus directories to merge.
        #[structopt(long = "corpora", parse(from_os_str), required = true)]
        corpora: Vec<PathBuf>,

        /// Directory to write the merged corpus.
        #[structopt(long = "output-dir", parse(from_os_str))]
        output_dir: PathBuf,
    },
}

fn run(cmd: CliCommand) -> Result<(), Error> {
    match cmd {
        CliCommand::Create {
            input_dir,
            output_dir,
            compiler,
            jobs,
        } => {
            let compiler = Compiler::from_command_line(&compiler)?;
            let workers = jobs.unwrap_or_else(default_worker_count);

            let summary =
                create_corpus::create_corpus(&input_dir, &output_dir, compiler, workers)?;
            if summary.total() == 0 {
                println!("No JavaScript files found.");
            } else {
                println!("{}", summary);
            }
        }

        CliCommand::Merge {
            corpora,
            output_dir,
        } => {
            let summary = merge_corpora::merge_corpora(&corpora, &output_dir)?;
            if summary.total() == 0 {
                println!("No corpus files found.");
            } else {
                println!("{}", summary);
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cmd = CliCommand::from_args();
    if let Err(err) = run(cmd) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
