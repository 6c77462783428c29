use super::{compilation_output_path, ensure_parent_directory};
use crate::Error;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const DEFAULT_COMPILER: &str = "FuzzILTool";

#[derive(Debug)]
pub struct CompilationResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

/// The external JavaScript-to-FuzzIL compiler.
///
/// Invoked as `<program> <args...> --compile <source> --output <output>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiler {
    program: String,
    args: Vec<String>,
}

impl Compiler {
    /// Splits a shell-style command line, e.g. `swift run FuzzILTool`.
    pub fn from_command_line(command_line: &str) -> Result<Compiler, Error> {
        let invalid = || Error::InvalidCompiler(command_line.to_owned());

        let mut parts = shlex::split(command_line).ok_or_else(invalid)?.into_iter();
        let program = parts.next().ok_or_else(invalid)?;

        Ok(Compiler {
            program,
            args: parts.collect(),
        })
    }

    pub fn compile(&self, source: &Path, output: &Path) -> Result<CompilationResult, Error> {
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg("--compile")
            .arg(source)
            .arg("--output")
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| Error::Spawn {
                path: source.to_path_buf(),
                source: err,
            })?;

        let error = if result.status.success() {
            None
        } else {
            Some(String::from_utf8_lossy(&result.stderr).into_owned())
        };

        Ok(CompilationResult {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            success: error.is_none(),
            error,
        })
    }
}

pub fn compile_js_file(
    compiler: &Compiler,
    source: &Path,
    input_root: &Path,
    output_root: &Path,
) -> Result<CompilationResult, Error> {
    let output = compilation_output_path(source, input_root, output_root)?;
    ensure_parent_directory(&output)?;
    compiler.compile(source, &output)
}
