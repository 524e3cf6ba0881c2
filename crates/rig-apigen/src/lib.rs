//! Binding generator for the rig daemon's command surface.
//!
//! Consumes the JSON descriptor dump produced by the daemon's `-cli` mode,
//! compiles it into a command tree with `rig-grammar`, and renders a Rust
//! source file of typed namespace structs and command methods over a
//! `rig-client` connection. The binary is a thin wrapper around [`run`]; the
//! generator itself is driven entirely by an explicit [`GeneratorConfig`],
//! with no process-wide state.

mod cli;
mod render;

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use rig_grammar::{CommandDescriptor, CommandTree, GrammarError, SkipList, parse_dump};

pub use cli::Cli;

/// Explicit configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Version stamp written into the generated header.
    pub api_version: String,
    /// Daemon version the dump was taken from.
    pub daemon_version: String,
    /// Commands excluded from the binding surface.
    pub skip: SkipList,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_version: String::from("0.1.0"),
            daemon_version: String::from("unknown"),
            skip: SkipList::default(),
        }
    }
}

/// Errors surfaced by the generator.
#[derive(Debug, thiserror::Error)]
pub enum ApigenError {
    /// The descriptor dump could not be read.
    #[error("failed to read descriptor dump: {0}")]
    ReadInput(io::Error),

    /// The dump could not be decoded or compiled into a command tree.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The rendered source could not be written out.
    #[error("failed to write generated source: {0}")]
    WriteOutput(io::Error),
}

/// Compiles descriptors into a command tree and renders the bindings.
pub fn generate(
    descriptors: &[CommandDescriptor],
    config: &GeneratorConfig,
) -> Result<String, ApigenError> {
    let tree = CommandTree::build(descriptors, &config.skip)?;
    debug!(
        descriptors = descriptors.len(),
        roots = tree.roots().len(),
        "rendering bindings"
    );
    Ok(render::render(&tree, config))
}

/// Parses arguments, reads the dump, and writes the bindings to `stdout`.
///
/// Returns success only when the full rendered source reached the output
/// stream; every failure is reported on `stderr` first.
pub fn run<I, T>(
    args: I,
    stdin: &mut impl Read,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let rendered = error.render();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write_text(stdout, &rendered.to_string());
                    ExitCode::SUCCESS
                }
                _ => {
                    write_text(stderr, &rendered.to_string());
                    ExitCode::FAILURE
                }
            };
        }
    };

    match run_generation(&cli, stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            write_text(stderr, &format!("{error}\n"));
            ExitCode::FAILURE
        }
    }
}

fn run_generation(
    cli: &Cli,
    stdin: &mut impl Read,
    stdout: &mut impl Write,
) -> Result<(), ApigenError> {
    let dump = read_input(cli, stdin)?;
    let descriptors = parse_dump(&dump)?;
    let source = generate(&descriptors, &cli.generator_config())?;
    stdout
        .write_all(source.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(ApigenError::WriteOutput)
}

/// Reads the descriptor dump from the configured path, or from `stdin`
/// when the path is absent or `-`.
fn read_input(cli: &Cli, stdin: &mut impl Read) -> Result<String, ApigenError> {
    let source = cli.input.as_ref().filter(|path| path.as_str() != "-");
    source.map_or_else(
        || {
            let mut dump = String::new();
            stdin
                .read_to_string(&mut dump)
                .map_err(ApigenError::ReadInput)?;
            Ok(dump)
        },
        |path| fs::read_to_string(path).map_err(ApigenError::ReadInput),
    )
}

/// Writes to a stream whose failure has nowhere left to be reported.
fn write_text(stream: &mut impl Write, text: &str) {
    if stream.write_all(text.as_bytes()).is_err() {
        debug!("failed to write to output stream");
    }
}

#[cfg(test)]
mod tests;
