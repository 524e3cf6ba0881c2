//! Command-line interface for the binding generator.

use camino::Utf8PathBuf;
use clap::Parser;

use rig_grammar::SkipList;

use crate::GeneratorConfig;

/// Generates Rust bindings from a rig daemon descriptor dump.
#[derive(Debug, Parser)]
#[command(name = "rig-apigen", version, about)]
pub struct Cli {
    /// Path to the JSON descriptor dump; `-` or absent reads stdin.
    pub input: Option<Utf8PathBuf>,

    /// Version stamp recorded in the generated header.
    #[arg(long, default_value = "0.1.0")]
    pub api_version: String,

    /// Daemon version the dump was taken from.
    #[arg(long, default_value = "unknown")]
    pub daemon_version: String,

    /// Command name to exclude from the bindings; repeatable.
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,
}

impl Cli {
    /// Folds the parsed arguments into a generator configuration.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        let mut skip = SkipList::default();
        for name in &self.skip {
            skip.insert(name);
        }
        GeneratorConfig {
            api_version: self.api_version.clone(),
            daemon_version: self.daemon_version.clone(),
            skip,
        }
    }
}
