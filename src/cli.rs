//! Command-line interface implementation for smartgen.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::config::{load_config, GenerationConfig, OutputSettings};
use crate::constants::OUTPUT_PREFIX;
use crate::error::Result;

/// Command-line arguments structure for smartgen.
#[derive(Parser, Debug)]
#[command(author, version, about = "smartgen: generates typed mock wrappers for every arity combination", long_about = None)]
pub struct Args {
    /// The minimum number of arguments to generate
    #[arg(long)]
    pub min_arg: Option<usize>,

    /// The minimum number of return values to generate
    #[arg(long)]
    pub min_return: Option<usize>,

    /// The maximum number of arguments to generate
    #[arg(long)]
    pub max_arg: Option<usize>,

    /// The maximum number of return values to generate
    #[arg(long)]
    pub max_return: Option<usize>,

    /// Generate functions in parallel.
    /// Faster for large ranges, but the order of functions in the output
    /// is no longer deterministic.
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of parallel workers (defaults to one less than the CPU count)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,

    /// JSON or YAML file with generation settings; flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package name written into the generated file
    #[arg(long = "package", env = "GOPACKAGE", default_value = "")]
    pub package_name: String,

    /// Name of the file the generator was invoked for
    #[arg(long, env = "GOFILE", default_value = "")]
    pub source_file: String,

    /// Output file path (defaults to generated_<SOURCE_FILE>)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory containing aggregate.go.j2 and per_job.go.j2
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the generation config, layering explicit flags over the config file.
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };

        config.min_arg = self.min_arg.unwrap_or(config.min_arg);
        config.min_return = self.min_return.unwrap_or(config.min_return);
        config.max_arg = self.max_arg.unwrap_or(config.max_arg);
        config.max_return = self.max_return.unwrap_or(config.max_return);
        config.parallel |= self.parallel;
        config.workers = self.workers.or(config.workers);
        Ok(config)
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings::new(&self.package_name, &self.source_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{OUTPUT_PREFIX}{}", self.source_file)))
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
