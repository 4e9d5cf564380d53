//! Configuration handling for smartgen.
//! Arity ranges and the execution mode are read once at startup, either from flags
//! or from a configuration file, and passed by value into the generator.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Arity ranges and execution mode for one generation run.
///
/// Inverted ranges (`max_arg < min_arg` or `max_return < min_return`) are valid
/// and simply produce no jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub min_arg: usize,
    pub min_return: usize,
    pub max_arg: usize,
    pub max_return: usize,
    /// Render jobs on a worker pool; output order between jobs is then unspecified.
    pub parallel: bool,
    /// Overrides the parallel worker count.
    pub workers: Option<NonZeroUsize>,
}

impl GenerationConfig {
    pub fn new(min_arg: usize, max_arg: usize, min_return: usize, max_return: usize) -> Self {
        Self {
            min_arg,
            min_return,
            max_arg,
            max_return,
            parallel: false,
            workers: None,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn workers(mut self, workers: Option<NonZeroUsize>) -> Self {
        self.workers = workers;
        self
    }

    /// Whether the generated file needs the `fmt` import.
    ///
    /// Only wrappers with parameters use `fmt`, so at least one such job must exist.
    pub fn include_fmt(&self) -> bool {
        self.max_arg > 0 && self.min_arg <= self.max_arg && self.min_return <= self.max_return
    }

    /// Number of concurrent renders allowed for this run.
    ///
    /// Sequential runs always use one. Parallel runs use the configured override or
    /// one less than the available parallelism, never less than one.
    pub fn concurrency(&self) -> NonZeroUsize {
        if !self.parallel {
            return NonZeroUsize::MIN;
        }
        if let Some(workers) = self.workers {
            return workers;
        }
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        NonZeroUsize::new(available.saturating_sub(1)).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Names that end up in the generated preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub package_name: String,
    pub source_file: String,
}

impl OutputSettings {
    pub fn new(package_name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            source_file: source_file.into(),
        }
    }

    /// `<package>.<file>`, used in the "generated from" header.
    pub fn qualified_source(&self) -> String {
        format!("{}.{}", self.package_name, self.source_file)
    }
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::Config` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<GenerationConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads a generation config from a JSON or YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GenerationConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_runs_use_a_single_worker() {
        let config = GenerationConfig::new(0, 3, 0, 3).workers(NonZeroUsize::new(8));
        assert_eq!(config.concurrency().get(), 1);
    }

    #[test]
    fn parallel_runs_honour_the_override() {
        let config = GenerationConfig::new(0, 3, 0, 3)
            .parallel(true)
            .workers(NonZeroUsize::new(5));
        assert_eq!(config.concurrency().get(), 5);
    }

    #[test]
    fn parallel_runs_leave_one_core_free() {
        let config = GenerationConfig::new(0, 3, 0, 3).parallel(true);
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        assert_eq!(config.concurrency().get(), available.saturating_sub(1).max(1));
    }

    #[test]
    fn include_fmt_requires_arguments() {
        assert!(GenerationConfig::new(0, 2, 0, 0).include_fmt());
        assert!(!GenerationConfig::new(0, 0, 0, 3).include_fmt());
        assert!(!GenerationConfig::new(3, 2, 0, 3).include_fmt());
        assert!(!GenerationConfig::new(0, 2, 3, 1).include_fmt());
    }
}
