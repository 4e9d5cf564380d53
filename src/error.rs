//! Error handling for the smartgen generator.
//! Defines the error type shared by the renderer, the worker pool and the sink writer.

use std::fmt;
use std::io;
use thiserror::Error;

/// Identifies a single render job by its arity.
///
/// Displays the same way the generated wrapper is named, e.g. `Fn2x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId {
    pub params: usize,
    pub returns: usize,
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fn{}x{}", self.params, self.returns)
    }
}

/// The rendered unit an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Preamble,
    Job(JobId),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Preamble => f.write_str("preamble"),
            Unit::Job(job) => write!(f, "{job}"),
        }
    }
}

/// Custom error types for generator operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Compiling the template set or rendering the preamble failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Rendering the body of one job failed
    #[error("Render error in {job}: {source}")]
    Render {
        job: JobId,
        #[source]
        source: minijinja::Error,
    },

    /// Writing a rendered unit to the sink failed
    #[error("Sink write error in {unit}: {source}")]
    SinkWrite {
        unit: Unit,
        #[source]
        source: io::Error,
    },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors that occur during configuration parsing
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more jobs failed; every failure of the run is kept
    #[error("{0}")]
    Jobs(JobErrors),

    /// Rendering or flushing one job panicked
    #[error("Job {job} panicked")]
    JobPanicked { job: JobId },

    /// A worker thread panicked before reporting its result
    #[error("Worker thread panicked")]
    WorkerPanicked,
}

/// The per-job failures collected over a whole run.
#[derive(Debug, Default)]
pub struct JobErrors(pub Vec<Error>);

impl JobErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// Converts the collection into `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Jobs(self))
        }
    }
}

impl fmt::Display for JobErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} job(s) failed:", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;
