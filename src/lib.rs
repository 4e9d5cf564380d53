//! smartgen is a combinatorial source generator.
//! It renders one typed mock wrapper per (parameter count, return count) pair
//! through a MiniJinja template and streams the result into a single output,
//! either sequentially or on a bounded pool of worker threads.

/// Reusable byte buffers for rendered units
pub mod buffer;

/// Command-line interface module for the smartgen binary
pub mod cli;

/// Generation settings, loaded from flags or a JSON/YAML file
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Run orchestration: preamble first, then every job
pub mod generator;

/// Enumeration of the arity space into render jobs
pub mod job;

/// Logger setup
pub mod logger;

/// Sequential and bounded parallel job execution
pub mod pool;

/// Template rendering with the generator's helper functions
pub mod renderer;

/// Mutex-guarded output sink
pub mod sink;
