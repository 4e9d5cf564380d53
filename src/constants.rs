//! Common constants used throughout smartgen.

/// Name of the preamble entry point, also its file name in a template directory
pub const AGGREGATE_TEMPLATE: &str = "aggregate.go.j2";

/// Name of the per-job entry point, also its file name in a template directory
pub const PER_JOB_TEMPLATE: &str = "per_job.go.j2";

/// Prefix of the default output file name
pub const OUTPUT_PREFIX: &str = "generated_";
