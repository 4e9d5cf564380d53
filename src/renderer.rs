//! Template rendering for smartgen.
//! Holds the compiled template set and renders the preamble and job bodies into
//! caller-provided writers.

use crate::constants::{AGGREGATE_TEMPLATE, PER_JOB_TEMPLATE};
use crate::error::{Error, Result};
use crate::job::RenderJob;
use log::debug;
use minijinja::Environment;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Built-in preamble template source.
pub const DEFAULT_AGGREGATE_SOURCE: &str = include_str!("../templates/aggregate.go.j2");
/// Built-in per-job template source.
pub const DEFAULT_PER_JOB_SOURCE: &str = include_str!("../templates/per_job.go.j2");

/// Data handed to the preamble template.
#[derive(Debug, Serialize)]
pub struct PreambleData<'a> {
    pub package_name: &'a str,
    pub include_fmt: bool,
    pub source_file: String,
    pub funcs: &'a [RenderJob],
}

/// Trait for template rendering engines.
///
/// Implementations are shared by every worker of a run and must be safe to call
/// concurrently.
pub trait TemplateRenderer: Send + Sync {
    /// Renders the once-per-run preamble into `out`.
    fn render_preamble(&self, data: &PreambleData<'_>, out: &mut dyn Write) -> Result<()>;

    /// Renders the body of a single job into `out`.
    ///
    /// # Errors
    /// * `Error::Render` tagged with the job's id
    fn render_job(&self, job: &RenderJob, out: &mut dyn Write) -> Result<()>;
}

/// MiniJinja-based template rendering engine.
///
/// The environment is compiled once and never mutated afterwards.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Compiles the built-in templates.
    pub fn new() -> Result<Self> {
        Self::from_sources(
            DEFAULT_AGGREGATE_SOURCE.to_string(),
            DEFAULT_PER_JOB_SOURCE.to_string(),
        )
    }

    /// Compiles the two named entry points from the given sources.
    ///
    /// # Errors
    /// * `Error::Template` if either source fails to parse
    pub fn from_sources(aggregate: String, per_job: String) -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        register_helpers(&mut env);
        env.add_template_owned(AGGREGATE_TEMPLATE, aggregate)?;
        env.add_template_owned(PER_JOB_TEMPLATE, per_job)?;
        Ok(Self { env })
    }

    /// Loads `aggregate.go.j2` and `per_job.go.j2` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        debug!("Loading templates from {}", dir.display());
        let read = |name: &str| std::fs::read_to_string(dir.join(name)).map_err(Error::Io);
        Self::from_sources(read(AGGREGATE_TEMPLATE)?, read(PER_JOB_TEMPLATE)?)
    }

    fn execute<S: Serialize>(
        &self,
        name: &str,
        ctx: S,
        out: &mut dyn Write,
    ) -> std::result::Result<(), minijinja::Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render_captured_to(ctx, out)?;
        Ok(())
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    env.add_function("toUpper", |s: String| s.to_uppercase());
    env.add_function("toLower", |s: String| s.to_lowercase());
    env.add_function("minusOne", |n: i64| n - 1);
    env.add_filter("toUpper", |s: String| s.to_uppercase());
    env.add_filter("toLower", |s: String| s.to_lowercase());
    env.add_filter("minusOne", |n: i64| n - 1);
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render_preamble(&self, data: &PreambleData<'_>, out: &mut dyn Write) -> Result<()> {
        Ok(self.execute(AGGREGATE_TEMPLATE, data, out)?)
    }

    fn render_job(&self, job: &RenderJob, out: &mut dyn Write) -> Result<()> {
        self.execute(PER_JOB_TEMPLATE, job, out).map_err(|source| Error::Render {
            job: job.id(),
            source,
        })
    }
}
