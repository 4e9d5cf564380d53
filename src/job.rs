//! Enumeration of the (params, returns) arity space into render jobs.

use serde::Serialize;

use crate::config::GenerationConfig;
use crate::error::JobId;

/// One (params, returns) combination to be rendered.
///
/// `generic_args` is `generic_params` followed by `generic_returns`; templates rely
/// on the first `param_count` entries being the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderJob {
    pub param_count: usize,
    pub return_count: usize,
    pub generic_params: Vec<String>,
    pub generic_returns: Vec<String>,
    pub generic_args: Vec<String>,
}

impl RenderJob {
    pub fn new(param_count: usize, return_count: usize) -> Self {
        let generic_params = identifiers('P', param_count);
        let generic_returns = identifiers('R', return_count);
        let generic_args = generic_params
            .iter()
            .chain(&generic_returns)
            .cloned()
            .collect();

        Self {
            param_count,
            return_count,
            generic_params,
            generic_returns,
            generic_args,
        }
    }

    pub fn id(&self) -> JobId {
        JobId {
            params: self.param_count,
            returns: self.return_count,
        }
    }
}

fn identifiers(prefix: char, count: usize) -> Vec<String> {
    (0..count).map(|n| format!("{prefix}{n}")).collect()
}

/// Number of jobs `enumerate_jobs` yields for `config`.
pub fn job_count(config: &GenerationConfig) -> usize {
    let span = |min: usize, max: usize| max.checked_sub(min).map_or(0, |d| d.saturating_add(1));
    span(config.min_arg, config.max_arg).saturating_mul(span(config.min_return, config.max_return))
}

/// Produces every job for `config`, params ascending in the outer loop and returns
/// ascending in the inner loop.
///
/// An inverted range on either axis yields an empty list.
pub fn enumerate_jobs(config: &GenerationConfig) -> Vec<RenderJob> {
    let mut jobs = Vec::with_capacity(job_count(config));
    for params in config.min_arg..=config.max_arg {
        for returns in config.min_return..=config.max_return {
            jobs.push(RenderJob::new(params, returns));
        }
    }
    jobs
}
