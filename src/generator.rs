//! Core generation orchestration.
//! Combines the job enumerator, the renderer, the buffer pool and the worker pool
//! into a single run that writes one output stream.

use log::{debug, info};
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::buffer::BufferPool;
use crate::config::{GenerationConfig, OutputSettings};
use crate::error::{Error, Result, Unit};
use crate::job::{enumerate_jobs, RenderJob};
use crate::pool::{Pipeline, WorkerPool};
use crate::renderer::{PreambleData, TemplateRenderer};
use crate::sink::SyncWriter;

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of generated functions
    pub jobs: usize,
    /// Bytes appended to the sink, preamble included
    pub bytes_written: usize,
    pub elapsed: Duration,
}

/// Renders the preamble followed by one unit per job into a shared sink.
pub struct Generator {
    renderer: Arc<dyn TemplateRenderer>,
    buffers: Arc<BufferPool>,
    settings: OutputSettings,
}

impl Generator {
    pub fn new(renderer: Arc<dyn TemplateRenderer>, settings: OutputSettings) -> Self {
        Self {
            renderer,
            buffers: Arc::new(BufferPool::new()),
            settings,
        }
    }

    /// Buffer pool reused across every run of this generator.
    pub fn buffers(&self) -> &BufferPool {
        &self.buffers
    }

    /// Runs a full generation pass into `sink`.
    ///
    /// # Flow
    /// 1. Enumerates every job up front
    /// 2. Renders and flushes the preamble on the calling thread
    /// 3. Submits each job to a sequential or parallel worker pool
    /// 4. Waits for all jobs and aggregates their failures
    ///
    /// # Errors
    /// * `Error::Template` or `Error::SinkWrite` if the preamble fails; no job is started
    /// * `Error::Jobs` if any job failed; the other jobs are still written
    pub fn run<W>(&self, config: &GenerationConfig, sink: Arc<SyncWriter<W>>) -> Result<Summary>
    where
        W: Write + Send + 'static,
    {
        let started = Instant::now();
        let jobs = enumerate_jobs(config);
        debug!("Enumerated {} jobs", jobs.len());

        let preamble_bytes = self.write_preamble(config, &jobs, &sink)?;

        let pipeline = Arc::new(Pipeline::new(
            Arc::clone(&self.renderer),
            Arc::clone(&self.buffers),
            sink,
        ));
        let mut pool = if config.parallel {
            let cap = NonZeroUsize::new(jobs.len()).unwrap_or(NonZeroUsize::MIN);
            let workers = config.concurrency().min(cap);
            info!("Generating {} functions on {workers} workers", jobs.len());
            WorkerPool::parallel(pipeline, workers)
        } else {
            info!("Generating {} functions sequentially", jobs.len());
            WorkerPool::sequential(pipeline)
        };

        let count = jobs.len();
        for job in jobs {
            pool.submit(job);
        }
        let stats = pool.await_all()?;

        Ok(Summary {
            jobs: count,
            bytes_written: preamble_bytes + stats.bytes_written,
            elapsed: started.elapsed(),
        })
    }

    fn write_preamble<W: Write>(
        &self,
        config: &GenerationConfig,
        jobs: &[RenderJob],
        sink: &SyncWriter<W>,
    ) -> Result<usize> {
        let data = PreambleData {
            package_name: &self.settings.package_name,
            include_fmt: config.include_fmt(),
            source_file: self.settings.qualified_source(),
            funcs: jobs,
        };

        let mut buf = self.buffers.acquire();
        self.renderer.render_preamble(&data, &mut *buf)?;
        sink.flush(&mut buf).map_err(|source| Error::SinkWrite {
            unit: Unit::Preamble,
            source,
        })
    }
}
