//! Bounded execution of render jobs.
//!
//! A [`WorkerPool`] runs each submitted job through the same steps: acquire a
//! pooled buffer, render into it, flush it to the shared sink, release it. In
//! sequential mode that happens on the caller's thread in submission order. In
//! parallel mode a fixed set of worker threads pulls jobs from a bounded queue,
//! so at most `workers` renders are in flight and `submit` blocks once the
//! queue is full. Job output order in the sink is then whatever the scheduler
//! produces.

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, warn};
use std::io::Write;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::buffer::BufferPool;
use crate::error::{Error, JobErrors, Result, Unit};
use crate::job::RenderJob;
use crate::renderer::TemplateRenderer;
use crate::sink::SyncWriter;

/// Everything a job needs to go from data to bytes in the sink.
pub struct Pipeline<W> {
    renderer: Arc<dyn TemplateRenderer>,
    buffers: Arc<BufferPool>,
    sink: Arc<SyncWriter<W>>,
}

impl<W: Write> Pipeline<W> {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        buffers: Arc<BufferPool>,
        sink: Arc<SyncWriter<W>>,
    ) -> Self {
        Self {
            renderer,
            buffers,
            sink,
        }
    }

    /// Renders `job` and appends it to the sink.
    ///
    /// A job that fails to render is not flushed. The buffer goes back to the pool
    /// on every path.
    ///
    /// # Returns
    /// * `Result<usize>` - Bytes appended to the sink
    pub fn process(&self, job: &RenderJob) -> Result<usize> {
        let mut buf = self.buffers.acquire();
        self.renderer.render_job(job, &mut *buf)?;
        let written = self
            .sink
            .flush(&mut buf)
            .map_err(|source| Error::SinkWrite {
                unit: Unit::Job(job.id()),
                source,
            })?;
        debug!("Rendered {} ({written} bytes)", job.id());
        Ok(written)
    }
}

/// Totals reported by [`WorkerPool::await_all`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Jobs whose output reached the sink
    pub completed: usize,
    pub bytes_written: usize,
}

#[derive(Default)]
struct Tally {
    stats: PoolStats,
    errors: Vec<Error>,
}

impl Tally {
    fn record(&mut self, outcome: Result<usize>) {
        match outcome {
            Ok(bytes) => {
                self.stats.completed += 1;
                self.stats.bytes_written += bytes;
            }
            Err(err) => {
                warn!("{err}");
                self.errors.push(err);
            }
        }
    }

    fn merge(&mut self, other: Tally) {
        self.stats.completed += other.stats.completed;
        self.stats.bytes_written += other.stats.bytes_written;
        self.errors.extend(other.errors);
    }
}

enum Execution {
    Sequential,
    Parallel {
        queue: Sender<RenderJob>,
        workers: Vec<JoinHandle<Tally>>,
    },
}

/// Runs render jobs either inline or on a bounded set of worker threads.
pub struct WorkerPool<W> {
    pipeline: Arc<Pipeline<W>>,
    execution: Execution,
    tally: Tally,
}

impl<W: Write + Send + 'static> WorkerPool<W> {
    /// Pool that renders every job on the calling thread, in submission order.
    pub fn sequential(pipeline: Arc<Pipeline<W>>) -> Self {
        Self {
            pipeline,
            execution: Execution::Sequential,
            tally: Tally::default(),
        }
    }

    /// Pool with `workers` threads and an admission queue of the same capacity.
    pub fn parallel(pipeline: Arc<Pipeline<W>>, workers: NonZeroUsize) -> Self {
        let workers = workers.get();
        let (queue, jobs) = bounded::<RenderJob>(workers);
        let handles = (0..workers)
            .map(|id| {
                let pipeline = Arc::clone(&pipeline);
                let jobs = jobs.clone();
                thread::spawn(move || work(id, &pipeline, jobs))
            })
            .collect();

        Self {
            pipeline,
            execution: Execution::Parallel {
                queue,
                workers: handles,
            },
            tally: Tally::default(),
        }
    }

    /// Hands `job` to the pool.
    ///
    /// Sequential pools render it before returning. Parallel pools block while
    /// the admission queue is full.
    pub fn submit(&mut self, job: RenderJob) {
        match &self.execution {
            Execution::Sequential => {
                let outcome = run_job(&self.pipeline, &job);
                self.tally.record(outcome);
            }
            Execution::Parallel { queue, .. } => {
                // Sending only fails once every worker has died.
                if queue.send(job).is_err() {
                    self.tally.record(Err(Error::WorkerPanicked));
                }
            }
        }
    }

    /// Waits for every submitted job to be flushed and released.
    ///
    /// # Errors
    /// * `Error::Jobs` holding every per-job failure of the run
    pub fn await_all(self) -> Result<PoolStats> {
        let mut tally = self.tally;
        if let Execution::Parallel { queue, workers } = self.execution {
            drop(queue);
            for handle in workers {
                match handle.join() {
                    Ok(worker) => tally.merge(worker),
                    Err(_) => tally.record(Err(Error::WorkerPanicked)),
                }
            }
        }

        JobErrors(tally.errors).into_result()?;
        Ok(tally.stats)
    }
}

/// Processes `job`, turning a panic into an error tagged with the job.
fn run_job<W: Write>(pipeline: &Pipeline<W>, job: &RenderJob) -> Result<usize> {
    panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(job)))
        .unwrap_or_else(|_| Err(Error::JobPanicked { job: job.id() }))
}

fn work<W: Write>(id: usize, pipeline: &Pipeline<W>, jobs: Receiver<RenderJob>) -> Tally {
    debug!("Worker {id} started");
    let mut tally = Tally::default();
    for job in jobs {
        tally.record(run_job(pipeline, &job));
    }
    debug!("Worker {id} finished");
    tally
}
