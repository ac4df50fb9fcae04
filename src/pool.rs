//! Worker pool: a dedicated rayon pool per pipeline run with an explicit
//! submit-all / join / collect step for the map stage.

use crate::chunk::Chunk;
use crate::error::PipelineError;
use indicatif::ProgressBar;
use rayon::prelude::*;
use sysinfo::{System, SystemExt};

/// Hardware parallelism as reported by std, falling back to sysinfo's core count.
pub fn hardware_parallelism() -> Option<usize> {
    match std::thread::available_parallelism() {
        Ok(n) => Some(n.get()),
        Err(e) => {
            tracing::debug!(error = %e, "available_parallelism failed; asking sysinfo");
            System::new().physical_core_count().filter(|n| *n > 0)
        }
    }
}

/// `hardware − reserve`, never below 1.
pub fn default_worker_count(reserve: usize) -> Result<usize, PipelineError> {
    let hw = hardware_parallelism()
        .ok_or_else(|| PipelineError::PoolUnavailable("cannot determine hardware parallelism".into()))?;
    Ok(hw.saturating_sub(reserve).max(1))
}

/// Fixed-size pool of worker threads. Threads are torn down when the pool is dropped,
/// so holding it in a scope bounds its lifetime to one pipeline run.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, PipelineError> {
        if threads == 0 {
            return Err(PipelineError::PoolUnavailable("worker count must be at least 1".into()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("socialmr-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::PoolUnavailable(e.to_string()))?;
        tracing::debug!(threads, "worker pool started");
        Ok(Self { pool, threads })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `f` over every chunk on the pool and block until all of them are done.
    ///
    /// Each result is paired with its chunk index; the order of the returned vector is
    /// not meaningful. The first chunk error wins and every partial is discarded.
    pub fn map_chunks<'a, P, F>(
        &self,
        chunks: &[Chunk<'a>],
        progress: Option<&ProgressBar>,
        f: F,
    ) -> Result<Vec<(usize, P)>, PipelineError>
    where
        P: Send,
        F: Fn(&Chunk<'a>) -> Result<P, PipelineError> + Sync,
    {
        self.pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| {
                    let out = f(chunk).map(|p| (chunk.index, p));
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    out
                })
                .collect::<Result<Vec<_>, PipelineError>>()
        })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        tracing::debug!(threads = self.threads, "worker pool released");
    }
}
