//! Data-parallel executors.
//!
//! An executor applies a per-element closure to every element of a buffer
//! and returns once all of them are done. The trait is object-safe so the
//! stepper can hold a `Box<dyn KernelExecutor>` chosen at construction.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use slime_core::{Agent, KernelError};

/// Minimum cells handed to one rayon task.
const CELL_CHUNK: usize = 1024;

/// Minimum agents handed to one rayon task.
const AGENT_CHUNK: usize = 256;

/// Runs per-element closures over agent and cell buffers.
///
/// Implementations may run elements in any order and on any thread, but
/// must not return until every element has been visited exactly once.
pub trait KernelExecutor: Send + Sync {
    /// Short name for logs and metrics.
    fn name(&self) -> &str;

    /// Call `f(i, &mut agents[i])` for every agent.
    fn for_each_agent(&self, agents: &mut [Agent], f: &(dyn Fn(usize, &mut Agent) + Sync));

    /// Set `cells[i] = f(i)` for every cell.
    fn fill_cells(&self, cells: &mut [f32], f: &(dyn Fn(usize) -> f32 + Sync));

    /// Number of worker threads the executor may use.
    fn parallelism(&self) -> usize {
        1
    }
}

/// Runs every element in index order on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExecutor;

impl KernelExecutor for SerialExecutor {
    fn name(&self) -> &str {
        "serial"
    }

    fn for_each_agent(&self, agents: &mut [Agent], f: &(dyn Fn(usize, &mut Agent) + Sync)) {
        for (i, agent) in agents.iter_mut().enumerate() {
            f(i, agent);
        }
    }

    fn fill_cells(&self, cells: &mut [f32], f: &(dyn Fn(usize) -> f32 + Sync)) {
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = f(i);
        }
    }
}

/// Work-stealing executor backed by rayon.
///
/// Uses the global rayon pool unless built with
/// [`with_threads`](RayonExecutor::with_threads).
#[derive(Debug, Default)]
pub struct RayonExecutor {
    pool: Option<ThreadPool>,
}

impl RayonExecutor {
    /// An executor on the global rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// An executor with a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, KernelError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("slime-worker-{i}"))
            .build()
            .map_err(|e| KernelError::ExecutionFailed {
                reason: format!("failed to build thread pool: {e}"),
            })?;
        tracing::debug!(threads = pool.current_num_threads(), "built rayon pool");
        Ok(Self { pool: Some(pool) })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl KernelExecutor for RayonExecutor {
    fn name(&self) -> &str {
        "rayon"
    }

    fn for_each_agent(&self, agents: &mut [Agent], f: &(dyn Fn(usize, &mut Agent) + Sync)) {
        self.install(|| {
            agents
                .par_iter_mut()
                .enumerate()
                .with_min_len(AGENT_CHUNK)
                .for_each(|(i, agent)| f(i, agent));
        });
    }

    fn fill_cells(&self, cells: &mut [f32], f: &(dyn Fn(usize) -> f32 + Sync)) {
        self.install(|| {
            cells
                .par_iter_mut()
                .enumerate()
                .with_min_len(CELL_CHUNK)
                .for_each(|(i, cell)| *cell = f(i));
        });
    }

    fn parallelism(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use slime_core::SpeciesId;

    fn agents(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| Agent::new(SpeciesId(0), Vec2::new(i as f32, 0.0), 0.0))
            .collect()
    }

    fn check(exec: &dyn KernelExecutor) {
        let mut a = agents(1000);
        exec.for_each_agent(&mut a, &|i, agent| agent.heading = i as f32);
        assert!(a.iter().enumerate().all(|(i, ag)| ag.heading == i as f32));

        let mut cells = vec![0.0f32; 5000];
        exec.fill_cells(&mut cells, &|i| (i * 2) as f32);
        assert!(cells.iter().enumerate().all(|(i, &c)| c == (i * 2) as f32));
    }

    #[test]
    fn serial_visits_every_element() {
        check(&SerialExecutor);
        assert_eq!(SerialExecutor.parallelism(), 1);
    }

    #[test]
    fn rayon_visits_every_element() {
        check(&RayonExecutor::new());
    }

    #[test]
    fn dedicated_pool_reports_thread_count() {
        let exec = RayonExecutor::with_threads(3).unwrap();
        assert_eq!(exec.parallelism(), 3);
        assert_eq!(exec.name(), "rayon");
        check(&exec);
    }
}
