//! The compute backend handle (spec §6: "CPU with OpenMP-style
//! shared-memory parallelism").
//!
//! Grounded on the teacher's choice of `rayon` for row-parallel work and
//! `parking_lot`-free, lock-free design: the executor itself holds no
//! mutable state, just an optional dedicated thread pool.

use std::sync::Arc;

use rayon::ThreadPool;

/// Opaque handle to the thread pool the row-parallel kernels run on.
///
/// `Executor::default()` uses rayon's global pool. `Executor::with_threads`
/// builds a dedicated pool — useful when a host wants the kernel confined
/// to a subset of its cores.
#[derive(Clone, Default)]
pub struct Executor {
    pool: Option<Arc<ThreadPool>>,
}

impl Executor {
    /// Builds an executor backed by a dedicated `num_threads`-wide pool.
    pub fn with_threads(num_threads: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .expect("failed to build rayon thread pool");
        Self {
            pool: Some(Arc::new(pool)),
        }
    }

    /// Number of worker threads this executor will use.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Runs `f` on this executor's pool (or the global pool).
    pub(crate) fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}
