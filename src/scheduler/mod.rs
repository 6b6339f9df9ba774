//! The "asap" scheduling primitive
//!
//! Settlement never invokes queued callbacks on the caller's stack; it hands
//! them to this module, which defers them until the current synchronous stack
//! has unwound. The strategy is substitutable per thread: by default jobs land
//! in a thread-local FIFO queue drained explicitly with [`run_until_idle`],
//! which doubles as the deterministic flush test drivers need. Embedders that
//! already own a loop can [`install`] their own [`Schedule`] and route jobs
//! into it instead.
//!
//! Draining is budgeted per pass (starvation protection) and counted in
//! [`SchedulerStats`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// A deferred unit of work: one queued callback invocation.
pub struct Job {
    callback: Box<dyn FnOnce()>,
}

impl Job {
    /// Creates a new Job from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the job, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job {{ ... }}")
    }
}

/// Strategy for deferring jobs.
///
/// Implementations must run each job at most once, after the call to
/// [`Schedule::schedule`] has returned, never synchronously inside it.
pub trait Schedule {
    /// Accept a job for deferred execution.
    fn schedule(&self, job: Job);
}

/// Configuration for the default job queue.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Maximum jobs run in a single drain pass (starvation protection)
    pub max_jobs_per_drain: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_jobs_per_drain: 10_000,
        }
    }
}

/// Runtime statistics for the default job queue
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerStats {
    /// Total jobs run across all drain passes
    pub total_jobs: u64,
    /// Total drain passes
    pub total_drains: u64,
    /// Maximum jobs run in a single drain pass
    pub max_jobs_single_drain: u64,
}

/// FIFO job queue with explicit, budgeted draining.
///
/// This is the default [`Schedule`] strategy. Jobs enqueue in submission
/// order; nothing runs until a drain is requested, so scheduling from inside
/// a running job is always safe and keeps FIFO order.
pub struct JobQueue {
    queue: RefCell<VecDeque<Job>>,
    config: SchedulerConfig,
    stats: RefCell<SchedulerStats>,
}

impl JobQueue {
    /// Creates an empty queue with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates an empty queue with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            config,
            stats: RefCell::new(SchedulerStats::default()),
        }
    }

    /// Number of jobs waiting to run.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Returns true if no jobs are waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Runs queued jobs in FIFO order, up to the per-pass budget.
    ///
    /// Jobs scheduled by running jobs join the back of the queue and run in
    /// the same pass while the budget lasts. Returns the number of jobs run.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while count < self.config.max_jobs_per_drain {
            // The borrow must not span the job: jobs schedule more jobs.
            let job = self.queue.borrow_mut().pop_front();
            match job {
                Some(job) => {
                    job.run();
                    count += 1;
                }
                None => break,
            }
        }

        let mut stats = self.stats.borrow_mut();
        stats.total_jobs += count as u64;
        stats.total_drains += 1;
        if count as u64 > stats.max_jobs_single_drain {
            stats.max_jobs_single_drain = count as u64;
        }
        if count > 0 {
            trace!(jobs = count, remaining = self.queue.borrow().len(), "drain pass");
        }
        count
    }

    /// Snapshot of the queue's statistics.
    pub fn stats(&self) -> SchedulerStats {
        *self.stats.borrow()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for JobQueue {
    fn schedule(&self, job: Job) {
        self.queue.borrow_mut().push_back(job);
    }
}

thread_local! {
    static DEFAULT_QUEUE: Rc<JobQueue> = Rc::new(JobQueue::new());
    static CURRENT: RefCell<Option<Rc<dyn Schedule>>> = RefCell::new(None);
}

/// Defer a callback to run after the current synchronous stack unwinds.
///
/// Routes to the installed strategy for this thread, or to the default
/// thread-local queue when none is installed.
pub fn asap<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let job = Job::new(f);
    let installed = CURRENT.with(|current| current.borrow().clone());
    match installed {
        Some(strategy) => strategy.schedule(job),
        None => DEFAULT_QUEUE.with(|queue| queue.schedule(job)),
    }
}

/// Install a scheduling strategy for the current thread.
///
/// Returns the previously installed strategy, if any, so callers can restore
/// it. The default queue is untouched; [`uninstall`] routes `asap` back to it.
pub fn install(strategy: Rc<dyn Schedule>) -> Option<Rc<dyn Schedule>> {
    CURRENT.with(|current| current.borrow_mut().replace(strategy))
}

/// Remove any installed strategy, routing `asap` back to the default queue.
pub fn uninstall() -> Option<Rc<dyn Schedule>> {
    CURRENT.with(|current| current.borrow_mut().take())
}

/// Drain the default thread-local queue until no jobs remain.
///
/// Deterministic synchronous flush: repeats budgeted drain passes until the
/// queue is empty, so chains driven purely by settled values quiesce fully.
/// Returns the total number of jobs run.
pub fn run_until_idle() -> usize {
    DEFAULT_QUEUE.with(|queue| {
        let mut total = 0;
        loop {
            let ran = queue.drain();
            total += ran;
            if ran == 0 {
                break;
            }
        }
        total
    })
}

/// Number of jobs waiting in the default thread-local queue.
pub fn pending() -> usize {
    DEFAULT_QUEUE.with(|queue| queue.len())
}

/// Statistics for the default thread-local queue.
pub fn stats() -> SchedulerStats {
    DEFAULT_QUEUE.with(|queue| queue.stats())
}
