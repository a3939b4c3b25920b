//! Sequential batch queue.
//!
//! Jobs are appended with [`JobQueue::submit`] and executed by a run pass,
//! one at a time, in submission order. A pass only picks up jobs that were
//! present when it started; jobs submitted while it runs wait for the next
//! pass. Only one pass runs at a time.
//!
//! A failing job is recorded as [`JobStatus::Failed`] with its error text
//! and never stops the pass. Panics inside a runner are caught and recorded
//! the same way.
//!
//! [`JobStatus::Failed`]: crate::job::JobStatus::Failed

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{PdfQueueError, Result};
use crate::job::{Job, JobId, JobStatus, QueueEntry};

/// Executes a single job.
///
/// [`Engine`](crate::ops::Engine) is the production implementation; any
/// `Fn(&Job) -> Result<()>` closure also works.
pub trait JobRunner: Send + Sync + 'static {
    /// Run `job` to completion.
    fn run(&self, job: &Job) -> Result<()>;
}

impl<F> JobRunner for F
where
    F: Fn(&Job) -> Result<()> + Send + Sync + 'static,
{
    fn run(&self, job: &Job) -> Result<()> {
        self(job)
    }
}

/// Something that happened to a queued job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// Job appended to the queue.
    Queued {
        /// Job id.
        id: JobId,
        /// [`Job::description`].
        description: String,
    },
    /// Job started running.
    Started {
        /// Job id.
        id: JobId,
        /// [`Job::description`].
        description: String,
    },
    /// Job finished without error.
    Succeeded {
        /// Job id.
        id: JobId,
        /// [`Job::description`].
        description: String,
    },
    /// Job finished with an error.
    Failed {
        /// Job id.
        id: JobId,
        /// [`Job::description`].
        description: String,
        /// Error text recorded on the entry.
        message: String,
    },
}

impl QueueEvent {
    /// Id of the job this event is about.
    pub fn id(&self) -> JobId {
        match self {
            Self::Queued { id, .. }
            | Self::Started { id, .. }
            | Self::Succeeded { id, .. }
            | Self::Failed { id, .. } => *id,
        }
    }

    /// Activity-log line for this event.
    pub fn log_line(&self) -> String {
        match self {
            Self::Queued { description, .. } => format!("Queued: {description}"),
            Self::Started { description, .. } => format!("Running: {description}"),
            Self::Succeeded { description, .. } => format!("Queue success: {description}"),
            Self::Failed {
                description,
                message,
                ..
            } => format!("Queue failed: {description} - {message}"),
        }
    }
}

/// Outcome counts of one run pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Jobs that succeeded.
    pub succeeded: usize,
    /// Jobs that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Jobs executed in the pass.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether no job failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

type Observer = Box<dyn Fn(&QueueEvent) + Send + Sync>;

struct Shared<R> {
    runner: R,
    entries: Mutex<Vec<QueueEntry>>,
    running: AtomicBool,
    observers: RwLock<Vec<Observer>>,
}

/// Handle to a job queue.
///
/// Cloning is cheap; clones share the same queue.
pub struct JobQueue<R> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for JobQueue<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Holds the run token for the duration of a pass.
struct RunGuard<R> {
    shared: Arc<Shared<R>>,
}

impl<R> RunGuard<R> {
    fn acquire(shared: &Arc<Shared<R>>) -> Option<Self> {
        shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                shared: Arc::clone(shared),
            })
    }
}

impl<R> Drop for RunGuard<R> {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
    }
}

impl<R: JobRunner> JobQueue<R> {
    /// Create an empty queue executing jobs with `runner`.
    pub fn new(runner: R) -> Self {
        Self {
            shared: Arc::new(Shared {
                runner,
                entries: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a callback invoked for every [`QueueEvent`].
    ///
    /// Callbacks run on the thread that caused the event, which during a
    /// pass is the worker. They must not register further callbacks.
    pub fn on_event<F>(&self, callback: F)
    where
        F: Fn(&QueueEvent) + Send + Sync + 'static,
    {
        self.shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// Append `job` as pending.
    pub fn submit(&self, job: Job) -> JobId {
        let id = job.id();
        let description = job.description();

        self.shared.lock_entries().push(QueueEntry::new(job));
        info!(job = %id, %description, "queued job");

        self.shared.emit(&QueueEvent::Queued { id, description });
        id
    }

    /// Run every pending job once, in order, on the calling thread.
    ///
    /// Returns `None` without touching the queue if a pass is already in
    /// progress.
    pub fn run_pass(&self) -> Option<RunSummary> {
        let guard = RunGuard::acquire(&self.shared)?;
        Some(guard.shared.execute())
    }

    /// Start a pass on a blocking worker task.
    ///
    /// Returns `None` if a pass is already in progress. The run token is
    /// taken before this returns, so an immediate second call is a no-op.
    /// Must be called from within a Tokio runtime.
    pub fn spawn_run(&self) -> Option<JoinHandle<RunSummary>> {
        let guard = RunGuard::acquire(&self.shared)?;
        Some(tokio::task::spawn_blocking(move || guard.shared.execute()))
    }

    /// Remove all succeeded entries, keeping the rest in order.
    ///
    /// Returns the number of entries removed.
    pub fn clear_completed(&self) -> usize {
        let mut entries = self.shared.lock_entries();
        let before = entries.len();
        entries.retain(|entry| entry.status != JobStatus::Succeeded);
        let removed = before - entries.len();
        debug!(removed, "cleared completed jobs");
        removed
    }

    /// Snapshot of all entries in queue order.
    pub fn entries(&self) -> Vec<QueueEntry> {
        self.shared.lock_entries().clone()
    }

    /// Snapshot of the entry for `id`.
    pub fn entry(&self, id: JobId) -> Option<QueueEntry> {
        self.shared
            .lock_entries()
            .iter()
            .find(|entry| entry.job.id() == id)
            .cloned()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.shared.lock_entries().len()
    }

    /// Whether the queue has no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.lock_entries().is_empty()
    }

    /// Whether a pass is in progress.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

impl<R> Shared<R> {
    fn lock_entries(&self) -> MutexGuard<'_, Vec<QueueEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &QueueEvent) {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer(event);
        }
    }
}

impl<R: JobRunner> Shared<R> {
    fn execute(&self) -> RunSummary {
        let ids: Vec<JobId> = self
            .lock_entries()
            .iter()
            .map(|entry| entry.job.id())
            .collect();
        info!(jobs = ids.len(), "starting queue pass");

        let mut summary = RunSummary::default();

        for id in ids {
            let Some(job) = self.start(id) else {
                continue;
            };
            let description = job.description();
            self.emit(&QueueEvent::Started {
                id,
                description: description.clone(),
            });

            let result = panic::catch_unwind(AssertUnwindSafe(|| self.runner.run(&job)))
                .unwrap_or_else(|payload| {
                    Err(PdfQueueError::runtime(format!(
                        "Job panicked: {}",
                        panic_message(payload.as_ref())
                    )))
                });

            let event = match result {
                Ok(()) => {
                    self.finish(id, |entry| entry.succeed());
                    summary.succeeded += 1;
                    info!(job = %id, %description, "job succeeded");
                    QueueEvent::Succeeded { id, description }
                }
                Err(err) => {
                    let message = err.to_string();
                    self.finish(id, |entry| entry.fail(message.clone()));
                    summary.failed += 1;
                    warn!(job = %id, %description, error = %message, "job failed");
                    QueueEvent::Failed {
                        id,
                        description,
                        message,
                    }
                }
            };
            self.emit(&event);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "finished queue pass"
        );
        summary
    }

    /// Move a pending entry to running and return its job.
    fn start(&self, id: JobId) -> Option<Job> {
        let mut entries = self.lock_entries();
        let entry = entries.iter_mut().find(|entry| entry.job.id() == id)?;
        entry.start().then(|| entry.job.clone())
    }

    fn finish(&self, id: JobId, transition: impl FnOnce(&mut QueueEntry) -> bool) {
        let mut entries = self.lock_entries();
        if let Some(entry) = entries.iter_mut().find(|entry| entry.job.id() == id) {
            transition(entry);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
