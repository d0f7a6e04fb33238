//! Job executor.
//!
//! Polls the queue from a dedicated worker thread and dispatches each job to
//! the handler registered for its kind, so async steps never block the
//! request that enqueued them. Handler failures mark the job failed and are
//! logged; recovery is the caller's concern (order processing converts its
//! own failures into a terminal order state before they reach this layer).

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use super::queue::JobQueue;
use super::types::{Job, JobKind};

/// Job handler function type.
pub type JobHandler = Box<dyn Fn(&Job) -> anyhow::Result<()> + Send + Sync>;

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct JobExecutorConfig {
    /// How often to poll for new jobs.
    pub poll_interval: Duration,
    /// Name for logging and the worker thread.
    pub name: String,
}

impl Default for JobExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            name: "job-executor".to_string(),
        }
    }
}

impl JobExecutorConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Handle to control a running executor.
#[derive(Debug)]
pub struct JobExecutorHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<ExecutorStats>>,
}

impl JobExecutorHandle {
    /// Request graceful shutdown and wait for the worker to drain its
    /// current job.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    pub fn stats(&self) -> ExecutorStats {
        self.stats.lock().unwrap().clone()
    }
}

/// Executor runtime statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ExecutorStats {
    pub jobs_processed: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
}

/// Background job executor with a handler registry keyed by job kind.
pub struct JobExecutor<Q: JobQueue> {
    queue: Q,
    handlers: HashMap<JobKind, JobHandler>,
}

impl<Q: JobQueue + 'static> JobExecutor<Q> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a job kind, replacing any previous one.
    pub fn register_handler<F>(&mut self, kind: JobKind, handler: F)
    where
        F: Fn(&Job) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Execute a single claimed job.
    pub fn execute_one(&self, job: &mut Job) -> anyhow::Result<()> {
        let handler = self
            .handlers
            .get(&job.kind)
            .ok_or_else(|| anyhow::anyhow!("no handler for job kind {:?}", job.kind))?;

        debug!(job_id = %job.id, kind = job.kind.as_str(), "executing job");

        match handler(job) {
            Ok(()) => {
                job.mark_completed();
                self.queue
                    .update(job)
                    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
                Ok(())
            }
            Err(err) => {
                error!(
                    job_id = %job.id,
                    kind = job.kind.as_str(),
                    error = %err,
                    "job failed; no automatic re-dispatch"
                );
                job.mark_failed(err.to_string());
                self.queue
                    .update(job)
                    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
                Err(err)
            }
        }
    }

    /// Claim and execute pending jobs until the queue is empty.
    ///
    /// Synchronous alternative to [`spawn`](Self::spawn) for tests and
    /// deterministic drains. Returns the number of jobs executed.
    pub fn drain(&self) -> usize {
        let mut processed = 0;
        while let Some(mut job) = self.queue.claim_next() {
            let _ = self.execute_one(&mut job);
            processed += 1;
        }
        processed
    }

    /// Spawn the executor on a background worker thread.
    pub fn spawn(self, config: JobExecutorConfig) -> JobExecutorHandle
    where
        Q: Send,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(ExecutorStats::default()));
        let stats_clone = stats.clone();

        let name = config.name.clone();
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || {
                executor_loop(self, config, shutdown_rx, stats_clone);
            })
            .expect("failed to spawn job executor thread");

        JobExecutorHandle {
            shutdown: shutdown_tx,
            join: Some(join),
            stats,
        }
    }
}

fn executor_loop<Q: JobQueue + 'static>(
    executor: JobExecutor<Q>,
    config: JobExecutorConfig,
    shutdown_rx: mpsc::Receiver<()>,
    stats: Arc<Mutex<ExecutorStats>>,
) {
    info!(executor = %config.name, "job executor started");

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }

        match executor.queue.claim_next() {
            Some(mut job) => {
                let succeeded = executor.execute_one(&mut job).is_ok();
                let mut s = stats.lock().unwrap();
                s.jobs_processed += 1;
                if succeeded {
                    s.jobs_succeeded += 1;
                } else {
                    s.jobs_failed += 1;
                }
            }
            None => thread::sleep(config.poll_interval),
        }
    }

    info!(executor = %config.name, "job executor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::queue::InMemoryJobQueue;
    use crate::jobs::types::JobStatus;
    use ordermill_core::{OrderId, TenantId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn drain_runs_registered_handlers() {
        let queue = InMemoryJobQueue::arc();
        let mut executor = JobExecutor::new(queue.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        executor.register_handler(JobKind::ProcessOrder, move |_job| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let tenant_id = TenantId::new();
        let id = queue
            .enqueue(Job::process_order(OrderId::new(), tenant_id))
            .unwrap();
        queue
            .enqueue(Job::process_order(OrderId::new(), tenant_id))
            .unwrap();

        assert_eq!(executor.drain(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(queue.get(id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn failed_handler_marks_the_job_failed_without_requeue() {
        let queue = InMemoryJobQueue::arc();
        let mut executor = JobExecutor::new(queue.clone());
        executor.register_handler(JobKind::ProcessOrder, |_job| {
            Err(anyhow::anyhow!("downstream exploded"))
        });

        let id = queue
            .enqueue(Job::process_order(OrderId::new(), TenantId::new()))
            .unwrap();
        executor.drain();

        let job = queue.get(id).unwrap();
        assert!(matches!(job.status, JobStatus::Failed { .. }));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn spawned_executor_processes_and_shuts_down() {
        let queue = InMemoryJobQueue::arc();
        let mut executor = JobExecutor::new(queue.clone());
        executor.register_handler(JobKind::ProcessOrder, |_job| Ok(()));

        let handle = executor.spawn(
            JobExecutorConfig::default()
                .with_name("test-executor")
                .with_poll_interval(Duration::from_millis(5)),
        );

        let id = queue
            .enqueue(Job::process_order(OrderId::new(), TenantId::new()))
            .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while std::time::Instant::now() < deadline {
            if queue.get(id).unwrap().status == JobStatus::Completed {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(queue.get(id).unwrap().status, JobStatus::Completed);
        assert!(handle.stats().jobs_processed >= 1);
        handle.shutdown();
    }
}
