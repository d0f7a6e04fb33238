//! Job queue storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::types::{Job, JobId, JobStatus};

/// Queue abstraction.
pub trait JobQueue: Send + Sync {
    /// Enqueue a job.
    ///
    /// If a job with the same idempotency key is still pending, the new job
    /// is **not** queued and the existing job's id is returned. A running
    /// job does not absorb new enqueues: its handler may already have done
    /// its work, so absorbing into it would drop the new request.
    fn enqueue(&self, job: Job) -> Result<JobId, JobQueueError>;

    /// Claim the oldest pending job, marking it running.
    fn claim_next(&self) -> Option<Job>;

    /// Persist a job's updated state.
    fn update(&self, job: &Job) -> Result<(), JobQueueError>;

    /// Fetch a job by id.
    fn get(&self, job_id: JobId) -> Option<Job>;

    /// Number of jobs not yet claimed.
    fn pending_count(&self) -> usize;
}

impl<Q> JobQueue for Arc<Q>
where
    Q: JobQueue + ?Sized,
{
    fn enqueue(&self, job: Job) -> Result<JobId, JobQueueError> {
        (**self).enqueue(job)
    }

    fn claim_next(&self) -> Option<Job> {
        (**self).claim_next()
    }

    fn update(&self, job: &Job) -> Result<(), JobQueueError> {
        (**self).update(job)
    }

    fn get(&self, job_id: JobId) -> Option<Job> {
        (**self).get(job_id)
    }

    fn pending_count(&self) -> usize {
        (**self).pending_count()
    }
}

/// Queue error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobQueueError {
    #[error("job not found: {0}")]
    NotFound(JobId),
}

/// In-memory queue for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJobQueue {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl JobQueue for InMemoryJobQueue {
    fn enqueue(&self, job: Job) -> Result<JobId, JobQueueError> {
        let mut jobs = self.jobs.write().unwrap();

        // Idempotent keying: a queued job with the same key absorbs the
        // enqueue. Running jobs are excluded — by the time the enqueue
        // arrives the handler may have finished its observable work (with
        // only queue bookkeeping left), and an absorbed enqueue would then
        // never execute.
        if let Some(existing) = jobs
            .values()
            .find(|j| j.key == job.key && j.status == JobStatus::Pending)
        {
            return Ok(existing.id);
        }

        let id = job.id;
        jobs.insert(id, job);
        Ok(id)
    }

    fn claim_next(&self) -> Option<Job> {
        let mut jobs = self.jobs.write().unwrap();

        let next_id = jobs
            .values()
            .filter(|j| j.status == JobStatus::Pending)
            .min_by_key(|j| (j.created_at, j.id.0))
            .map(|j| j.id)?;

        let job = jobs.get_mut(&next_id)?;
        job.mark_running();
        Some(job.clone())
    }

    fn update(&self, job: &Job) -> Result<(), JobQueueError> {
        let mut jobs = self.jobs.write().unwrap();
        if !jobs.contains_key(&job.id) {
            return Err(JobQueueError::NotFound(job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    fn get(&self, job_id: JobId) -> Option<Job> {
        self.jobs.read().unwrap().get(&job_id).cloned()
    }

    fn pending_count(&self) -> usize {
        self.jobs
            .read()
            .unwrap()
            .values()
            .filter(|j| j.status == JobStatus::Pending)
            .count()
    }
}
