//! Background job system.
//!
//! ## Design
//!
//! - Jobs are tenant-scoped and typed; payloads travel as JSON.
//! - Enqueueing deduplicates on an idempotency key while a job with that key
//!   is still queued, so duplicate submissions and concurrent retries cannot
//!   double-queue. Running jobs do not absorb new enqueues: their handler
//!   may already have finished its work, and an absorbed enqueue would
//!   silently vanish.
//! - Delivery is at-least-once, not exactly-once: handlers must be
//!   idempotent (order processing guards with a Pending-only fetch).
//! - A failing handler marks the job failed and logs; there is **no**
//!   automatic re-dispatch. A throwing step re-dispatched automatically
//!   could loop forever; the explicit human-triggered order retry is the
//!   only re-entry path.

pub mod executor;
pub mod queue;
pub mod types;

pub use executor::{JobExecutor, JobExecutorConfig, JobExecutorHandle};
pub use queue::{InMemoryJobQueue, JobQueue, JobQueueError};
pub use types::{GenerateExportJob, Job, JobId, JobKind, JobStatus, ProcessOrderJob};
