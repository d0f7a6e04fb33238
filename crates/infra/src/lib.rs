//! `ordermill-infra` — storage, background jobs, and the services that tie
//! the domain crates together.
//!
//! Everything here is tenant-aware: collections are reached through
//! [`store::ScopedStore`], which fails closed when no tenant context is
//! bound, and background jobs re-bind their own context from an explicit
//! tenant id instead of inheriting the enqueuing request's.

pub mod export_pipeline;
pub mod jobs;
pub mod ledger;
pub mod store;
pub mod tenant_directory;
pub mod workflow;


pub use export_pipeline::ExportPipeline;
pub use jobs::{
    InMemoryJobQueue, Job, JobExecutor, JobExecutorConfig, JobExecutorHandle, JobKind, JobQueue,
    JobStatus,
};
pub use ledger::InventoryLedger;
pub use store::{ScopedStore, TenantRecord};
pub use tenant_directory::InMemoryTenantDirectory;
pub use workflow::{OrderWorkflow, WorkflowConfig};
