//! Core job types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ordermill_core::{ExportId, OrderId, TenantId};

/// Unique job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job kind, routing to the registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    ProcessOrder,
    GenerateExport,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::ProcessOrder => "process_order",
            JobKind::GenerateExport => "generate_export",
        }
    }
}

/// Payload of an order-processing job.
///
/// Carries the ids, not the records: the handler re-binds tenant context
/// and re-fetches, since it may run in a different execution unit, process,
/// or time than the request that enqueued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOrderJob {
    pub order_id: OrderId,
    pub tenant_id: TenantId,
}

/// Payload of an export-generation job.
///
/// The order id list and tenant id are captured at request time, not
/// re-derived later, so later tenant-membership changes don't retroactively
/// include or exclude rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateExportJob {
    pub export_id: ExportId,
    pub order_ids: Vec<OrderId>,
    pub tenant_id: TenantId,
}

/// Job execution status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed { error: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

/// A queued unit of background work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Idempotency key: enqueueing deduplicates on this while a job with the
    /// same key is still pending.
    pub key: String,
    pub tenant_id: TenantId,
    pub kind: JobKind,
    pub payload: serde_json::Value,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        tenant_id: TenantId,
        kind: JobKind,
        key: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            key: key.into(),
            tenant_id,
            kind,
            payload,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Order-processing job, keyed by the order id.
    pub fn process_order(order_id: OrderId, tenant_id: TenantId) -> Self {
        let payload = ProcessOrderJob {
            order_id,
            tenant_id,
        };
        Self::new(
            tenant_id,
            JobKind::ProcessOrder,
            format!("process_order:{order_id}"),
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Export-generation job, keyed by the export id.
    pub fn generate_export(
        export_id: ExportId,
        order_ids: Vec<OrderId>,
        tenant_id: TenantId,
    ) -> Self {
        let payload = GenerateExportJob {
            export_id,
            order_ids,
            tenant_id,
        };
        Self::new(
            tenant_id,
            JobKind::GenerateExport,
            format!("generate_export:{export_id}"),
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.updated_at = Utc::now();
    }

    pub fn mark_completed(&mut self) {
        self.status = JobStatus::Completed;
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = JobStatus::Failed { error };
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_order_payload_round_trips() {
        let order_id = OrderId::new();
        let tenant_id = TenantId::new();
        let job = Job::process_order(order_id, tenant_id);

        let payload: ProcessOrderJob = serde_json::from_value(job.payload).unwrap();
        assert_eq!(payload.order_id, order_id);
        assert_eq!(payload.tenant_id, tenant_id);
        assert_eq!(job.key, format!("process_order:{order_id}"));
    }

    #[test]
    fn status_lifecycle() {
        let mut job = Job::process_order(OrderId::new(), TenantId::new());
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.status.is_terminal());

        job.mark_running();
        assert_eq!(job.status, JobStatus::Running);

        job.mark_failed("boom".into());
        assert!(job.status.is_terminal());
    }
}
