//! Export record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordermill_core::{DomainError, DomainResult, ExportId, ProfileId, TenantId};

/// Export lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Pending,
    Ready,
    Failed,
}

impl ExportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportStatus::Ready | ExportStatus::Failed)
    }
}

/// Generated export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A requested bulk CSV export, scoped to one tenant.
///
/// Created in `Pending`; mutated only by the export pipeline; immutable once
/// terminal except for superuser cleanup (deletion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub id: ExportId,
    pub tenant_id: TenantId,
    pub requested_by: ProfileId,
    pub status: ExportStatus,
    pub file: Option<ExportFile>,
    pub created_at: DateTime<Utc>,
}

impl Export {
    pub fn new(tenant_id: TenantId, requested_by: ProfileId) -> Self {
        Self {
            id: ExportId::new(),
            tenant_id,
            requested_by,
            status: ExportStatus::Pending,
            file: None,
            created_at: Utc::now(),
        }
    }

    /// File name the generated blob is keyed by.
    pub fn file_name(&self) -> String {
        format!("export_{}.csv", self.id)
    }

    /// Pending → Ready, attaching the generated file.
    pub fn mark_ready(&mut self, bytes: Vec<u8>) -> DomainResult<()> {
        if self.status != ExportStatus::Pending {
            return Err(DomainError::invalid_transition(
                "export is no longer pending",
            ));
        }
        self.file = Some(ExportFile {
            name: self.file_name(),
            bytes,
        });
        self.status = ExportStatus::Ready;
        Ok(())
    }

    /// Pending → Failed.
    pub fn mark_failed(&mut self) -> DomainResult<()> {
        if self.status != ExportStatus::Pending {
            return Err(DomainError::invalid_transition(
                "export is no longer pending",
            ));
        }
        self.status = ExportStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_export_carries_the_keyed_file() {
        let mut export = Export::new(TenantId::new(), ProfileId::new());
        export.mark_ready(b"a,b\n".to_vec()).unwrap();

        assert_eq!(export.status, ExportStatus::Ready);
        let file = export.file.as_ref().unwrap();
        assert_eq!(file.name, format!("export_{}.csv", export.id));
    }

    #[test]
    fn terminal_exports_are_immutable() {
        let mut export = Export::new(TenantId::new(), ProfileId::new());
        export.mark_failed().unwrap();

        assert!(export.mark_ready(Vec::new()).is_err());
        assert!(export.mark_failed().is_err());
        assert_eq!(export.status, ExportStatus::Failed);
    }
}
