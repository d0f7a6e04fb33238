//! Tenant membership record.

use serde::{Deserialize, Serialize};

use ordermill_core::{ProfileId, TenantId};

use crate::role::Role;

/// A user's membership in exactly one tenant.
///
/// Profiles carry the role and blocked flag; the authenticated identity
/// behind a profile is supplied by the external auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub role: Role,
    pub is_blocked: bool,
}

impl Profile {
    pub fn new(tenant_id: TenantId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: ProfileId::new(),
            tenant_id,
            display_name: display_name.into(),
            role,
            is_blocked: false,
        }
    }
}
