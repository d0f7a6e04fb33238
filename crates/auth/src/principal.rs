//! The authenticated actor.

use serde::{Deserialize, Serialize};

use ordermill_core::{ProfileId, TenantId};

use crate::profile::Profile;

/// An authenticated actor.
///
/// A superuser is not bound to any tenant and bypasses tenant filtering
/// entirely; a member acts strictly within its profile's tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    Superuser,
    Member(Profile),
}

impl Principal {
    pub fn member(profile: Profile) -> Self {
        Self::Member(profile)
    }

    pub fn is_superuser(&self) -> bool {
        matches!(self, Principal::Superuser)
    }

    /// Tenant this principal is bound to, if any.
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            Principal::Superuser => None,
            Principal::Member(profile) => Some(profile.tenant_id),
        }
    }

    pub fn profile_id(&self) -> Option<ProfileId> {
        match self {
            Principal::Superuser => None,
            Principal::Member(profile) => Some(profile.id),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Principal::Superuser => None,
            Principal::Member(profile) => Some(profile),
        }
    }
}
