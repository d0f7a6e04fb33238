//! Host-based tenant resolution.

use ordermill_core::{DomainError, DomainResult, TenantId};

use crate::tenant::Tenant;

/// Lookup of tenants.
///
/// `find_by_domain` serves request resolution and must only return
/// **active** tenants; a deactivated tenant is indistinguishable from an
/// absent one at that boundary. `find_by_id` serves background jobs
/// re-binding context from an explicit handle and returns the tenant
/// regardless of activation, since deactivation blocks new request
/// resolution rather than historical data access.
pub trait TenantDirectory: Send + Sync {
    fn find_by_domain(&self, domain: &str) -> Option<Tenant>;

    fn find_by_id(&self, tenant_id: TenantId) -> Option<Tenant>;
}

impl<D> TenantDirectory for std::sync::Arc<D>
where
    D: TenantDirectory + ?Sized,
{
    fn find_by_domain(&self, domain: &str) -> Option<Tenant> {
        (**self).find_by_domain(domain)
    }

    fn find_by_id(&self, tenant_id: TenantId) -> Option<Tenant> {
        (**self).find_by_id(tenant_id)
    }
}

/// Extract the subdomain label from a request host.
///
/// The subdomain is the first dot-delimited label. A single-label host has no
/// subdomain and resolves to no tenant (e.g. a top-level admin request).
pub fn subdomain_of(host: &str) -> Option<&str> {
    let mut parts = host.split('.');
    let first = parts.next()?;
    parts.next()?;
    Some(first)
}

/// Resolve the active tenant for a request host.
///
/// Returns `Ok(None)` for non-tenant-scoped hosts. Fails with
/// [`DomainError::TenantNotFound`] when the host names a subdomain with no
/// active tenant behind it; callers surface this as a not-found response.
pub fn resolve<D: TenantDirectory>(host: &str, directory: &D) -> DomainResult<Option<Tenant>> {
    let Some(subdomain) = subdomain_of(host) else {
        return Ok(None);
    };

    match directory.find_by_domain(subdomain) {
        Some(tenant) => Ok(Some(tenant)),
        None => Err(DomainError::TenantNotFound),
    }
}
