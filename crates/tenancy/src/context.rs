//! Per-unit-of-work tenant/principal binding.

use ordermill_auth::Principal;
use ordermill_core::TenantId;

use crate::tenant::Tenant;

/// The active tenant and principal for one unit of work.
///
/// This is an explicit value threaded through call chains rather than a
/// thread-local or global: under any execution model, including cooperative
/// concurrency where logical requests interleave on one worker, nothing can
/// leak between units of work. Construct one per request or job invocation
/// and drop (or [`unbind`](Self::unbind)) it on completion.
///
/// Background jobs do not inherit the originating request's context; they
/// re-bind from an explicit tenant handle via [`TenantContext::for_job`],
/// since the job may run in a different execution unit, process, or time
/// than the request that enqueued it.
#[derive(Debug, Clone, Default)]
pub struct TenantContext {
    tenant: Option<Tenant>,
    principal: Option<Principal>,
}

impl TenantContext {
    /// A context with nothing bound. Every scoped query through it is empty.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bind a resolved tenant and authenticated principal.
    pub fn bind(tenant: Tenant, principal: Principal) -> Self {
        Self {
            tenant: Some(tenant),
            principal: Some(principal),
        }
    }

    /// Bind a principal with no tenant (top-level, non-tenant-scoped host).
    ///
    /// Only useful for superusers; a member principal without a bound tenant
    /// still sees nothing through scoped queries.
    pub fn for_principal(principal: Principal) -> Self {
        Self {
            tenant: None,
            principal: Some(principal),
        }
    }

    /// Re-bind for a background job carrying an explicit tenant handle.
    ///
    /// Jobs act on behalf of the system, not any authenticated principal.
    pub fn for_job(tenant: Tenant) -> Self {
        Self {
            tenant: Some(tenant),
            principal: None,
        }
    }

    pub fn current(&self) -> Option<&Tenant> {
        self.tenant.as_ref()
    }

    pub fn current_tenant_id(&self) -> Option<TenantId> {
        self.tenant.as_ref().map(|t| t.id)
    }

    pub fn current_principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_superuser(&self) -> bool {
        self.principal.as_ref().is_some_and(Principal::is_superuser)
    }

    /// Clear all bindings, returning the context to its anonymous state.
    ///
    /// Call this when a unit of work completes if the context value outlives
    /// it (e.g. stored in a reused worker slot).
    pub fn unbind(&mut self) {
        self.tenant = None;
        self.principal = None;
    }
}
