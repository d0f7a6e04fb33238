//! In-memory tenant directory.

use std::collections::HashMap;
use std::sync::RwLock;

use ordermill_core::{DomainError, DomainResult, TenantId};
use ordermill_tenancy::{Tenant, TenantDirectory};

/// In-memory [`TenantDirectory`] for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    inner: RwLock<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant. Domains are unique across the directory.
    pub fn register(&self, tenant: Tenant) -> DomainResult<()> {
        let mut map = self.inner.write().unwrap();
        if map.values().any(|t| t.domain == tenant.domain) {
            return Err(DomainError::conflict(format!(
                "domain {:?} is already taken",
                tenant.domain
            )));
        }
        map.insert(tenant.id, tenant);
        Ok(())
    }

    /// Activate or deactivate a tenant.
    pub fn set_active(&self, tenant_id: TenantId, is_active: bool) -> DomainResult<()> {
        let mut map = self.inner.write().unwrap();
        let tenant = map.get_mut(&tenant_id).ok_or(DomainError::NotFound)?;
        tenant.is_active = is_active;
        Ok(())
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn find_by_domain(&self, domain: &str) -> Option<Tenant> {
        let map = self.inner.read().unwrap();
        map.values()
            .find(|t| t.is_active && t.domain == domain)
            .cloned()
    }

    fn find_by_id(&self, tenant_id: TenantId) -> Option<Tenant> {
        self.inner.read().unwrap().get(&tenant_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordermill_tenancy::resolve;

    #[test]
    fn registered_tenant_resolves_by_domain() {
        let directory = InMemoryTenantDirectory::new();
        let tenant = Tenant::new("Acme Inc", "acme").unwrap();
        directory.register(tenant.clone()).unwrap();

        let resolved = resolve("acme.example.com", &directory).unwrap().unwrap();
        assert_eq!(resolved.id, tenant.id);
    }

    #[test]
    fn duplicate_domain_is_rejected() {
        let directory = InMemoryTenantDirectory::new();
        directory
            .register(Tenant::new("Acme Inc", "acme").unwrap())
            .unwrap();

        let err = directory
            .register(Tenant::new("Other Acme", "acme").unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn deactivated_tenant_stops_resolving_but_keeps_its_id_handle() {
        let directory = InMemoryTenantDirectory::new();
        let tenant = Tenant::new("Acme Inc", "acme").unwrap();
        directory.register(tenant.clone()).unwrap();
        directory.set_active(tenant.id, false).unwrap();

        assert_eq!(
            resolve("acme.example.com", &directory),
            Err(DomainError::TenantNotFound)
        );
        assert!(directory.find_by_id(tenant.id).is_some());
    }
}
