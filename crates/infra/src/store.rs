//! Tenant-scoped persistent collections.
//!
//! Every read through [`ScopedStore::query`]/[`ScopedStore::get`] is
//! filtered by the caller's [`TenantContext`]:
//!
//! - superuser principal bound: unfiltered,
//! - tenant bound: filtered to that tenant,
//! - nothing bound: **empty**.
//!
//! The empty default is the load-bearing invariant: a missing or failed
//! context-resolution step must never expose cross-tenant data.
//! [`ScopedStore::for_tenant`] is the explicit-tenant bypass for background
//! jobs and test harnesses that carry a tenant handle instead of an ambient
//! context.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use ordermill_auth::Profile;
use ordermill_core::{DomainError, DomainResult, ExportId, OrderId, ProductId, ProfileId, TenantId};
use ordermill_exports::Export;
use ordermill_inventory::Product;
use ordermill_orders::Order;
use ordermill_tenancy::TenantContext;

/// A record owned by exactly one tenant, addressable by a typed key.
pub trait TenantRecord: Clone + Send + Sync + 'static {
    type Key: Copy + Eq + Hash + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
    fn tenant_id(&self) -> TenantId;
}

impl TenantRecord for Product {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl TenantRecord for Order {
    type Key = OrderId;

    fn key(&self) -> OrderId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl TenantRecord for Export {
    type Key = ExportId;

    fn key(&self) -> ExportId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl TenantRecord for Profile {
    type Key = ProfileId;

    fn key(&self) -> ProfileId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// In-memory tenant-scoped collection.
#[derive(Debug)]
pub struct ScopedStore<R: TenantRecord> {
    inner: RwLock<HashMap<R::Key, R>>,
}

impl<R: TenantRecord> ScopedStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Whether this context may write a record owned by `tenant_id`.
    ///
    /// Writes carry the same discipline as reads: superuser unrestricted,
    /// a bound tenant writes only its own rows, nothing bound writes
    /// nothing.
    fn can_write(ctx: &TenantContext, tenant_id: TenantId) -> bool {
        ctx.is_superuser() || ctx.current_tenant_id() == Some(tenant_id)
    }

    /// Insert a new record on behalf of this context.
    pub fn insert(&self, ctx: &TenantContext, record: R) -> DomainResult<()> {
        if !Self::can_write(ctx, record.tenant_id()) {
            return Err(DomainError::Unauthorized);
        }
        let mut map = self.inner.write().unwrap();
        if map.contains_key(&record.key()) {
            return Err(DomainError::conflict("record already exists"));
        }
        map.insert(record.key(), record);
        Ok(())
    }

    /// Replace an existing record on behalf of this context.
    ///
    /// A record the context may not write is indistinguishable from an
    /// absent one.
    pub fn update(&self, ctx: &TenantContext, record: &R) -> DomainResult<()> {
        if !Self::can_write(ctx, record.tenant_id()) {
            return Err(DomainError::not_found());
        }
        let mut map = self.inner.write().unwrap();
        if !map.contains_key(&record.key()) {
            return Err(DomainError::not_found());
        }
        map.insert(record.key(), record.clone());
        Ok(())
    }

    /// All records visible to this context.
    pub fn query(&self, ctx: &TenantContext) -> Vec<R> {
        if ctx.is_superuser() {
            let map = self.inner.read().unwrap();
            return map.values().cloned().collect();
        }

        match ctx.current_tenant_id() {
            Some(tenant_id) => self.for_tenant(tenant_id),
            // No tenant bound: fail closed.
            None => Vec::new(),
        }
    }

    /// Fetch one record if it is visible to this context.
    ///
    /// A cross-tenant key is indistinguishable from an absent one.
    pub fn get(&self, ctx: &TenantContext, key: &R::Key) -> Option<R> {
        let map = self.inner.read().unwrap();
        let record = map.get(key)?;

        if ctx.is_superuser() {
            return Some(record.clone());
        }
        match ctx.current_tenant_id() {
            Some(tenant_id) if record.tenant_id() == tenant_id => Some(record.clone()),
            _ => None,
        }
    }

    /// Explicit-tenant bypass for background jobs and test harnesses.
    pub fn for_tenant(&self, tenant_id: TenantId) -> Vec<R> {
        let map = self.inner.read().unwrap();
        map.values()
            .filter(|r| r.tenant_id() == tenant_id)
            .cloned()
            .collect()
    }

    /// Fetch one record belonging to an explicit tenant.
    pub fn get_for_tenant(&self, tenant_id: TenantId, key: &R::Key) -> Option<R> {
        let map = self.inner.read().unwrap();
        map.get(key)
            .filter(|r| r.tenant_id() == tenant_id)
            .cloned()
    }

    /// Remove a record. Caller is responsible for the superuser check; the
    /// only delete path in the system is superuser export cleanup.
    pub fn remove(&self, key: &R::Key) -> Option<R> {
        let mut map = self.inner.write().unwrap();
        map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: TenantRecord> Default for ScopedStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
