//! Inventory ledger: the sole write path to product stock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use ordermill_core::{DomainError, DomainResult, ProductId};
use ordermill_inventory::Product;
use ordermill_tenancy::TenantContext;

use crate::store::ScopedStore;

/// Exclusive, lock-protected stock adjustment.
///
/// Lock granularity is per-product: two concurrent adjustments to the same
/// product serialize on that product's lock; adjustments to different
/// products never contend. Callers must route **every** stock mutation
/// through [`adjust`](Self::adjust) — nothing else writes
/// `stock_quantity`.
pub struct InventoryLedger {
    products: Arc<ScopedStore<Product>>,
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl InventoryLedger {
    pub fn new(products: Arc<ScopedStore<Product>>) -> Self {
        Self {
            products,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, product_id: ProductId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(product_id).or_default().clone()
    }

    /// Atomically adjust a product's stock by `delta`.
    ///
    /// Holds the product's lock for the full read-modify-write, so
    /// concurrent adjustments cannot lose updates or oversell. A deduction
    /// beyond the locked quantity fails with
    /// [`DomainError::InsufficientStock`] and mutates nothing. The product
    /// is fetched through the caller's context, so a cross-tenant id is a
    /// plain [`DomainError::NotFound`].
    pub fn adjust(
        &self,
        ctx: &TenantContext,
        product_id: ProductId,
        delta: i64,
    ) -> DomainResult<Product> {
        let lock = self.lock_for(product_id);
        let _guard = lock.lock().unwrap();

        let mut product = self
            .products
            .get(ctx, &product_id)
            .ok_or(DomainError::NotFound)?;

        product.stock_quantity = product.adjusted_quantity(delta)?;
        self.products.update(ctx, &product)?;

        debug!(
            product_id = %product_id,
            delta,
            stock = product.stock_quantity,
            "stock adjusted"
        );

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordermill_tenancy::Tenant;
    use std::thread;

    fn setup(stock: i64) -> (Arc<InventoryLedger>, TenantContext, ProductId) {
        let tenant = Tenant::new("Acme Inc", "acme").unwrap();
        let ctx = TenantContext::for_job(tenant);
        let products = Arc::new(ScopedStore::new());
        let product = Product::new(ctx.current_tenant_id().unwrap(), "widget", stock);
        let product_id = product.id;
        products.insert(&ctx, product).unwrap();

        let ledger = Arc::new(InventoryLedger::new(products));
        (ledger, ctx, product_id)
    }

    #[test]
    fn adjust_deducts_and_persists() {
        let (ledger, ctx, product_id) = setup(100);
        let product = ledger.adjust(&ctx, product_id, -30).unwrap();
        assert_eq!(product.stock_quantity, 70);

        let product = ledger.adjust(&ctx, product_id, 10).unwrap();
        assert_eq!(product.stock_quantity, 80);
    }

    #[test]
    fn oversell_fails_and_mutates_nothing() {
        let (ledger, ctx, product_id) = setup(10);
        let err = ledger.adjust(&ctx, product_id, -11).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        let product = ledger.adjust(&ctx, product_id, 0).unwrap();
        assert_eq!(product.stock_quantity, 10);
    }

    #[test]
    fn cross_tenant_adjust_is_not_found() {
        let (ledger, _ctx, product_id) = setup(10);
        let other = Tenant::new("Beta LLC", "beta").unwrap();
        let other_ctx = TenantContext::for_job(other);

        assert_eq!(
            ledger.adjust(&other_ctx, product_id, -1),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn concurrent_deductions_never_oversell() {
        // Stock 10, 8 workers each deducting 3: exactly 3 can succeed.
        let (ledger, ctx, product_id) = setup(10);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                let ctx = ctx.clone();
                thread::spawn(move || ledger.adjust(&ctx, product_id, -3).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 3);
        let product = ledger.adjust(&ctx, product_id, 0).unwrap();
        assert_eq!(product.stock_quantity, 1);
    }
}
