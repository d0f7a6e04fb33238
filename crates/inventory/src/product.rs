//! Product record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ordermill_core::{DomainError, DomainResult, ProductId, TenantId};

/// A sellable product belonging to exactly one tenant.
///
/// `stock_quantity` never goes negative. The only write path to it is the
/// inventory ledger, which serializes concurrent adjustments per product;
/// [`Product::adjusted_quantity`] is the pure arithmetic the ledger applies
/// under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub name: String,
    pub sku: Uuid,
    pub stock_quantity: i64,
    pub is_active: bool,
}

impl Product {
    pub fn new(tenant_id: TenantId, name: impl Into<String>, stock_quantity: i64) -> Self {
        Self {
            id: ProductId::new(),
            tenant_id,
            name: name.into(),
            sku: Uuid::new_v4(),
            stock_quantity,
            is_active: true,
        }
    }

    /// Compute the stock level after applying `delta`.
    ///
    /// A deduction larger than the current quantity fails with
    /// [`DomainError::InsufficientStock`] and implies no mutation.
    pub fn adjusted_quantity(&self, delta: i64) -> DomainResult<i64> {
        let next = self.stock_quantity.saturating_add(delta);
        if next < 0 {
            return Err(DomainError::InsufficientStock {
                available: self.stock_quantity,
                requested: -delta,
            });
        }
        Ok(next)
    }

    /// Whether an order for `quantity` units can currently be fulfilled.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.is_active && self.stock_quantity >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deduction_within_stock_succeeds() {
        let product = Product::new(TenantId::new(), "widget", 10);
        assert_eq!(product.adjusted_quantity(-10), Ok(0));
        assert_eq!(product.adjusted_quantity(-3), Ok(7));
    }

    #[test]
    fn oversell_fails_with_insufficient_stock() {
        let product = Product::new(TenantId::new(), "widget", 10);
        assert_eq!(
            product.adjusted_quantity(-11),
            Err(DomainError::InsufficientStock {
                available: 10,
                requested: 11,
            })
        );
    }

    #[test]
    fn restock_adds() {
        let product = Product::new(TenantId::new(), "widget", 10);
        assert_eq!(product.adjusted_quantity(25), Ok(35));
    }

    #[test]
    fn inactive_product_cannot_fulfill() {
        let mut product = Product::new(TenantId::new(), "widget", 10);
        product.is_active = false;
        assert!(!product.can_fulfill(1));
    }

    proptest! {
        #[test]
        fn adjusted_quantity_never_goes_negative(
            stock in 0i64..1_000_000,
            delta in -2_000_000i64..2_000_000,
        ) {
            let mut product = Product::new(TenantId::new(), "widget", stock);
            if let Ok(next) = product.adjusted_quantity(delta) {
                product.stock_quantity = next;
            }
            prop_assert!(product.stock_quantity >= 0);
        }
    }
}
