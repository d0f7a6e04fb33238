//! Order record and state machine.
//!
//! ```text
//! Pending --begin_processing--> Processing
//! Processing --approve--> Approved   (terminal)
//! Processing --fail-----> Failed     (terminal)
//! Failed --retry--> Pending          (re-enqueued by the workflow)
//! ```
//!
//! `has_been_processed` is true exactly when the status is terminal; every
//! transition below maintains that coupling. Orders are never deleted — they
//! are the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ordermill_core::{DomainError, DomainResult, OrderId, ProductId, ProfileId, TenantId};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Approved,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Approved | OrderStatus::Failed)
    }

    /// Human-readable label, used in CSV exports.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Approved => "Approved",
            OrderStatus::Failed => "Failed",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// An order for a quantity of one product, created by one profile within one
/// tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub created_by: ProfileId,
    /// Globally unique, generated at creation, immutable.
    pub reference_code: Uuid,
    pub quantity: i64,
    pub status: OrderStatus,
    pub has_been_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order in `Pending`.
    ///
    /// Fails with [`DomainError::InvalidQuantity`] unless `quantity > 0`.
    pub fn new(
        tenant_id: TenantId,
        product_id: ProductId,
        created_by: ProfileId,
        quantity: i64,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity);
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            tenant_id,
            product_id,
            created_by,
            reference_code: Uuid::new_v4(),
            quantity,
            status: OrderStatus::Pending,
            has_been_processed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Pending → Processing.
    pub fn begin_processing(&mut self) -> DomainResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "cannot begin processing from {}",
                self.status
            )));
        }
        self.status = OrderStatus::Processing;
        self.touch();
        Ok(())
    }

    /// Processing → Approved (terminal).
    pub fn approve(&mut self) -> DomainResult<()> {
        self.finish(OrderStatus::Approved)
    }

    /// Processing → Failed (terminal).
    pub fn fail(&mut self) -> DomainResult<()> {
        self.finish(OrderStatus::Failed)
    }

    fn finish(&mut self, terminal: OrderStatus) -> DomainResult<()> {
        debug_assert!(terminal.is_terminal());
        if self.status != OrderStatus::Processing {
            return Err(DomainError::invalid_transition(format!(
                "cannot finish from {}",
                self.status
            )));
        }
        self.status = terminal;
        self.has_been_processed = true;
        self.touch();
        Ok(())
    }

    /// Failed → Pending, clearing the processed flag.
    ///
    /// This is the only re-entry path into the workflow; it is triggered by
    /// an explicit operator action, never automatically.
    pub fn retry(&mut self) -> DomainResult<()> {
        if self.status != OrderStatus::Failed {
            return Err(DomainError::invalid_transition(format!(
                "only failed orders can be retried, order is {}",
                self.status
            )));
        }
        self.status = OrderStatus::Pending;
        self.has_been_processed = false;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_order() -> Order {
        Order::new(TenantId::new(), ProductId::new(), ProfileId::new(), 5).unwrap()
    }

    #[test]
    fn new_order_is_pending_and_unprocessed() {
        let order = pending_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.has_been_processed);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        for quantity in [0, -1, -100] {
            let result = Order::new(TenantId::new(), ProductId::new(), ProfileId::new(), quantity);
            assert_eq!(result.unwrap_err(), DomainError::InvalidQuantity);
        }
    }

    #[test]
    fn full_lifecycle_pending_processing_approved() {
        let mut order = pending_order();
        order.begin_processing().unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(!order.has_been_processed);

        order.approve().unwrap();
        assert_eq!(order.status, OrderStatus::Approved);
        assert!(order.has_been_processed);
    }

    #[test]
    fn terminal_status_and_processed_flag_stay_coupled() {
        let mut order = pending_order();
        assert_eq!(order.status.is_terminal(), order.has_been_processed);

        order.begin_processing().unwrap();
        assert_eq!(order.status.is_terminal(), order.has_been_processed);

        order.fail().unwrap();
        assert_eq!(order.status.is_terminal(), order.has_been_processed);

        order.retry().unwrap();
        assert_eq!(order.status.is_terminal(), order.has_been_processed);
    }

    #[test]
    fn retry_only_from_failed() {
        let mut pending = pending_order();
        assert!(matches!(
            pending.retry(),
            Err(DomainError::InvalidTransition(_))
        ));
        assert_eq!(pending.status, OrderStatus::Pending);

        let mut processing = pending_order();
        processing.begin_processing().unwrap();
        assert!(matches!(
            processing.retry(),
            Err(DomainError::InvalidTransition(_))
        ));
        assert_eq!(processing.status, OrderStatus::Processing);

        let mut approved = pending_order();
        approved.begin_processing().unwrap();
        approved.approve().unwrap();
        assert!(matches!(
            approved.retry(),
            Err(DomainError::InvalidTransition(_))
        ));
        assert_eq!(approved.status, OrderStatus::Approved);
    }

    #[test]
    fn retry_resets_a_failed_order() {
        let mut order = pending_order();
        order.begin_processing().unwrap();
        order.fail().unwrap();

        order.retry().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.has_been_processed);
    }

    #[test]
    fn cannot_begin_processing_twice() {
        let mut order = pending_order();
        order.begin_processing().unwrap();
        assert!(matches!(
            order.begin_processing(),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn cannot_finish_an_order_that_is_not_processing() {
        let mut order = pending_order();
        assert!(order.approve().is_err());
        assert!(order.fail().is_err());
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
