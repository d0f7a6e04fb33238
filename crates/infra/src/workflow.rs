//! Order approval workflow.
//!
//! Drives an order from submission to a terminal state:
//!
//! - `create` persists a `Pending` order and enqueues asynchronous
//!   processing, so creation latency is independent of downstream
//!   validation cost.
//! - `process` is the job handler: it re-binds tenant context from the ids
//!   carried in the job, moves the order to `Processing`, sits through a
//!   simulated downstream latency window, then approves or fails it against
//!   the inventory ledger.
//! - `retry` is the explicit operator action that re-enters a `Failed`
//!   order into the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use ordermill_auth::{Permission, authorize};
use ordermill_core::{DomainError, DomainResult, OrderId, ProductId, TenantId};
use ordermill_inventory::Product;
use ordermill_orders::{Order, OrderStatus};
use ordermill_tenancy::{TenantContext, TenantDirectory};

use crate::jobs::{Job, JobExecutor, JobKind, JobQueue, ProcessOrderJob};
use crate::ledger::InventoryLedger;
use crate::store::ScopedStore;

/// Workflow tuning.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Simulated downstream-call latency between `Processing` and the
    /// approval step. The order is visible as `Processing` to concurrent
    /// readers for this window.
    pub approval_delay: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            approval_delay: Duration::ZERO,
        }
    }
}

impl WorkflowConfig {
    pub fn with_approval_delay(mut self, delay: Duration) -> Self {
        self.approval_delay = delay;
        self
    }
}

/// The order state machine service.
pub struct OrderWorkflow {
    orders: Arc<ScopedStore<Order>>,
    products: Arc<ScopedStore<Product>>,
    ledger: Arc<InventoryLedger>,
    tenants: Arc<dyn TenantDirectory>,
    queue: Arc<dyn JobQueue>,
    config: WorkflowConfig,
}

impl OrderWorkflow {
    pub fn new(
        orders: Arc<ScopedStore<Order>>,
        products: Arc<ScopedStore<Product>>,
        ledger: Arc<InventoryLedger>,
        tenants: Arc<dyn TenantDirectory>,
        queue: Arc<dyn JobQueue>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            orders,
            products,
            ledger,
            tenants,
            queue,
            config,
        }
    }

    /// Create an order in `Pending` and enqueue asynchronous processing.
    ///
    /// Requires an authenticated member with order-create rights and a
    /// resolved tenant. Returns immediately; the approval outcome arrives
    /// through the job pipeline.
    pub fn create(
        &self,
        ctx: &TenantContext,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<Order> {
        let principal = ctx.current_principal().ok_or(DomainError::Unauthorized)?;
        authorize(principal, Permission::OrderCreate)?;
        let created_by = principal.profile_id().ok_or(DomainError::Unauthorized)?;
        let tenant = ctx.current().ok_or(DomainError::TenantNotFound)?;

        // The product must be visible within this context.
        self.products
            .get(ctx, &product_id)
            .ok_or(DomainError::NotFound)?;

        let order = Order::new(tenant.id, product_id, created_by, quantity)?;
        self.orders.insert(ctx, order.clone())?;

        self.queue
            .enqueue(Job::process_order(order.id, tenant.id))
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!(
            order_id = %order.id,
            reference_code = %order.reference_code,
            quantity,
            "order created and queued for processing"
        );

        Ok(order)
    }

    /// Create several orders in one submission. Each is queued
    /// independently.
    pub fn create_bulk(
        &self,
        ctx: &TenantContext,
        requests: &[(ProductId, i64)],
    ) -> DomainResult<Vec<Order>> {
        requests
            .iter()
            .map(|&(product_id, quantity)| self.create(ctx, product_id, quantity))
            .collect()
    }

    /// Asynchronous processing step, invoked by the job executor.
    ///
    /// Re-binds tenant context from the explicit ids; the enqueuing
    /// request's context is never inherited. The fetch is filtered to
    /// `Pending`, so a double-enqueued or already-processed order is a
    /// no-op, not an error. Any unexpected failure while the order is still
    /// `Processing` forces it to `Failed` instead of leaving it stuck; the
    /// error is logged and recovered here, never re-thrown into the
    /// executor, since an automatic re-dispatch of a throwing step could
    /// loop forever.
    pub fn process(&self, order_id: OrderId, tenant_id: TenantId) -> DomainResult<()> {
        let Some(tenant) = self.tenants.find_by_id(tenant_id) else {
            debug!(%order_id, %tenant_id, "unknown tenant for queued order; skipping");
            return Ok(());
        };
        let mut ctx = TenantContext::for_job(tenant);

        let pending = self
            .orders
            .get(&ctx, &order_id)
            .filter(|o| o.status == OrderStatus::Pending);
        let Some(mut order) = pending else {
            debug!(%order_id, "order not pending in this tenant; skipping");
            ctx.unbind();
            return Ok(());
        };

        order.begin_processing()?;
        self.orders.update(&ctx, &order)?;

        // Stand-in for a real downstream call; the order is observable as
        // Processing for this window.
        if !self.config.approval_delay.is_zero() {
            std::thread::sleep(self.config.approval_delay);
        }

        if let Err(err) = self.approve(&ctx, &mut order) {
            error!(%order_id, error = %err, "approval step failed");
            if order.status == OrderStatus::Processing {
                order.fail()?;
                self.orders.update(&ctx, &order)?;
                error!(%order_id, "order forced to failed after unexpected error");
            }
        }

        ctx.unbind();
        Ok(())
    }

    /// Approval step: deduct stock and settle the order.
    ///
    /// No-op unless the order is `Processing`. Exits with the order in a
    /// terminal state and `has_been_processed` set.
    fn approve(&self, ctx: &TenantContext, order: &mut Order) -> DomainResult<()> {
        if order.status != OrderStatus::Processing {
            return Ok(());
        }

        let product = self
            .products
            .get(ctx, &order.product_id)
            .ok_or(DomainError::NotFound)?;

        if product.can_fulfill(order.quantity) {
            match self.ledger.adjust(ctx, product.id, -order.quantity) {
                Ok(_) => order.approve()?,
                // Lost the race against a concurrent approval; the stock
                // check above is advisory, the ledger is authoritative.
                Err(DomainError::InsufficientStock { .. }) => order.fail()?,
                Err(err) => return Err(err),
            }
        } else {
            order.fail()?;
        }

        self.orders.update(ctx, order)?;
        info!(
            order_id = %order.id,
            status = %order.status,
            "order settled"
        );
        Ok(())
    }

    /// Re-enter a `Failed` order into the pipeline.
    ///
    /// Permitted for any principal with order-update rights on the order.
    /// Fails with [`DomainError::InvalidTransition`] from any other state.
    /// The idempotency key (order id) means duplicate concurrent retries
    /// collapse into one queued job.
    pub fn retry(&self, ctx: &TenantContext, order_id: OrderId) -> DomainResult<Order> {
        let principal = ctx.current_principal().ok_or(DomainError::Unauthorized)?;
        authorize(principal, Permission::OrderUpdate)?;

        let mut order = self
            .orders
            .get(ctx, &order_id)
            .ok_or(DomainError::NotFound)?;
        order.retry()?;
        self.orders.update(ctx, &order)?;

        self.queue
            .enqueue(Job::process_order(order.id, order.tenant_id))
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!(order_id = %order.id, "failed order re-queued for processing");
        Ok(order)
    }

    /// Register this workflow's job handler on an executor.
    pub fn register_handlers<Q: JobQueue + 'static>(
        workflow: Arc<Self>,
        executor: &mut JobExecutor<Q>,
    ) {
        executor.register_handler(JobKind::ProcessOrder, move |job| {
            let payload: ProcessOrderJob = serde_json::from_value(job.payload.clone())?;
            workflow.process(payload.order_id, payload.tenant_id)?;
            Ok(())
        });
    }
}
