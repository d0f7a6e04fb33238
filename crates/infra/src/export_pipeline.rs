//! Asynchronous tenant-scoped CSV export.

use std::sync::Arc;

use tracing::{error, info, warn};

use ordermill_auth::{Permission, authorize};
use ordermill_core::{DomainError, DomainResult, ExportId, OrderId, TenantId};
use ordermill_exports::{Export, ExportFile, ExportStatus, csv};
use ordermill_inventory::Product;
use ordermill_orders::Order;
use ordermill_tenancy::{TenantContext, TenantDirectory};

use crate::jobs::{GenerateExportJob, Job, JobExecutor, JobKind, JobQueue};
use crate::store::ScopedStore;

/// Bulk CSV materialization of committed order data.
///
/// Runs outside the original request's context: generation re-binds tenant
/// scope from the ids captured at request time.
pub struct ExportPipeline {
    exports: Arc<ScopedStore<Export>>,
    orders: Arc<ScopedStore<Order>>,
    products: Arc<ScopedStore<Product>>,
    tenants: Arc<dyn TenantDirectory>,
    queue: Arc<dyn JobQueue>,
}

impl ExportPipeline {
    pub fn new(
        exports: Arc<ScopedStore<Export>>,
        orders: Arc<ScopedStore<Order>>,
        products: Arc<ScopedStore<Product>>,
        tenants: Arc<dyn TenantDirectory>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            exports,
            orders,
            products,
            tenants,
            queue,
        }
    }

    /// Request an export of the given orders.
    ///
    /// Creates a `Pending` export and enqueues generation with the order id
    /// list and tenant id captured now; later tenant-membership changes
    /// don't retroactively include or exclude rows. Returns immediately.
    pub fn request(&self, ctx: &TenantContext, order_ids: Vec<OrderId>) -> DomainResult<Export> {
        let principal = ctx.current_principal().ok_or(DomainError::Unauthorized)?;
        authorize(principal, Permission::OrderExport)?;
        let requested_by = principal.profile_id().ok_or(DomainError::Unauthorized)?;
        let tenant = ctx.current().ok_or(DomainError::TenantNotFound)?;

        let export = Export::new(tenant.id, requested_by);
        self.exports.insert(ctx, export.clone())?;

        self.queue
            .enqueue(Job::generate_export(export.id, order_ids, tenant.id))
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!(export_id = %export.id, "export requested");
        Ok(export)
    }

    /// Asynchronous generation step, invoked by the job executor.
    ///
    /// Re-binds tenant context from the explicit tenant id. The export and
    /// every order are fetched through that scope — the tenant filter is
    /// re-applied even though the caller supplied explicit ids, as defense
    /// against id tampering; orders outside the tenant are silently
    /// omitted. A generation failure marks the export `Failed` and the
    /// error still propagates for operational visibility — it is never
    /// masked.
    pub fn generate(
        &self,
        export_id: ExportId,
        order_ids: &[OrderId],
        tenant_id: TenantId,
    ) -> DomainResult<()> {
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .ok_or(DomainError::ExportNotFound)?;
        let ctx = TenantContext::for_job(tenant);

        let mut export = self
            .exports
            .get(&ctx, &export_id)
            .ok_or(DomainError::ExportNotFound)?;

        match self.build_document(&ctx, order_ids) {
            Ok(bytes) => {
                export.mark_ready(bytes)?;
                self.exports.update(&ctx, &export)?;
                info!(export_id = %export.id, file = export.file_name(), "export ready");
                Ok(())
            }
            Err(err) => {
                error!(export_id = %export.id, error = %err, "export generation failed");
                export.mark_failed()?;
                self.exports.update(&ctx, &export)?;
                Err(err)
            }
        }
    }

    fn build_document(&self, ctx: &TenantContext, order_ids: &[OrderId]) -> DomainResult<Vec<u8>> {
        let mut rows = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            let Some(order) = self.orders.get(ctx, order_id) else {
                warn!(%order_id, "order not visible in export scope; omitting");
                continue;
            };
            let product = self
                .products
                .get(ctx, &order.product_id)
                .ok_or(DomainError::NotFound)?;
            rows.push((order, product.sku));
        }
        Ok(csv::render(&rows))
    }

    /// Download a generated export file.
    ///
    /// Available only once `Ready` and only within the requester's tenant
    /// scope; anything else is [`DomainError::ExportNotFound`],
    /// indistinguishable from an export that never existed.
    pub fn download(&self, ctx: &TenantContext, export_id: ExportId) -> DomainResult<ExportFile> {
        let export = self
            .exports
            .get(ctx, &export_id)
            .ok_or(DomainError::ExportNotFound)?;

        match (export.status, export.file) {
            (ExportStatus::Ready, Some(file)) => Ok(file),
            _ => Err(DomainError::ExportNotFound),
        }
    }

    /// Superuser-only cleanup of old exports.
    pub fn delete(&self, ctx: &TenantContext, export_id: ExportId) -> DomainResult<()> {
        if !ctx.is_superuser() {
            return Err(DomainError::Unauthorized);
        }
        self.exports
            .remove(&export_id)
            .ok_or(DomainError::ExportNotFound)?;
        info!(%export_id, "export deleted");
        Ok(())
    }

    /// Register this pipeline's job handler on an executor.
    pub fn register_handlers<Q: JobQueue + 'static>(
        pipeline: Arc<Self>,
        executor: &mut JobExecutor<Q>,
    ) {
        executor.register_handler(JobKind::GenerateExport, move |job| {
            let payload: GenerateExportJob = serde_json::from_value(job.payload.clone())?;
            pipeline.generate(payload.export_id, &payload.order_ids, payload.tenant_id)?;
            Ok(())
        });
    }
}
