//! Invoice repository trait (port)

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Invoice, InvoiceItem, InvoiceStatus};
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub organization_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub is_estimate: Option<bool>,
}

/// Tenant-wide aggregate over non-estimate invoices.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStats {
    pub count: i64,
    pub total_sum: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Invoice>, DomainError>;
    async fn items_of(&self, invoice_id: &Uuid) -> Result<Vec<InvoiceItem>, DomainError>;

    /// Lookup for the tokenized public route, which carries no tenant context
    /// of its own. The caller must verify the token claims against the row.
    async fn find_public(&self, id: &Uuid) -> Result<Option<Invoice>, DomainError>;

    /// Insert the invoice and its items in one transaction.
    async fn create(&self, invoice: &Invoice, items: &[InvoiceItem]) -> Result<Invoice, DomainError>;

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, DomainError>;

    /// Drop and re-insert the item rows in one transaction.
    async fn replace_items(
        &self,
        invoice_id: &Uuid,
        items: &[InvoiceItem],
    ) -> Result<Vec<InvoiceItem>, DomainError>;

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: InvoiceFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Invoice>, DomainError>;

    /// Highest invoice number in the tenant, 0 when there are none.
    async fn highest_invoice_number(&self, tenant_id: &Uuid) -> Result<i64, DomainError>;

    async fn stats(&self, tenant_id: &Uuid) -> Result<InvoiceStats, DomainError>;
}
