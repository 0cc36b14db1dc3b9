//! Outgoing mail port

use async_trait::async_trait;

use crate::domain::{Invoice, InvoiceItem};
use crate::error::DomainError;

/// Sends invoice summaries to customers. Implemented over SMTP in the
/// infrastructure crate, with a no-op fallback when mail is not configured.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceMailer: Send + Sync {
    async fn send_invoice(
        &self,
        to: &str,
        organization_name: &str,
        invoice: &Invoice,
        items: &[InvoiceItem],
    ) -> Result<(), DomainError>;
}
