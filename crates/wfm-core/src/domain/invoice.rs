// ============================================================================
// WFM Core - Invoice Entities
// File: crates/wfm-core/src/domain/invoice.rs
// Description: Invoices, line items, and their status/tax/discount enums
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How a tax or discount value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxDiscountType {
    /// Percentage of the taxed/discounted base.
    Percent,
    /// Fixed amount, applied once per flagged item.
    FlatValue,
}

impl TaxDiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxDiscountType::Percent => "percent",
            TaxDiscountType::FlatValue => "flat_value",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "percent" => Some(TaxDiscountType::Percent),
            "flat_value" => Some(TaxDiscountType::FlatValue),
            _ => None,
        }
    }
}

/// Invoice lifecycle status. Estimates use the accepted/rejected states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Viewed,
    FullyPaid,
    PartiallyPaid,
    Overpaid,
    Void,
    Accepted,
    Rejected,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Viewed => "viewed",
            InvoiceStatus::FullyPaid => "fully_paid",
            InvoiceStatus::PartiallyPaid => "partially_paid",
            InvoiceStatus::Overpaid => "overpaid",
            InvoiceStatus::Void => "void",
            InvoiceStatus::Accepted => "accepted",
            InvoiceStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "viewed" => Some(InvoiceStatus::Viewed),
            "fully_paid" => Some(InvoiceStatus::FullyPaid),
            "partially_paid" => Some(InvoiceStatus::PartiallyPaid),
            "overpaid" => Some(InvoiceStatus::Overpaid),
            "void" => Some(InvoiceStatus::Void),
            "accepted" => Some(InvoiceStatus::Accepted),
            "rejected" => Some(InvoiceStatus::Rejected),
            _ => None,
        }
    }

    /// Statuses in which the creating user may still edit the invoice.
    pub fn allows_member_edit(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Invoice {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    /// Sequential per tenant.
    pub invoice_number: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,

    pub discount_value: f64,
    pub discount_type: Option<TaxDiscountType>,
    pub tax: f64,
    pub tax_type: Option<TaxDiscountType>,
    pub tax2: f64,
    pub tax2_type: Option<TaxDiscountType>,
    /// Organization billing flag captured on the invoice at creation time.
    pub discount_after_tax: bool,

    pub terms: Option<String>,

    pub total_value: f64,
    pub already_paid: f64,
    pub amount_due: f64,

    pub status: InvoiceStatus,
    pub is_estimate: bool,

    /// JWT backing the public link, when one has been generated.
    pub token: Option<String>,
    pub sent_to_email: Option<String>,
    pub created_by_id: Option<Uuid>,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Re-derive payment state after a payment of `amount`.
    pub fn apply_payment(&mut self, amount: f64) {
        self.already_paid += amount;
        self.amount_due = self.total_value - self.already_paid;
        self.status = if self.amount_due == 0.0 {
            InvoiceStatus::FullyPaid
        } else if self.amount_due < 0.0 {
            InvoiceStatus::Overpaid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        self.updated_at = Utc::now();
    }

    pub fn mark_sent(&mut self, email: &str) {
        self.status = InvoiceStatus::Sent;
        self.sent_to_email = Some(email.to_string());
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Invoice line item. `total_value` is always quantity x price, computed
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub invoice_id: Uuid,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Quantity cannot be negative"))]
    pub quantity: f64,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    pub total_value: f64,
    pub apply_tax: bool,
    pub apply_discount: bool,

    /// Optional references for billed work or rebilled expenses.
    pub employee_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        invoice_id: Uuid,
        description: String,
        quantity: f64,
        price: f64,
        apply_tax: bool,
        apply_discount: bool,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let item = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            invoice_id,
            description: description.trim().to_string(),
            quantity,
            price,
            total_value: quantity * price,
            apply_tax,
            apply_discount,
            employee_id: None,
            expense_id: None,
            created_at: now,
            updated_at: now,
        };
        item.validate()?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(total: f64) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            invoice_number: 1,
            invoice_date: now.date_naive(),
            due_date: now.date_naive(),
            currency: "USD".to_string(),
            discount_value: 0.0,
            discount_type: None,
            tax: 0.0,
            tax_type: None,
            tax2: 0.0,
            tax2_type: None,
            discount_after_tax: false,
            terms: None,
            total_value: total,
            already_paid: 0.0,
            amount_due: total,
            status: InvoiceStatus::Sent,
            is_estimate: false,
            token: None,
            sent_to_email: None,
            created_by_id: None,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn partial_payment_sets_partially_paid() {
        let mut inv = invoice(100.0);
        inv.apply_payment(40.0);
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(inv.amount_due, 60.0);
    }

    #[test]
    fn exact_payment_sets_fully_paid() {
        let mut inv = invoice(100.0);
        inv.apply_payment(100.0);
        assert_eq!(inv.status, InvoiceStatus::FullyPaid);
        assert_eq!(inv.amount_due, 0.0);
    }

    #[test]
    fn overpayment_sets_overpaid_with_negative_due() {
        let mut inv = invoice(100.0);
        inv.apply_payment(150.0);
        assert_eq!(inv.status, InvoiceStatus::Overpaid);
        assert_eq!(inv.amount_due, -50.0);
    }

    #[test]
    fn item_total_is_quantity_times_price() {
        let item = InvoiceItem::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Consulting".to_string(),
            8.0,
            120.0,
            true,
            false,
        )
        .unwrap();
        assert_eq!(item.total_value, 960.0);
    }

    #[test]
    fn member_edit_allowed_only_for_draft_and_sent() {
        assert!(InvoiceStatus::Draft.allows_member_edit());
        assert!(InvoiceStatus::Sent.allows_member_edit());
        assert!(!InvoiceStatus::FullyPaid.allows_member_edit());
        assert!(!InvoiceStatus::Void.allows_member_edit());
    }
}
