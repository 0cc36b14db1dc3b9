// ============================================================================
// WFM Core - Invoice Service
// File: crates/wfm-core/src/services/invoice_service.rs
// Description: Invoice/estimate lifecycle, totals computation, payments,
//              public links, and outgoing invoice mail
// ============================================================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Invoice, InvoiceItem, InvoiceStatus, Role, TaxDiscountType};
use crate::error::DomainError;
use crate::mailer::InvoiceMailer;
use crate::repositories::{InvoiceFilter, InvoiceRepository, InvoiceStats, OrganizationRepository};
use wfm_shared::{Paginated, Pagination};
use wfm_security::jwt::JwtService;

/// Identity of the requesting user, as carried by the access token.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub role: Role,
}

/// Tax and discount configuration of an invoice, separated out so totals can
/// be computed without a full invoice row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxDiscountPolicy {
    pub tax: f64,
    pub tax_type: Option<TaxDiscountType>,
    pub tax2: f64,
    pub tax2_type: Option<TaxDiscountType>,
    pub discount_value: f64,
    pub discount_type: Option<TaxDiscountType>,
    pub discount_after_tax: bool,
}

impl TaxDiscountPolicy {
    fn of(invoice: &Invoice) -> Self {
        Self {
            tax: invoice.tax,
            tax_type: invoice.tax_type,
            tax2: invoice.tax2,
            tax2_type: invoice.tax2_type,
            discount_value: invoice.discount_value,
            discount_type: invoice.discount_type,
            discount_after_tax: invoice.discount_after_tax,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub total_tax: f64,
    pub total_discount: f64,
    pub total: f64,
}

/// Compute invoice totals from its line items and tax/discount policy.
///
/// Taxes and the discount only touch items flagged `apply_tax` /
/// `apply_discount`. Percent values apply to the item line total; flat values
/// apply once per flagged item. A percent discount configured after-tax is
/// skipped during the item walk and instead taken from the taxed subtotal at
/// the end. Negative rates are treated as zero, and the grand total never
/// goes below zero.
pub fn compute_totals(items: &[InvoiceItem], policy: &TaxDiscountPolicy) -> InvoiceTotals {
    let tax = policy.tax.max(0.0);
    let tax2 = policy.tax2.max(0.0);
    let discount = policy.discount_value.max(0.0);

    let mut subtotal = 0.0;
    let mut total_tax = 0.0;
    let mut total_discount = 0.0;

    for item in items {
        let line = item.total_value;
        subtotal += line;

        if item.apply_tax {
            match policy.tax_type {
                Some(TaxDiscountType::Percent) => total_tax += line * tax / 100.0,
                Some(TaxDiscountType::FlatValue) => total_tax += tax,
                None => {}
            }
            match policy.tax2_type {
                Some(TaxDiscountType::Percent) => total_tax += line * tax2 / 100.0,
                Some(TaxDiscountType::FlatValue) => total_tax += tax2,
                None => {}
            }
        }

        if item.apply_discount {
            match policy.discount_type {
                // After-tax percent discounts are resolved once the taxed
                // subtotal is known.
                Some(TaxDiscountType::Percent) if !policy.discount_after_tax => {
                    total_discount += line * discount / 100.0
                }
                Some(TaxDiscountType::Percent) => {}
                Some(TaxDiscountType::FlatValue) => total_discount += discount,
                None => {}
            }
        }
    }

    if policy.discount_after_tax && policy.discount_type == Some(TaxDiscountType::Percent) {
        total_discount = (subtotal + total_tax) * discount / 100.0;
    }

    let total = (subtotal - total_discount + total_tax).max(0.0);

    InvoiceTotals {
        subtotal,
        total_tax,
        total_discount,
        total,
    }
}

/// Line item payload for create/update.
#[derive(Debug, Clone)]
pub struct InvoiceItemInput {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub apply_tax: bool,
    pub apply_discount: bool,
    pub employee_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    pub organization_id: Uuid,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub terms: Option<String>,
    pub policy: TaxDiscountPolicy,
    pub is_estimate: bool,
    pub already_paid: f64,
    pub items: Vec<InvoiceItemInput>,
}

/// Partial invoice update; `None` leaves the field untouched. Items and the
/// tax/discount policy are replaced wholesale when present, and totals are
/// re-derived server-side either way.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceInput {
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub terms: Option<String>,
    pub policy: Option<TaxDiscountPolicy>,
    pub items: Option<Vec<InvoiceItemInput>>,
}

pub struct InvoiceService<I, O, M>
where
    I: InvoiceRepository,
    O: OrganizationRepository,
    M: InvoiceMailer,
{
    invoice_repo: Arc<I>,
    organization_repo: Arc<O>,
    mailer: Arc<M>,
    jwt_secret: String,
}

impl<I, O, M> InvoiceService<I, O, M>
where
    I: InvoiceRepository,
    O: OrganizationRepository,
    M: InvoiceMailer,
{
    pub fn new(
        invoice_repo: Arc<I>,
        organization_repo: Arc<O>,
        mailer: Arc<M>,
        jwt_secret: String,
    ) -> Self {
        Self {
            invoice_repo,
            organization_repo,
            mailer,
            jwt_secret,
        }
    }

    /// Create an invoice or estimate with its line items. The invoice number
    /// is assigned server-side, one above the tenant's current highest.
    pub async fn create(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        input: CreateInvoiceInput,
    ) -> Result<(Invoice, Vec<InvoiceItem>), DomainError> {
        // 1. Organization must exist in the tenant
        self.organization_repo
            .find_by_id(tenant_id, &input.organization_id)
            .await?
            .ok_or(DomainError::OrganizationNotFound)?;

        // 2. Assign the next sequential invoice number
        let number = self.invoice_repo.highest_invoice_number(tenant_id).await? + 1;

        // 3. Build the line items
        let invoice_id = Uuid::new_v4();
        let items = build_items(tenant_id, &input.organization_id, &invoice_id, &input.items)?;

        // 4. Derive totals
        let totals = compute_totals(&items, &input.policy);
        let already_paid = input.already_paid.max(0.0);

        let now = Utc::now();
        let invoice = Invoice {
            id: invoice_id,
            tenant_id: *tenant_id,
            organization_id: input.organization_id,
            invoice_number: number,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            currency: input.currency.trim().to_uppercase(),
            discount_value: input.policy.discount_value,
            discount_type: input.policy.discount_type,
            tax: input.policy.tax,
            tax_type: input.policy.tax_type,
            tax2: input.policy.tax2,
            tax2_type: input.policy.tax2_type,
            discount_after_tax: input.policy.discount_after_tax,
            terms: input.terms,
            total_value: totals.total,
            already_paid,
            amount_due: totals.total - already_paid,
            status: InvoiceStatus::Draft,
            is_estimate: input.is_estimate,
            token: None,
            sent_to_email: None,
            created_by_id: Some(actor.user_id),
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        invoice
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.invoice_repo.create(&invoice, &items).await?;
        info!(
            "Created {} {} for tenant {}",
            if created.is_estimate { "estimate" } else { "invoice" },
            created.invoice_number,
            tenant_id
        );
        Ok((created, items))
    }

    pub async fn get(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<(Invoice, Vec<InvoiceItem>), DomainError> {
        let invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        let items = self.invoice_repo.items_of(&invoice.id).await?;
        Ok((invoice, items))
    }

    pub async fn list(
        &self,
        tenant_id: &Uuid,
        filter: InvoiceFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Invoice>, DomainError> {
        self.invoice_repo.list(tenant_id, filter, pagination).await
    }

    pub async fn update(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        id: &Uuid,
        input: UpdateInvoiceInput,
    ) -> Result<(Invoice, Vec<InvoiceItem>), DomainError> {
        // 1. Fetch and authorize
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;

        // 2. Apply scalar updates
        if let Some(date) = input.invoice_date {
            invoice.invoice_date = date;
        }
        if let Some(date) = input.due_date {
            invoice.due_date = date;
        }
        if let Some(currency) = input.currency {
            invoice.currency = currency.trim().to_uppercase();
        }
        if let Some(terms) = input.terms {
            invoice.terms = Some(terms);
        }
        if let Some(policy) = input.policy {
            invoice.discount_value = policy.discount_value;
            invoice.discount_type = policy.discount_type;
            invoice.tax = policy.tax;
            invoice.tax_type = policy.tax_type;
            invoice.tax2 = policy.tax2;
            invoice.tax2_type = policy.tax2_type;
            invoice.discount_after_tax = policy.discount_after_tax;
        }

        // 3. Replace items when a new set was sent
        let items = match input.items {
            Some(inputs) => {
                let items =
                    build_items(tenant_id, &invoice.organization_id, &invoice.id, &inputs)?;
                self.invoice_repo.replace_items(&invoice.id, &items).await?
            }
            None => self.invoice_repo.items_of(&invoice.id).await?,
        };

        // 4. Re-derive totals from whatever is now current
        let totals = compute_totals(&items, &TaxDiscountPolicy::of(&invoice));
        invoice.total_value = totals.total;
        invoice.amount_due = totals.total - invoice.already_paid;
        invoice
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        invoice.updated_at = Utc::now();

        let updated = self.invoice_repo.update(&invoice).await?;
        Ok((updated, items))
    }

    pub async fn delete(&self, tenant_id: &Uuid, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;
        self.invoice_repo.soft_delete(tenant_id, id).await?;
        info!("Deleted invoice {} for tenant {}", invoice.invoice_number, tenant_id);
        Ok(())
    }

    /// Record a payment and re-derive the payment status.
    pub async fn record_payment(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        id: &Uuid,
        amount: f64,
    ) -> Result<Invoice, DomainError> {
        if amount <= 0.0 {
            return Err(DomainError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;
        invoice.apply_payment(amount);
        self.invoice_repo.update(&invoice).await
    }

    /// Mark the invoice sent and email a summary to the recipient. The mail
    /// leg is best effort: a send failure is logged and never fails the
    /// operation.
    pub async fn send(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        id: &Uuid,
        email: &str,
    ) -> Result<Invoice, DomainError> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;

        let organization = self
            .organization_repo
            .find_by_id(tenant_id, &invoice.organization_id)
            .await?
            .ok_or(DomainError::OrganizationNotFound)?;

        invoice.mark_sent(email);
        let updated = self.invoice_repo.update(&invoice).await?;

        let items = self.invoice_repo.items_of(&updated.id).await?;
        if let Err(e) = self
            .mailer
            .send_invoice(email, &organization.name, &updated, &items)
            .await
        {
            warn!("Invoice {} email failed: {}", updated.invoice_number, e);
        }
        Ok(updated)
    }

    /// Generate (or rotate) the tokenized public link for an invoice. The
    /// token is stored on the row; clearing it revokes the link.
    pub async fn generate_link(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        id: &Uuid,
    ) -> Result<Invoice, DomainError> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;

        let token = self
            .jwt_service()
            .generate_invoice_link_token(&invoice.id, tenant_id, &invoice.organization_id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        invoice.token = Some(token);
        invoice.updated_at = Utc::now();
        self.invoice_repo.update(&invoice).await
    }

    /// Resolve a public link. The token must decode, reference this invoice,
    /// and match the token currently stored on the row. A sent invoice viewed
    /// through its link moves to viewed.
    pub async fn public_invoice(
        &self,
        id: &Uuid,
        token: &str,
    ) -> Result<(Invoice, Vec<InvoiceItem>), DomainError> {
        let claims = self
            .jwt_service()
            .validate_invoice_link_token(token)
            .map_err(|_| DomainError::InvalidInvoiceToken)?;
        if claims.invoice_id != id.to_string() {
            return Err(DomainError::InvalidInvoiceToken);
        }

        let mut invoice = self
            .invoice_repo
            .find_public(id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;

        let authorized = invoice.token.as_deref() == Some(token)
            && claims.tenant_id == invoice.tenant_id.to_string()
            && claims.organization_id == invoice.organization_id.to_string();
        if !authorized {
            return Err(DomainError::InvalidInvoiceToken);
        }

        if invoice.status == InvoiceStatus::Sent {
            invoice.status = InvoiceStatus::Viewed;
            invoice.updated_at = Utc::now();
            invoice = self.invoice_repo.update(&invoice).await?;
        }

        let items = self.invoice_repo.items_of(&invoice.id).await?;
        Ok((invoice, items))
    }

    /// Accept or reject an estimate.
    pub async fn set_estimate_status(
        &self,
        tenant_id: &Uuid,
        actor: &Actor,
        id: &Uuid,
        accepted: bool,
    ) -> Result<Invoice, DomainError> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;
        if !invoice.is_estimate {
            return Err(DomainError::ValidationError(
                "Only estimates can be accepted or rejected".to_string(),
            ));
        }
        invoice.status = if accepted {
            InvoiceStatus::Accepted
        } else {
            InvoiceStatus::Rejected
        };
        invoice.updated_at = Utc::now();
        self.invoice_repo.update(&invoice).await
    }

    /// Void an invoice, ending its lifecycle.
    pub async fn void(&self, tenant_id: &Uuid, actor: &Actor, id: &Uuid) -> Result<Invoice, DomainError> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::InvoiceNotFound)?;
        ensure_can_mutate(&invoice, actor)?;
        if invoice.status == InvoiceStatus::Void {
            return Err(DomainError::ValidationError("Invoice is already void".to_string()));
        }
        invoice.status = InvoiceStatus::Void;
        invoice.updated_at = Utc::now();
        self.invoice_repo.update(&invoice).await
    }

    pub async fn stats(&self, tenant_id: &Uuid) -> Result<InvoiceStats, DomainError> {
        self.invoice_repo.stats(tenant_id).await
    }

    fn jwt_service(&self) -> JwtService {
        // Expiries are irrelevant for link tokens, which carry their own.
        JwtService::new(self.jwt_secret.clone(), 0, 0)
    }
}

/// Member-level actors may only touch invoices they created, and only while
/// the status still allows it. Admins and managers bypass both checks.
fn ensure_can_mutate(invoice: &Invoice, actor: &Actor) -> Result<(), DomainError> {
    if actor.role.can_manage_invoices() {
        return Ok(());
    }
    if invoice.created_by_id != Some(actor.user_id) {
        return Err(DomainError::Forbidden(
            "Only the creator may modify this invoice".to_string(),
        ));
    }
    if !invoice.status.allows_member_edit() {
        return Err(DomainError::Forbidden(format!(
            "Invoice in status {} can no longer be modified",
            invoice.status.as_str()
        )));
    }
    Ok(())
}

fn build_items(
    tenant_id: &Uuid,
    organization_id: &Uuid,
    invoice_id: &Uuid,
    inputs: &[InvoiceItemInput],
) -> Result<Vec<InvoiceItem>, DomainError> {
    let mut items = Vec::with_capacity(inputs.len());
    for input in inputs {
        let mut item = InvoiceItem::new(
            *tenant_id,
            *organization_id,
            *invoice_id,
            input.description.clone(),
            input.quantity,
            input.price,
            input.apply_tax,
            input.apply_discount,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        item.employee_id = input.employee_id;
        item.expense_id = input.expense_id;
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Organization;
    use crate::mailer::MockInvoiceMailer;
    use crate::repositories::invoice_repository::MockInvoiceRepository;
    use crate::repositories::organization_repository::MockOrganizationRepository;

    fn item(total: f64, apply_tax: bool, apply_discount: bool) -> InvoiceItem {
        let now = Utc::now();
        InvoiceItem {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            description: "Work".to_string(),
            quantity: 1.0,
            price: total,
            total_value: total,
            apply_tax,
            apply_discount,
            employee_id: None,
            expense_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn percent_tax_on_all_items_equals_subtotal_share() {
        let items = vec![item(100.0, true, false), item(250.0, true, false)];
        let policy = TaxDiscountPolicy {
            tax: 10.0,
            tax_type: Some(TaxDiscountType::Percent),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.subtotal, 350.0);
        assert!((totals.total_tax - 35.0).abs() < 1e-9);
        assert!((totals.total - 385.0).abs() < 1e-9);
    }

    #[test]
    fn flat_tax_applies_once_per_flagged_item() {
        let items = vec![item(100.0, true, false), item(200.0, true, false), item(50.0, false, false)];
        let policy = TaxDiscountPolicy {
            tax: 5.0,
            tax_type: Some(TaxDiscountType::FlatValue),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total_tax, 10.0);
        assert_eq!(totals.total, 360.0);
    }

    #[test]
    fn both_taxes_accumulate() {
        let items = vec![item(100.0, true, false)];
        let policy = TaxDiscountPolicy {
            tax: 10.0,
            tax_type: Some(TaxDiscountType::Percent),
            tax2: 2.0,
            tax2_type: Some(TaxDiscountType::FlatValue),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total_tax, 12.0);
    }

    #[test]
    fn after_tax_percent_discount_uses_taxed_subtotal() {
        let items = vec![item(100.0, true, true), item(100.0, true, true)];
        let policy = TaxDiscountPolicy {
            tax: 10.0,
            tax_type: Some(TaxDiscountType::Percent),
            discount_value: 50.0,
            discount_type: Some(TaxDiscountType::Percent),
            discount_after_tax: true,
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        // (200 + 20) * 0.5
        assert_eq!(totals.total_discount, 110.0);
        assert_eq!(totals.total, 110.0);
    }

    #[test]
    fn pre_tax_percent_discount_only_hits_flagged_items() {
        let items = vec![item(100.0, false, true), item(100.0, false, false)];
        let policy = TaxDiscountPolicy {
            discount_value: 10.0,
            discount_type: Some(TaxDiscountType::Percent),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total_discount, 10.0);
        assert_eq!(totals.total, 190.0);
    }

    #[test]
    fn total_is_clamped_at_zero() {
        let items = vec![item(10.0, false, true)];
        let policy = TaxDiscountPolicy {
            discount_value: 500.0,
            discount_type: Some(TaxDiscountType::FlatValue),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total, 0.0);
        // The discount itself is reported unclamped.
        assert_eq!(totals.total_discount, 500.0);
    }

    #[test]
    fn negative_rates_are_treated_as_zero() {
        let items = vec![item(100.0, true, true)];
        let policy = TaxDiscountPolicy {
            tax: -10.0,
            tax_type: Some(TaxDiscountType::Percent),
            discount_value: -5.0,
            discount_type: Some(TaxDiscountType::FlatValue),
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total_tax, 0.0);
        assert_eq!(totals.total_discount, 0.0);
        assert_eq!(totals.total, 100.0);
    }

    #[test]
    fn untyped_tax_contributes_nothing() {
        let items = vec![item(100.0, true, true)];
        let policy = TaxDiscountPolicy {
            tax: 25.0,
            tax_type: None,
            discount_value: 25.0,
            discount_type: None,
            ..Default::default()
        };
        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.total, 100.0);
    }

    fn actor(role: Role) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            employee_id: None,
            role,
        }
    }

    fn stored_invoice(tenant_id: Uuid, created_by: Uuid, status: InvoiceStatus) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id: Uuid::new_v4(),
            invoice_number: 7,
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
            total_value: 100.0,
            already_paid: 0.0,
            amount_due: 100.0,
            status,
            is_estimate: false,
            token: None,
            sent_to_email: None,
            created_by_id: Some(created_by),
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn service(
        invoice_repo: MockInvoiceRepository,
        organization_repo: MockOrganizationRepository,
        mailer: MockInvoiceMailer,
    ) -> InvoiceService<MockInvoiceRepository, MockOrganizationRepository, MockInvoiceMailer> {
        InvoiceService::new(
            Arc::new(invoice_repo),
            Arc::new(organization_repo),
            Arc::new(mailer),
            "test-secret".to_string(),
        )
    }

    #[tokio::test]
    async fn create_assigns_next_invoice_number() {
        let tenant_id = Uuid::new_v4();
        let org = Organization::new(
            tenant_id,
            "Acme".to_string(),
            "USD".to_string(),
            "acme".to_string(),
        )
        .unwrap();
        let org_id = org.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_highest_invoice_number()
            .returning(|_| Ok(41));
        invoices
            .expect_create()
            .withf(|invoice, items| invoice.invoice_number == 42 && items.len() == 1)
            .returning(|invoice, _| Ok(invoice.clone()));

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .returning(move |_, _| Ok(Some(org.clone())));

        let svc = service(invoices, orgs, MockInvoiceMailer::new());
        let input = CreateInvoiceInput {
            organization_id: org_id,
            invoice_date: Utc::now().date_naive(),
            due_date: Utc::now().date_naive(),
            currency: "usd".to_string(),
            terms: None,
            policy: TaxDiscountPolicy::default(),
            is_estimate: false,
            already_paid: 0.0,
            items: vec![InvoiceItemInput {
                description: "Consulting".to_string(),
                quantity: 2.0,
                price: 50.0,
                apply_tax: false,
                apply_discount: false,
                employee_id: None,
                expense_id: None,
            }],
        };

        let (created, items) = svc
            .create(&tenant_id, &actor(Role::Admin), input)
            .await
            .unwrap();
        assert_eq!(created.invoice_number, 42);
        assert_eq!(created.currency, "USD");
        assert_eq!(created.total_value, 100.0);
        assert_eq!(items[0].total_value, 100.0);
    }

    #[tokio::test]
    async fn member_cannot_modify_paid_invoice() {
        let tenant_id = Uuid::new_v4();
        let member = actor(Role::Employee);
        let stored = stored_invoice(tenant_id, member.user_id, InvoiceStatus::FullyPaid);
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        let err = svc.delete(&tenant_id, &member, &id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn member_cannot_modify_someone_elses_invoice() {
        let tenant_id = Uuid::new_v4();
        let member = actor(Role::Employee);
        let stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::Draft);
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        let err = svc
            .record_payment(&tenant_id, &member, &id, 10.0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn manager_bypasses_creator_check() {
        let tenant_id = Uuid::new_v4();
        let manager = actor(Role::Manager);
        let stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::FullyPaid);
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        invoices.expect_soft_delete().returning(|_, _| Ok(()));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        assert!(svc.delete(&tenant_id, &manager, &id).await.is_ok());
    }

    #[tokio::test]
    async fn record_payment_rederives_status() {
        let tenant_id = Uuid::new_v4();
        let admin = actor(Role::Admin);
        let stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::Sent);
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        invoices
            .expect_update()
            .withf(|inv| inv.status == InvoiceStatus::PartiallyPaid && inv.amount_due == 60.0)
            .returning(|inv| Ok(inv.clone()));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        let updated = svc.record_payment(&tenant_id, &admin, &id, 40.0).await.unwrap();
        assert_eq!(updated.already_paid, 40.0);
    }

    #[tokio::test]
    async fn send_survives_mailer_failure() {
        let tenant_id = Uuid::new_v4();
        let admin = actor(Role::Admin);
        let stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::Draft);
        let id = stored.id;
        let org = Organization::new(
            tenant_id,
            "Acme".to_string(),
            "USD".to_string(),
            "acme".to_string(),
        )
        .unwrap();

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        invoices
            .expect_update()
            .withf(|inv| inv.status == InvoiceStatus::Sent)
            .returning(|inv| Ok(inv.clone()));
        invoices.expect_items_of().returning(|_| Ok(vec![]));

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .returning(move |_, _| Ok(Some(org.clone())));

        let mut mailer = MockInvoiceMailer::new();
        mailer
            .expect_send_invoice()
            .returning(|_, _, _, _| Err(DomainError::EmailSendError("smtp down".to_string())));

        let svc = service(invoices, orgs, mailer);
        let sent = svc
            .send(&tenant_id, &admin, &id, "billing@acme.test")
            .await
            .unwrap();
        assert_eq!(sent.status, InvoiceStatus::Sent);
        assert_eq!(sent.sent_to_email.as_deref(), Some("billing@acme.test"));
    }

    #[tokio::test]
    async fn public_route_rejects_token_for_other_invoice() {
        let tenant_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let other_invoice = Uuid::new_v4();
        let jwt = JwtService::new("test-secret".to_string(), 0, 0);
        let token = jwt
            .generate_invoice_link_token(&other_invoice, &tenant_id, &org_id)
            .unwrap();

        let svc = service(
            MockInvoiceRepository::new(),
            MockOrganizationRepository::new(),
            MockInvoiceMailer::new(),
        );
        let err = svc.public_invoice(&Uuid::new_v4(), &token).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInvoiceToken));
    }

    #[tokio::test]
    async fn public_route_marks_sent_invoice_viewed() {
        let tenant_id = Uuid::new_v4();
        let mut stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::Sent);
        let jwt = JwtService::new("test-secret".to_string(), 0, 0);
        let token = jwt
            .generate_invoice_link_token(&stored.id, &tenant_id, &stored.organization_id)
            .unwrap();
        stored.token = Some(token.clone());
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_public()
            .returning(move |_| Ok(Some(stored.clone())));
        invoices
            .expect_update()
            .withf(|inv| inv.status == InvoiceStatus::Viewed)
            .returning(|inv| Ok(inv.clone()));
        invoices.expect_items_of().returning(|_| Ok(vec![]));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        let (invoice, _) = svc.public_invoice(&id, &token).await.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Viewed);
    }

    #[tokio::test]
    async fn accept_rejects_non_estimates() {
        let tenant_id = Uuid::new_v4();
        let admin = actor(Role::Admin);
        let stored = stored_invoice(tenant_id, Uuid::new_v4(), InvoiceStatus::Sent);
        let id = stored.id;

        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));

        let svc = service(invoices, MockOrganizationRepository::new(), MockInvoiceMailer::new());
        let err = svc
            .set_estimate_status(&tenant_id, &admin, &id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
