// ============================================================================
// WFM Infrastructure - PostgreSQL Invoice Repository
// File: crates/wfm-infrastructure/src/database/postgres/invoice_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{error, info};
use uuid::Uuid;

use wfm_core::domain::{Invoice, InvoiceItem, InvoiceStatus, TaxDiscountType};
use wfm_core::error::DomainError;
use wfm_core::repositories::{InvoiceFilter, InvoiceRepository, InvoiceStats};
use wfm_shared::{Paginated, Pagination};

pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct InvoiceRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub invoice_number: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub discount_value: f64,
    pub discount_type: Option<String>,
    pub tax: f64,
    pub tax_type: Option<String>,
    pub tax2: f64,
    pub tax2_type: Option<String>,
    pub discount_after_tax: bool,
    pub terms: Option<String>,
    pub total_value: f64,
    pub already_paid: f64,
    pub amount_due: f64,
    pub status: String,
    pub is_estimate: bool,
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

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            invoice_number: row.invoice_number,
            invoice_date: row.invoice_date,
            due_date: row.due_date,
            currency: row.currency,
            discount_value: row.discount_value,
            discount_type: row.discount_type.as_deref().and_then(TaxDiscountType::from_str),
            tax: row.tax,
            tax_type: row.tax_type.as_deref().and_then(TaxDiscountType::from_str),
            tax2: row.tax2,
            tax2_type: row.tax2_type.as_deref().and_then(TaxDiscountType::from_str),
            discount_after_tax: row.discount_after_tax,
            terms: row.terms,
            total_value: row.total_value,
            already_paid: row.already_paid,
            amount_due: row.amount_due,
            status: InvoiceStatus::from_str(&row.status).unwrap_or_default(),
            is_estimate: row.is_estimate,
            token: row.token,
            sent_to_email: row.sent_to_email,
            created_by_id: row.created_by_id,
            is_active: row.is_active,
            is_archived: row.is_archived,
            archived_at: row.archived_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total_value: f64,
    pub apply_tax: bool,
    pub apply_discount: bool,
    pub employee_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            invoice_id: row.invoice_id,
            description: row.description,
            quantity: row.quantity,
            price: row.price,
            total_value: row.total_value,
            apply_tax: row.apply_tax,
            apply_discount: row.apply_discount,
            employee_id: row.employee_id,
            expense_id: row.expense_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    items: &[InvoiceItem],
) -> Result<(), sqlx::Error> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                id, tenant_id, organization_id, invoice_id, description,
                quantity, price, total_value, apply_tax, apply_discount,
                employee_id, expense_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(item.id)
        .bind(item.tenant_id)
        .bind(item.organization_id)
        .bind(item.invoice_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.total_value)
        .bind(item.apply_tax)
        .bind(item.apply_discount)
        .bind(item.employee_id)
        .bind(item.expense_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM invoices
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding invoice by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn items_of(&self, invoice_id: &Uuid) -> Result<Vec<InvoiceItem>, DomainError> {
        let rows: Vec<InvoiceItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, invoice_id, description,
                quantity, price, total_value, apply_tax, apply_discount,
                employee_id, expense_id, created_at, updated_at
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing invoice items: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_public(&self, id: &Uuid) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM invoices
            WHERE id = $1 AND token IS NOT NULL AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding public invoice: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, invoice: &Invoice, items: &[InvoiceItem]) -> Result<Invoice, DomainError> {
        info!(
            "Creating invoice {} with {} items",
            invoice.invoice_number,
            items.len()
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Database error opening transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let row: InvoiceRow = sqlx::query_as(
            r#"
            INSERT INTO invoices (
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            RETURNING
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.tenant_id)
        .bind(invoice.organization_id)
        .bind(invoice.invoice_number)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.currency)
        .bind(invoice.discount_value)
        .bind(invoice.discount_type.map(|t| t.as_str()))
        .bind(invoice.tax)
        .bind(invoice.tax_type.map(|t| t.as_str()))
        .bind(invoice.tax2)
        .bind(invoice.tax2_type.map(|t| t.as_str()))
        .bind(invoice.discount_after_tax)
        .bind(&invoice.terms)
        .bind(invoice.total_value)
        .bind(invoice.already_paid)
        .bind(invoice.amount_due)
        .bind(invoice.status.as_str())
        .bind(invoice.is_estimate)
        .bind(&invoice.token)
        .bind(&invoice.sent_to_email)
        .bind(invoice.created_by_id)
        .bind(invoice.is_active)
        .bind(invoice.is_archived)
        .bind(invoice.archived_at)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .bind(invoice.deleted_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating invoice: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists(format!("invoice number {}", invoice.invoice_number))
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        insert_items(&mut tx, items).await.map_err(|e| {
            error!("Database error inserting invoice items: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            error!("Database error committing invoice create: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, DomainError> {
        let row: InvoiceRow = sqlx::query_as(
            r#"
            UPDATE invoices
            SET
                invoice_date = $3,
                due_date = $4,
                currency = $5,
                discount_value = $6,
                discount_type = $7,
                tax = $8,
                tax_type = $9,
                tax2 = $10,
                tax2_type = $11,
                discount_after_tax = $12,
                terms = $13,
                total_value = $14,
                already_paid = $15,
                amount_due = $16,
                status = $17,
                token = $18,
                sent_to_email = $19,
                is_active = $20,
                is_archived = $21,
                archived_at = $22,
                updated_at = $23
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.tenant_id)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.currency)
        .bind(invoice.discount_value)
        .bind(invoice.discount_type.map(|t| t.as_str()))
        .bind(invoice.tax)
        .bind(invoice.tax_type.map(|t| t.as_str()))
        .bind(invoice.tax2)
        .bind(invoice.tax2_type.map(|t| t.as_str()))
        .bind(invoice.discount_after_tax)
        .bind(&invoice.terms)
        .bind(invoice.total_value)
        .bind(invoice.already_paid)
        .bind(invoice.amount_due)
        .bind(invoice.status.as_str())
        .bind(&invoice.token)
        .bind(&invoice.sent_to_email)
        .bind(invoice.is_active)
        .bind(invoice.is_archived)
        .bind(invoice.archived_at)
        .bind(invoice.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating invoice: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn replace_items(
        &self,
        invoice_id: &Uuid,
        items: &[InvoiceItem],
    ) -> Result<Vec<InvoiceItem>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Database error opening transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error clearing invoice items: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        insert_items(&mut tx, items).await.map_err(|e| {
            error!("Database error inserting invoice items: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            error!("Database error committing item replacement: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(items.to_vec())
    }

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting invoice: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: InvoiceFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Invoice>, DomainError> {
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM invoices
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::varchar IS NULL OR status = $3)
              AND ($4::boolean IS NULL OR is_estimate = $4)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(status)
        .bind(filter.is_estimate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting invoices: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, invoice_number, invoice_date, due_date,
                currency, discount_value, discount_type, tax, tax_type, tax2, tax2_type,
                discount_after_tax, terms, total_value, already_paid, amount_due,
                status, is_estimate, token, sent_to_email, created_by_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM invoices
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::varchar IS NULL OR status = $3)
              AND ($4::boolean IS NULL OR is_estimate = $4)
            ORDER BY invoice_number DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(status)
        .bind(filter.is_estimate)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing invoices: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }

    async fn highest_invoice_number(&self, tenant_id: &Uuid) -> Result<i64, DomainError> {
        let max: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(invoice_number), 0) FROM invoices
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error reading highest invoice number: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(max)
    }

    async fn stats(&self, tenant_id: &Uuid) -> Result<InvoiceStats, DomainError> {
        let row: (i64, f64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_value), 0)
            FROM invoices
            WHERE tenant_id = $1 AND deleted_at IS NULL AND is_estimate = false
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error computing invoice stats: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(InvoiceStats {
            count: row.0,
            total_sum: row.1,
        })
    }
}
