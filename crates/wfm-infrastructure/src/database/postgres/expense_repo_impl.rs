// ============================================================================
// WFM Infrastructure - PostgreSQL Expense Repository
// File: crates/wfm-infrastructure/src/database/postgres/expense_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use wfm_core::domain::Expense;
use wfm_core::error::DomainError;
use wfm_core::repositories::{ExpenseFilter, ExpenseRepository, ExpenseStats};
use wfm_shared::{Paginated, Pagination};

pub struct PgExpenseRepository {
    pool: PgPool,
}

impl PgExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ExpenseRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub value_date: NaiveDate,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            employee_id: row.employee_id,
            amount: row.amount,
            currency: row.currency,
            category: row.category,
            purpose: row.purpose,
            notes: row.notes,
            value_date: row.value_date,
            is_active: row.is_active,
            is_archived: row.is_archived,
            archived_at: row.archived_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl ExpenseRepository for PgExpenseRepository {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Expense>, DomainError> {
        let row: Option<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, employee_id, amount, currency,
                category, purpose, notes, value_date, is_active, is_archived,
                archived_at, created_at, updated_at, deleted_at
            FROM expenses
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding expense by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, expense: &Expense) -> Result<Expense, DomainError> {
        let row: ExpenseRow = sqlx::query_as(
            r#"
            INSERT INTO expenses (
                id, tenant_id, organization_id, employee_id, amount, currency,
                category, purpose, notes, value_date, is_active, is_archived,
                archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING
                id, tenant_id, organization_id, employee_id, amount, currency,
                category, purpose, notes, value_date, is_active, is_archived,
                archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(expense.id)
        .bind(expense.tenant_id)
        .bind(expense.organization_id)
        .bind(expense.employee_id)
        .bind(expense.amount)
        .bind(&expense.currency)
        .bind(&expense.category)
        .bind(&expense.purpose)
        .bind(&expense.notes)
        .bind(expense.value_date)
        .bind(expense.is_active)
        .bind(expense.is_archived)
        .bind(expense.archived_at)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .bind(expense.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating expense: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, DomainError> {
        let row: ExpenseRow = sqlx::query_as(
            r#"
            UPDATE expenses
            SET
                employee_id = $3,
                amount = $4,
                currency = $5,
                category = $6,
                purpose = $7,
                notes = $8,
                value_date = $9,
                is_active = $10,
                is_archived = $11,
                archived_at = $12,
                updated_at = $13
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, employee_id, amount, currency,
                category, purpose, notes, value_date, is_active, is_archived,
                archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(expense.id)
        .bind(expense.tenant_id)
        .bind(expense.employee_id)
        .bind(expense.amount)
        .bind(&expense.currency)
        .bind(&expense.category)
        .bind(&expense.purpose)
        .bind(&expense.notes)
        .bind(expense.value_date)
        .bind(expense.is_active)
        .bind(expense.is_archived)
        .bind(expense.archived_at)
        .bind(expense.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating expense: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE expenses
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting expense: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: ExpenseFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Expense>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM expenses
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::uuid IS NULL OR employee_id = $3)
              AND ($4::varchar IS NULL OR category = $4)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(filter.employee_id)
        .bind(&filter.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting expenses: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, employee_id, amount, currency,
                category, purpose, notes, value_date, is_active, is_archived,
                archived_at, created_at, updated_at, deleted_at
            FROM expenses
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::uuid IS NULL OR employee_id = $3)
              AND ($4::varchar IS NULL OR category = $4)
            ORDER BY value_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(filter.employee_id)
        .bind(&filter.category)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing expenses: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }

    async fn stats(&self, tenant_id: &Uuid) -> Result<ExpenseStats, DomainError> {
        let row: (i64, f64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM expenses
            WHERE tenant_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error computing expense stats: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(ExpenseStats {
            count: row.0,
            total_sum: row.1,
        })
    }
}
