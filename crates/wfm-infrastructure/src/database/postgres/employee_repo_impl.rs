// ============================================================================
// WFM Infrastructure - PostgreSQL Employee Repository
// File: crates/wfm-infrastructure/src/database/postgres/employee_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use wfm_core::domain::Employee;
use wfm_core::error::DomainError;
use wfm_core::repositories::{EmployeeFilter, EmployeeRepository};
use wfm_shared::{Paginated, Pagination};

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct EmployeeRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub started_work_on: Option<NaiveDate>,
    pub ended_work_on: Option<NaiveDate>,
    pub bill_rate_value: f64,
    pub bill_rate_currency: String,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            started_work_on: row.started_work_on,
            ended_work_on: row.ended_work_on,
            bill_rate_value: row.bill_rate_value,
            bill_rate_currency: row.bill_rate_currency,
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
impl EmployeeRepository for PgEmployeeRepository {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Employee>, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employees
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding employee by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_ids(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Employee>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employees
            WHERE tenant_id = $1 AND organization_id = $2 AND id = ANY($3)
              AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(organization_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error resolving employees by ids: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError> {
        info!("Creating employee: {}", employee.email);

        let row: EmployeeRow = sqlx::query_as(
            r#"
            INSERT INTO employees (
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(employee.id)
        .bind(employee.tenant_id)
        .bind(employee.organization_id)
        .bind(employee.user_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(employee.started_work_on)
        .bind(employee.ended_work_on)
        .bind(employee.bill_rate_value)
        .bind(&employee.bill_rate_currency)
        .bind(employee.is_active)
        .bind(employee.is_archived)
        .bind(employee.archived_at)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .bind(employee.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating employee: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(&self, employee: &Employee) -> Result<Employee, DomainError> {
        let row: EmployeeRow = sqlx::query_as(
            r#"
            UPDATE employees
            SET
                user_id = $3,
                first_name = $4,
                last_name = $5,
                email = $6,
                started_work_on = $7,
                ended_work_on = $8,
                bill_rate_value = $9,
                bill_rate_currency = $10,
                is_active = $11,
                is_archived = $12,
                archived_at = $13,
                updated_at = $14
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(employee.id)
        .bind(employee.tenant_id)
        .bind(employee.user_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(employee.started_work_on)
        .bind(employee.ended_work_on)
        .bind(employee.bill_rate_value)
        .bind(&employee.bill_rate_currency)
        .bind(employee.is_active)
        .bind(employee.is_archived)
        .bind(employee.archived_at)
        .bind(employee.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating employee: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        id: &Uuid,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE employees
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND organization_id = $3 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting employee: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn restore(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        id: &Uuid,
    ) -> Result<Employee, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            UPDATE employees
            SET deleted_at = NULL, is_active = true, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND organization_id = $3 AND deleted_at IS NOT NULL
            RETURNING
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error restoring employee: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(|r| r.into()).ok_or(DomainError::EmployeeNotFound)
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: EmployeeFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM employees
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting employees: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employees
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing employees: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }

    async fn find_working(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM employees
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND is_active = true AND is_archived = false
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND started_work_on IS NOT NULL AND started_work_on <= $4
              AND (ended_work_on IS NULL OR ended_work_on >= $3)
            "#,
        )
        .bind(tenant_id)
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting working employees: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, user_id, first_name, last_name, email,
                started_work_on, ended_work_on, bill_rate_value, bill_rate_currency,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employees
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND is_active = true AND is_archived = false
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND started_work_on IS NOT NULL AND started_work_on <= $4
              AND (ended_work_on IS NULL OR ended_work_on >= $3)
            ORDER BY started_work_on
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(tenant_id)
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing working employees: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }
}
