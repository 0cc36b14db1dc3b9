// ============================================================================
// WFM Infrastructure - PostgreSQL Organization Repository
// File: crates/wfm-infrastructure/src/database/postgres/organization_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use wfm_core::domain::Organization;
use wfm_core::error::DomainError;
use wfm_core::repositories::OrganizationRepository;
use wfm_shared::{Paginated, Pagination};

pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct OrganizationRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub currency: String,
    pub profile_link: String,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            currency: row.currency,
            profile_link: row.profile_link,
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
impl OrganizationRepository for PgOrganizationRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM organizations
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding organization by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_profile_link(
        &self,
        tenant_id: &Uuid,
        profile_link: &str,
    ) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM organizations
            WHERE profile_link = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(profile_link)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding organization by profile link: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, organization: &Organization) -> Result<Organization, DomainError> {
        info!("Creating organization: {}", organization.name);

        let row: OrganizationRow = sqlx::query_as(
            r#"
            INSERT INTO organizations (
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(organization.id)
        .bind(organization.tenant_id)
        .bind(&organization.name)
        .bind(&organization.currency)
        .bind(&organization.profile_link)
        .bind(organization.is_active)
        .bind(organization.is_archived)
        .bind(organization.archived_at)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .bind(organization.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating organization: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists(organization.profile_link.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, organization: &Organization) -> Result<Organization, DomainError> {
        let row: OrganizationRow = sqlx::query_as(
            r#"
            UPDATE organizations
            SET
                name = $3,
                currency = $4,
                profile_link = $5,
                is_active = $6,
                is_archived = $7,
                archived_at = $8,
                updated_at = $9
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(organization.id)
        .bind(organization.tenant_id)
        .bind(&organization.name)
        .bind(&organization.currency)
        .bind(&organization.profile_link)
        .bind(organization.is_active)
        .bind(organization.is_archived)
        .bind(organization.archived_at)
        .bind(organization.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating organization: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists(organization.profile_link.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE organizations
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting organization: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Paginated<Organization>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM organizations
            WHERE tenant_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting organizations: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, name, currency, profile_link,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM organizations
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tenant_id)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing organizations: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }
}
