// ============================================================================
// WFM Infrastructure - PostgreSQL Tag Repository
// File: crates/wfm-infrastructure/src/database/postgres/tag_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use wfm_core::domain::Tag;
use wfm_core::error::DomainError;
use wfm_core::repositories::{TagFilter, TagRepository};
use wfm_shared::{Paginated, Pagination};

pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TagRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            name: row.name,
            color: row.color,
            description: row.description,
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
impl TagRepository for PgTagRepository {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Tag>, DomainError> {
        let row: Option<TagRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, name, color, description,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM tags
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding tag by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, tag: &Tag) -> Result<Tag, DomainError> {
        let row: TagRow = sqlx::query_as(
            r#"
            INSERT INTO tags (
                id, tenant_id, organization_id, name, color, description,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, tenant_id, organization_id, name, color, description,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(tag.id)
        .bind(tag.tenant_id)
        .bind(tag.organization_id)
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.description)
        .bind(tag.is_active)
        .bind(tag.is_archived)
        .bind(tag.archived_at)
        .bind(tag.created_at)
        .bind(tag.updated_at)
        .bind(tag.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating tag: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists(format!("tag '{}'", tag.name))
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, tag: &Tag) -> Result<Tag, DomainError> {
        let row: TagRow = sqlx::query_as(
            r#"
            UPDATE tags
            SET
                name = $3,
                color = $4,
                description = $5,
                is_active = $6,
                is_archived = $7,
                archived_at = $8,
                updated_at = $9
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, name, color, description,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(tag.id)
        .bind(tag.tenant_id)
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.description)
        .bind(tag.is_active)
        .bind(tag.is_archived)
        .bind(tag.archived_at)
        .bind(tag.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating tag: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists(format!("tag '{}'", tag.name))
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE tags
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting tag: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: TagFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Tag>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tags
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting tags: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<TagRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, name, color, description,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM tags
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            ORDER BY name
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
            error!("Database error listing tags: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }
}
