// ============================================================================
// WFM Infrastructure - PostgreSQL Activity Log Repository
// File: crates/wfm-infrastructure/src/database/postgres/activity_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use wfm_core::domain::{ActivityAction, ActivityLog};
use wfm_core::error::DomainError;
use wfm_core::repositories::{ActivityFilter, ActivityLogRepository};
use wfm_shared::{Paginated, Pagination};

/// Read side of the audit trail. Writes go through the activity logger queue.
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ActivityRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub entity: String,
    pub entity_id: Uuid,
    pub action: String,
    pub actor_id: Option<Uuid>,
    pub description: Option<String>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityLog {
    fn from(row: ActivityRow) -> Self {
        ActivityLog {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            entity: row.entity,
            entity_id: row.entity_id,
            action: ActivityAction::from_str(&row.action).unwrap_or(ActivityAction::Updated),
            actor_id: row.actor_id,
            description: row.description,
            data: row.data,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: ActivityFilter,
        pagination: Pagination,
    ) -> Result<Paginated<ActivityLog>, DomainError> {
        let action = filter.action.map(|a| a.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM activity_logs
            WHERE tenant_id = $1
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::varchar IS NULL OR entity = $3)
              AND ($4::uuid IS NULL OR entity_id = $4)
              AND ($5::varchar IS NULL OR action = $5)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(&filter.entity)
        .bind(filter.entity_id)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting activity logs: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, entity, entity_id, action,
                actor_id, description, data, created_at
            FROM activity_logs
            WHERE tenant_id = $1
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::varchar IS NULL OR entity = $3)
              AND ($4::uuid IS NULL OR entity_id = $4)
              AND ($5::varchar IS NULL OR action = $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(tenant_id)
        .bind(filter.organization_id)
        .bind(&filter.entity)
        .bind(filter.entity_id)
        .bind(action)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing activity logs: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }
}
