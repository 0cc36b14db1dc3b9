// ============================================================================
// WFM Infrastructure - PostgreSQL Notification Repository
// File: crates/wfm-infrastructure/src/database/postgres/notification_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use wfm_core::domain::{EmployeeNotification, NotificationKind, NotificationSetting};
use wfm_core::error::DomainError;
use wfm_core::repositories::{NotificationFilter, NotificationRepository};
use wfm_shared::{Paginated, Pagination};

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct NotificationRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub entity: String,
    pub entity_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub on_hold_until: Option<DateTime<Utc>>,
    pub sent_by_id: Option<Uuid>,
    pub receiver_id: Uuid,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<NotificationRow> for EmployeeNotification {
    fn from(row: NotificationRow) -> Self {
        EmployeeNotification {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            entity: row.entity,
            entity_id: row.entity_id,
            title: row.title,
            message: row.message,
            kind: NotificationKind::from_str(&row.kind).unwrap_or(NotificationKind::Message),
            is_read: row.is_read,
            read_at: row.read_at,
            on_hold_until: row.on_hold_until,
            sent_by_id: row.sent_by_id,
            receiver_id: row.receiver_id,
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
struct SettingRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    pub payment: bool,
    pub assignment: bool,
    pub invitation: bool,
    pub mention: bool,
    pub comment: bool,
    pub message: bool,
    pub preferences: serde_json::Value,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<SettingRow> for NotificationSetting {
    fn from(row: SettingRow) -> Self {
        NotificationSetting {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            employee_id: row.employee_id,
            payment: row.payment,
            assignment: row.assignment,
            invitation: row.invitation,
            mention: row.mention,
            comment: row.comment,
            message: row.message,
            preferences: row.preferences,
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
impl NotificationRepository for PgNotificationRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<Option<EmployeeNotification>, DomainError> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, entity, entity_id, title, message,
                kind, is_read, read_at, on_hold_until, sent_by_id, receiver_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employee_notifications
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding notification by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(
        &self,
        notification: &EmployeeNotification,
    ) -> Result<EmployeeNotification, DomainError> {
        let row: NotificationRow = sqlx::query_as(
            r#"
            INSERT INTO employee_notifications (
                id, tenant_id, organization_id, entity, entity_id, title, message,
                kind, is_read, read_at, on_hold_until, sent_by_id, receiver_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING
                id, tenant_id, organization_id, entity, entity_id, title, message,
                kind, is_read, read_at, on_hold_until, sent_by_id, receiver_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.tenant_id)
        .bind(notification.organization_id)
        .bind(&notification.entity)
        .bind(notification.entity_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.is_read)
        .bind(notification.read_at)
        .bind(notification.on_hold_until)
        .bind(notification.sent_by_id)
        .bind(notification.receiver_id)
        .bind(notification.is_active)
        .bind(notification.is_archived)
        .bind(notification.archived_at)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .bind(notification.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating notification: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(
        &self,
        notification: &EmployeeNotification,
    ) -> Result<EmployeeNotification, DomainError> {
        let row: NotificationRow = sqlx::query_as(
            r#"
            UPDATE employee_notifications
            SET
                title = $3,
                message = $4,
                is_read = $5,
                read_at = $6,
                on_hold_until = $7,
                is_active = $8,
                is_archived = $9,
                archived_at = $10,
                updated_at = $11
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, entity, entity_id, title, message,
                kind, is_read, read_at, on_hold_until, sent_by_id, receiver_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.tenant_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.read_at)
        .bind(notification.on_hold_until)
        .bind(notification.is_active)
        .bind(notification.is_archived)
        .bind(notification.archived_at)
        .bind(notification.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating notification: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn mark_all_read(&self, tenant_id: &Uuid, receiver_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE employee_notifications
            SET is_read = true, read_at = NOW(), updated_at = NOW()
            WHERE tenant_id = $1 AND receiver_id = $2 AND is_read = false AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error marking notifications read: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: NotificationFilter,
        pagination: Pagination,
    ) -> Result<Paginated<EmployeeNotification>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM employee_notifications
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR receiver_id = $2)
              AND ($3::boolean = false OR is_read = false)
            "#,
        )
        .bind(tenant_id)
        .bind(filter.receiver_id)
        .bind(filter.unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting notifications: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, entity, entity_id, title, message,
                kind, is_read, read_at, on_hold_until, sent_by_id, receiver_id,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employee_notifications
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR receiver_id = $2)
              AND ($3::boolean = false OR is_read = false)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(tenant_id)
        .bind(filter.receiver_id)
        .bind(filter.unread_only)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing notifications: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }

    async fn settings_for_employee(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
    ) -> Result<Option<NotificationSetting>, DomainError> {
        let row: Option<SettingRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, employee_id, payment, assignment,
                invitation, mention, comment, message, preferences, is_active,
                is_archived, archived_at, created_at, updated_at, deleted_at
            FROM employee_notification_settings
            WHERE employee_id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(employee_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding notification settings: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_settings(
        &self,
        settings: &NotificationSetting,
    ) -> Result<NotificationSetting, DomainError> {
        let row: SettingRow = sqlx::query_as(
            r#"
            INSERT INTO employee_notification_settings (
                id, tenant_id, organization_id, employee_id, payment, assignment,
                invitation, mention, comment, message, preferences, is_active,
                is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING
                id, tenant_id, organization_id, employee_id, payment, assignment,
                invitation, mention, comment, message, preferences, is_active,
                is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(settings.id)
        .bind(settings.tenant_id)
        .bind(settings.organization_id)
        .bind(settings.employee_id)
        .bind(settings.payment)
        .bind(settings.assignment)
        .bind(settings.invitation)
        .bind(settings.mention)
        .bind(settings.comment)
        .bind(settings.message)
        .bind(&settings.preferences)
        .bind(settings.is_active)
        .bind(settings.is_archived)
        .bind(settings.archived_at)
        .bind(settings.created_at)
        .bind(settings.updated_at)
        .bind(settings.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating notification settings: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists("notification settings".to_string())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn update_settings(
        &self,
        settings: &NotificationSetting,
    ) -> Result<NotificationSetting, DomainError> {
        let row: SettingRow = sqlx::query_as(
            r#"
            UPDATE employee_notification_settings
            SET
                payment = $3,
                assignment = $4,
                invitation = $5,
                mention = $6,
                comment = $7,
                message = $8,
                preferences = $9,
                is_active = $10,
                is_archived = $11,
                archived_at = $12,
                updated_at = $13
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, employee_id, payment, assignment,
                invitation, mention, comment, message, preferences, is_active,
                is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(settings.id)
        .bind(settings.tenant_id)
        .bind(settings.payment)
        .bind(settings.assignment)
        .bind(settings.invitation)
        .bind(settings.mention)
        .bind(settings.comment)
        .bind(settings.message)
        .bind(&settings.preferences)
        .bind(settings.is_active)
        .bind(settings.is_archived)
        .bind(settings.archived_at)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating notification settings: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }
}
