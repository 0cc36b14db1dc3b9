// ============================================================================
// WFM API - Notification Handlers
// File: crates/wfm-api/src/handlers/notifications.rs
// Description: Notification feed, read/snooze state, per-employee settings
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{EmployeeNotification, NotificationKind, NotificationSetting};
use wfm_core::repositories::NotificationFilter;
use wfm_core::services::{NotifyInput, UpdateSettingsInput};
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SendNotificationRequest {
    pub entity: String,
    pub entity_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Message too long"))]
    #[serde(default)]
    pub message: String,
    pub kind: NotificationKind,
    pub receiver_id: Uuid,
}

/// Delivery outcome. `notification` is absent when the receiver opted out of
/// the kind.
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub delivered: bool,
    pub notification: Option<EmployeeNotification>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NotificationListQuery {
    pub receiver_id: Option<Uuid>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SnoozeRequest {
    pub until: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSettingsRequest {
    pub payment: Option<bool>,
    pub assignment: Option<bool>,
    pub invitation: Option<bool>,
    pub mention: Option<bool>,
    pub comment: Option<bool>,
    pub message: Option<bool>,
    pub preferences: Option<serde_json::Value>,
}

/// Callers without an employee link cannot own notifications.
fn employee_of(ctx: &AuthContext) -> Result<Uuid, ApiError> {
    ctx.employee_id
        .ok_or_else(|| ApiError::Forbidden("Caller is not linked to an employee".to_string()))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<NotificationListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<EmployeeNotification>>, ApiError> {
    // Without an explicit receiver filter, employees see their own feed.
    let receiver_id = filter.receiver_id.or(ctx.employee_id);
    let page = state
        .notification_service
        .list(
            &ctx.tenant_id,
            NotificationFilter {
                receiver_id,
                unread_only: filter.unread_only,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}

/// `POST /api/v1/notifications` delivers a notification, honoring the
/// receiver's settings.
pub async fn send_notification(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<NotifyResponse>), ApiError> {
    request.validate().map_err(validation_error)?;

    let notification = state
        .notification_service
        .notify(
            &ctx.tenant_id,
            NotifyInput {
                entity: request.entity,
                entity_id: request.entity_id,
                title: request.title,
                message: request.message,
                kind: request.kind,
                sent_by_id: ctx.employee_id,
                receiver_id: request.receiver_id,
            },
        )
        .await?;

    let status = if notification.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(NotifyResponse {
            delivered: notification.is_some(),
            notification,
        }),
    ))
}

/// `POST /api/v1/notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeNotification>, ApiError> {
    let employee_id = employee_of(&ctx)?;
    let notification = state
        .notification_service
        .mark_read(&ctx.tenant_id, &employee_id, &id)
        .await?;
    Ok(Json(notification))
}

/// `POST /api/v1/notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ReadAllResponse>, ApiError> {
    let employee_id = employee_of(&ctx)?;
    let updated = state
        .notification_service
        .mark_all_read(&ctx.tenant_id, &employee_id)
        .await?;
    Ok(Json(ReadAllResponse { updated }))
}

/// `POST /api/v1/notifications/{id}/snooze`
pub async fn snooze_notification(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<SnoozeRequest>,
) -> Result<Json<EmployeeNotification>, ApiError> {
    let employee_id = employee_of(&ctx)?;
    let notification = state
        .notification_service
        .snooze(&ctx.tenant_id, &employee_id, &id, request.until)
        .await?;
    Ok(Json(notification))
}

/// `GET /api/v1/notification-settings` returns the caller's settings row,
/// created with everything enabled on first access.
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<NotificationSetting>, ApiError> {
    let employee_id = employee_of(&ctx)?;
    let settings = state
        .notification_service
        .settings(&ctx.tenant_id, &employee_id)
        .await?;
    Ok(Json(settings))
}

/// `PUT /api/v1/notification-settings`
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<NotificationSetting>, ApiError> {
    let employee_id = employee_of(&ctx)?;
    let settings = state
        .notification_service
        .update_settings(
            &ctx.tenant_id,
            &employee_id,
            UpdateSettingsInput {
                payment: request.payment,
                assignment: request.assignment,
                invitation: request.invitation,
                mention: request.mention,
                comment: request.comment,
                message: request.message,
                preferences: request.preferences,
            },
        )
        .await?;
    Ok(Json(settings))
}
