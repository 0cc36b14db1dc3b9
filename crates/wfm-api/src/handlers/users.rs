// ============================================================================
// WFM API - User Handlers
// File: crates/wfm-api/src/handlers/users.rs
// Description: Admin user management; responses never carry the hash
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use wfm_core::domain::{ActivityAction, ActivityLog, Role, User};
use wfm_core::repositories::UserRepository;
use wfm_shared::{Paginated, Pagination};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Public view of a user row.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub employee_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_string(),
            employee_id: user.employee_id,
            last_login_at: user.last_login_at,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn require_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    if !ctx.role.is_admin() {
        return Err(ApiError::Forbidden("Admin role required".to_string()));
    }
    Ok(())
}

/// `GET /api/v1/users` (admin)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<UserDto>>, ApiError> {
    require_admin(&ctx)?;
    let page = state.user_repo.list(&ctx.tenant_id, pagination).await?;
    Ok(Json(page.map(UserDto::from)))
}

/// `GET /api/v1/users/{id}` — admins, or the user themselves.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    if !ctx.role.is_admin() && ctx.user_id != id {
        return Err(ApiError::Forbidden("Admin role required".to_string()));
    }
    let user = state
        .user_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}

/// `PUT /api/v1/users/{id}` (admin)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    require_admin(&ctx)?;

    let mut user = state
        .user_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(first_name) = request.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = request.last_name {
        user.last_name = last_name.trim().to_string();
    }
    if let Some(raw) = request.role {
        user.role = Role::from_str(&raw)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", raw)))?;
    }
    if let Some(active) = request.is_active {
        // Admins cannot lock themselves out.
        if !active && user.id == ctx.user_id {
            return Err(ApiError::BadRequest(
                "Cannot deactivate your own account".to_string(),
            ));
        }
        user.is_active = active;
    }
    user.updated_at = Utc::now();

    let updated = state.user_repo.update(&user).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "user",
        updated.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "role": updated.role.as_str(), "is_active": updated.is_active }),
    ));

    Ok(Json(updated.into()))
}
