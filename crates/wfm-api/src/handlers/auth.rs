// ============================================================================
// WFM API - Auth Handlers
// File: crates/wfm-api/src/handlers/auth.rs
// Description: Tenant registration, login, token refresh, current user
// ============================================================================

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, Organization, Tenant};
use wfm_core::services::UserInfo;
use wfm_shared::utils::mask_email;

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 200, message = "Tenant name must be between 2 and 200 characters"))]
    pub tenant_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name too long"))]
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub employee_id: Option<Uuid>,
}

impl From<UserInfo> for AuthUser {
    fn from(info: UserInfo) -> Self {
        Self {
            id: info.id,
            tenant_id: info.tenant_id,
            email: info.email,
            first_name: info.first_name,
            last_name: info.last_name,
            role: info.role,
            employee_id: info.employee_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub tenant: Tenant,
    pub organization: Organization,
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /api/v1/auth/register` creates tenant + default organization +
/// admin user and signs the caller in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    request.validate().map_err(validation_error)?;
    info!("Registration request for {}", mask_email(&request.email));

    let result = state
        .tenant_service
        .register(
            &request.tenant_name,
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
        )
        .await?;

    state.activity.log(ActivityLog::new(
        result.tenant.id,
        Some(result.organization.id),
        "tenant",
        result.tenant.id,
        ActivityAction::Created,
        Some(result.user.id),
        Some(format!("Tenant {} registered", result.tenant.name)),
        json!({ "name": result.tenant.name }),
    ));

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            tenant: result.tenant,
            organization: result.organization,
            user: result.user.into(),
            access_token: result.access_token,
            refresh_token: result.refresh_token,
        }),
    ))
}

/// `POST /api/v1/auth/login`, rate limited per email.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if !state.login_limiter.check(&request.email) {
        return Err(ApiError::RateLimited(
            "Too many login attempts, try again later".to_string(),
        ));
    }

    let result = state.auth_service.login(&request.email, &request.password).await?;
    Ok(Json(TokenResponse {
        user: result.user.into(),
        access_token: result.access_token,
        refresh_token: result.refresh_token,
    }))
}

/// `POST /api/v1/auth/refresh` rotates the token pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(Json(TokenResponse {
        user: result.user.into(),
        access_token: result.access_token,
        refresh_token: result.refresh_token,
    }))
}

/// `GET /api/v1/auth/me`
pub async fn me(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<AuthUser>, ApiError> {
    let info = state.auth_service.me(&ctx.tenant_id, &ctx.user_id).await?;
    Ok(Json(info.into()))
}
