//! Current-tenant handlers

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, Tenant};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 2, max = 200, message = "Tenant name must be between 2 and 200 characters"))]
    pub name: String,
}

/// `GET /api/v1/tenant` returns the caller's tenant.
pub async fn get_tenant(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state.tenant_service.get_tenant(&ctx.tenant_id).await?;
    Ok(Json(tenant))
}

/// `PATCH /api/v1/tenant` renames the caller's tenant.
pub async fn update_tenant(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<UpdateTenantRequest>,
) -> Result<Json<Tenant>, ApiError> {
    request.validate().map_err(validation_error)?;
    if !ctx.role.is_admin() {
        return Err(ApiError::Forbidden("Only admins may rename the tenant".to_string()));
    }

    let tenant = state
        .tenant_service
        .rename_tenant(&ctx.tenant_id, &request.name)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "tenant",
        tenant.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some(format!("Tenant renamed to {}", tenant.name)),
        json!({ "name": tenant.name }),
    ));

    Ok(Json(tenant))
}
