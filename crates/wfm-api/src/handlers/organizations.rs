// ============================================================================
// WFM API - Organization Handlers
// File: crates/wfm-api/src/handlers/organizations.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, Organization};
use wfm_core::repositories::OrganizationRepository;
use wfm_shared::utils::slugify;
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 200, message = "Organization name must be between 2 and 200 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,
    /// Defaults to a slug of the name.
    pub profile_link: Option<String>,
}

/// Partial update; omitted fields stay as they are.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub profile_link: Option<String>,
}

pub async fn list_organizations(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Organization>>, ApiError> {
    let page = state
        .organization_repo
        .list(&ctx.tenant_id, pagination)
        .await?;
    Ok(Json(page))
}

pub async fn create_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    request.validate().map_err(validation_error)?;

    let profile_link = request
        .profile_link
        .unwrap_or_else(|| slugify(&request.name));
    let organization = Organization::new(ctx.tenant_id, request.name, request.currency, profile_link)
        .map_err(validation_error)?;
    let created = state.organization_repo.create(&organization).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(created.id),
        "organization",
        created.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        Some(format!("Organization {} created", created.name)),
        json!({ "name": created.name, "currency": created.currency }),
    ));

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Organization>, ApiError> {
    let organization = state
        .organization_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;
    Ok(Json(organization))
}

pub async fn update_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, ApiError> {
    let mut organization = state
        .organization_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    if let Some(name) = request.name {
        organization.name = name.trim().to_string();
    }
    if let Some(currency) = request.currency {
        organization.currency = currency.trim().to_uppercase();
    }
    if let Some(profile_link) = request.profile_link {
        organization.profile_link = slugify(&profile_link);
    }
    organization.validate().map_err(validation_error)?;
    organization.updated_at = Utc::now();

    let updated = state.organization_repo.update(&organization).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(updated.id),
        "organization",
        updated.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "name": updated.name }),
    ));

    Ok(Json(updated))
}

pub async fn delete_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .organization_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;
    state.organization_repo.soft_delete(&ctx.tenant_id, &id).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(id),
        "organization",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}
