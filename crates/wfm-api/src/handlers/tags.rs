//! Tag handlers

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

use wfm_core::domain::{ActivityAction, ActivityLog, Tag};
use wfm_core::repositories::{TagFilter, TagRepository};
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    pub organization_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Tag name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 20, message = "Color too long"))]
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TagListQuery {
    pub organization_id: Option<Uuid>,
}

pub async fn list_tags(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<TagListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Tag>>, ApiError> {
    let page = state
        .tag_repo
        .list(
            &ctx.tenant_id,
            TagFilter {
                organization_id: filter.organization_id,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}

pub async fn create_tag(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    request.validate().map_err(validation_error)?;

    let tag = Tag::new(
        ctx.tenant_id,
        request.organization_id,
        request.name,
        request.color,
        request.description,
    )
    .map_err(validation_error)?;
    let created = state.tag_repo.create(&tag).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(created.organization_id),
        "tag",
        created.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        None,
        json!({ "name": created.name }),
    ));

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state
        .tag_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;
    Ok(Json(tag))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, ApiError> {
    let mut tag = state
        .tag_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    if let Some(name) = request.name {
        tag.name = name.trim().to_string();
    }
    if let Some(color) = request.color {
        tag.color = color;
    }
    if let Some(description) = request.description {
        tag.description = Some(description);
    }
    tag.validate().map_err(validation_error)?;
    tag.updated_at = Utc::now();

    let updated = state.tag_repo.update(&tag).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(updated.organization_id),
        "tag",
        updated.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "name": updated.name }),
    ));

    Ok(Json(updated))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .tag_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;
    state.tag_repo.soft_delete(&ctx.tenant_id, &id).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "tag",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}
