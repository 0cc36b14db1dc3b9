// ============================================================================
// WFM API - Team Handlers
// File: crates/wfm-api/src/handlers/teams.rs
// Description: Team CRUD and membership reconciliation
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, OrganizationTeam, TeamMember};
use wfm_core::services::UpdateTeamInput;
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    pub organization_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Team name must be between 1 and 200 characters"))]
    pub name: String,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub prefix: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub manager_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub prefix: Option<String>,
}

/// Desired membership; the server diffs this against current rows.
#[derive(Debug, Deserialize)]
pub struct UpdateMembersRequest {
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub manager_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team: OrganizationTeam,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TeamListQuery {
    pub organization_id: Option<Uuid>,
}

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<TeamListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<OrganizationTeam>>, ApiError> {
    let page = state
        .team_service
        .list_teams(&ctx.tenant_id, filter.organization_id, pagination)
        .await?;
    Ok(Json(page))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    request.validate().map_err(validation_error)?;

    let (team, members) = state
        .team_service
        .create_team(
            &ctx.tenant_id,
            &request.organization_id,
            request.name,
            request.color,
            request.emoji,
            request.prefix,
            &request.member_ids,
            &request.manager_ids,
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(team.organization_id),
        "team",
        team.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        Some(format!("Team {} created", team.name)),
        json!({ "name": team.name, "members": members.len() }),
    ));

    Ok((StatusCode::CREATED, Json(TeamResponse { team, members })))
}

pub async fn get_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let (team, members) = state.team_service.get_team(&ctx.tenant_id, &id).await?;
    Ok(Json(TeamResponse { team, members }))
}

pub async fn update_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTeamRequest>,
) -> Result<Json<OrganizationTeam>, ApiError> {
    let team = state
        .team_service
        .update_team(
            &ctx.tenant_id,
            &id,
            UpdateTeamInput {
                name: request.name,
                color: request.color,
                emoji: request.emoji,
                prefix: request.prefix,
            },
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(team.organization_id),
        "team",
        team.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "name": team.name }),
    ));

    Ok(Json(team))
}

/// `PUT /api/v1/teams/{id}/members` reconciles membership against the
/// desired member and manager sets.
pub async fn update_team_members(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMembersRequest>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let members = state
        .team_service
        .update_members(&ctx.tenant_id, &id, &request.member_ids, &request.manager_ids)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "team",
        id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some("Team membership updated".to_string()),
        json!({ "members": members.len() }),
    ));

    Ok(Json(members))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.team_service.delete_team(&ctx.tenant_id, &id).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "team",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}
