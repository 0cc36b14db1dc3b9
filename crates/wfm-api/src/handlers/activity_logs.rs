//! Audit trail read endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use wfm_core::domain::{ActivityAction, ActivityLog};
use wfm_core::repositories::{ActivityFilter, ActivityLogRepository};
use wfm_shared::{Paginated, Pagination};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ActivityListQuery {
    pub organization_id: Option<Uuid>,
    pub entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub action: Option<String>,
}

/// `GET /api/v1/activity-logs` pages through the tenant's audit trail,
/// newest first.
pub async fn list_activity_logs(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<ActivityListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<ActivityLog>>, ApiError> {
    let action = match filter.action.as_deref() {
        Some(raw) => Some(
            ActivityAction::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown action: {}", raw)))?,
        ),
        None => None,
    };

    let page = state
        .activity_repo
        .list(
            &ctx.tenant_id,
            ActivityFilter {
                organization_id: filter.organization_id,
                entity: filter.entity,
                entity_id: filter.entity_id,
                action,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}
