// ============================================================================
// WFM API - Employee Handlers
// File: crates/wfm-api/src/handlers/employees.rs
// Description: Employee CRUD, restore, and the working-range listing
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, Employee};
use wfm_core::repositories::EmployeeFilter;
use wfm_core::services::{CreateEmployeeInput, UpdateEmployeeInput};
use wfm_shared::constants::DEFAULT_CURRENCY;
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    pub organization_id: Uuid,
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name too long"))]
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub started_work_on: Option<NaiveDate>,
    #[serde(default)]
    pub bill_rate_value: f64,
    pub bill_rate_currency: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub started_work_on: Option<NaiveDate>,
    pub ended_work_on: Option<NaiveDate>,
    pub bill_rate_value: Option<f64>,
    pub bill_rate_currency: Option<String>,
    pub is_active: Option<bool>,
}

/// Deleted employees are invisible to scoped lookups, so restore names the
/// organization explicitly.
#[derive(Debug, Deserialize)]
pub struct RestoreEmployeeRequest {
    pub organization_id: Uuid,
}

#[derive(Debug, Deserialize, Default)]
pub struct EmployeeListQuery {
    pub organization_id: Option<Uuid>,
}

/// Date range for the working-set listing.
#[derive(Debug, Deserialize)]
pub struct WorkingQuery {
    pub organization_id: Option<Uuid>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<EmployeeListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Employee>>, ApiError> {
    let page = state
        .employee_service
        .list(
            &ctx.tenant_id,
            EmployeeFilter {
                organization_id: filter.organization_id,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/v1/employees/working?from=&to=` lists employees active at any
/// point of the range.
pub async fn working_employees(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<WorkingQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Employee>>, ApiError> {
    let page = state
        .employee_service
        .working(
            &ctx.tenant_id,
            query.organization_id,
            query.from,
            query.to,
            pagination,
        )
        .await?;
    Ok(Json(page))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    request.validate().map_err(validation_error)?;

    let organization_id = request.organization_id;
    let created = state
        .employee_service
        .create(
            &ctx.tenant_id,
            CreateEmployeeInput {
                organization_id,
                user_id: request.user_id,
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                started_work_on: request.started_work_on,
                bill_rate_value: request.bill_rate_value,
                bill_rate_currency: request
                    .bill_rate_currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(organization_id),
        "employee",
        created.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        Some(format!("Employee {} added", created.full_name())),
        json!({ "email": created.email }),
    ));

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state.employee_service.get(&ctx.tenant_id, &id).await?;
    Ok(Json(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    let updated = state
        .employee_service
        .update(
            &ctx.tenant_id,
            &id,
            UpdateEmployeeInput {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                started_work_on: request.started_work_on,
                ended_work_on: request.ended_work_on,
                bill_rate_value: request.bill_rate_value,
                bill_rate_currency: request.bill_rate_currency,
                is_active: request.is_active,
            },
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(updated.organization_id),
        "employee",
        updated.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "email": updated.email }),
    ));

    Ok(Json(updated))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.employee_service.delete(&ctx.tenant_id, &id).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "employee",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/employees/{id}/restore`
pub async fn restore_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<RestoreEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    let restored = state
        .employee_service
        .restore(&ctx.tenant_id, &request.organization_id, &id)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(restored.organization_id),
        "employee",
        restored.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some("Employee restored".to_string()),
        json!({}),
    ));

    Ok(Json(restored))
}
