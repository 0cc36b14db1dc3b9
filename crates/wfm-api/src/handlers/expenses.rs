// ============================================================================
// WFM API - Expense Handlers
// File: crates/wfm-api/src/handlers/expenses.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{ActivityAction, ActivityLog, Expense};
use wfm_core::repositories::{ExpenseFilter, ExpenseRepository, ExpenseStats};
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    pub organization_id: Uuid,
    pub employee_id: Option<Uuid>,
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,
    pub purpose: Option<String>,
    pub value_date: NaiveDate,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub value_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExpenseListQuery {
    pub organization_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub category: Option<String>,
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<ExpenseListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Expense>>, ApiError> {
    let page = state
        .expense_repo
        .list(
            &ctx.tenant_id,
            ExpenseFilter {
                organization_id: filter.organization_id,
                employee_id: filter.employee_id,
                category: filter.category,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/v1/expenses/stats` aggregates non-deleted expenses.
pub async fn expense_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ExpenseStats>, ApiError> {
    let stats = state.expense_repo.stats(&ctx.tenant_id).await?;
    Ok(Json(stats))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    request.validate().map_err(validation_error)?;

    let expense = Expense::new(
        ctx.tenant_id,
        request.organization_id,
        request.employee_id,
        request.amount,
        request.currency,
        request.category,
        request.purpose,
        request.value_date,
    )
    .map_err(validation_error)?;
    let created = state.expense_repo.create(&expense).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(created.organization_id),
        "expense",
        created.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        Some(format!("Expense {} {} recorded", created.amount, created.currency)),
        json!({ "amount": created.amount, "category": created.category }),
    ));

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Expense>, ApiError> {
    let expense = state
        .expense_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;
    Ok(Json(expense))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    let mut expense = state
        .expense_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    if let Some(amount) = request.amount {
        expense.amount = amount;
    }
    if let Some(currency) = request.currency {
        expense.currency = currency.trim().to_uppercase();
    }
    if let Some(category) = request.category {
        expense.category = category.trim().to_string();
    }
    if let Some(purpose) = request.purpose {
        expense.purpose = Some(purpose);
    }
    if let Some(notes) = request.notes {
        expense.notes = Some(notes);
    }
    if let Some(value_date) = request.value_date {
        expense.value_date = value_date;
    }
    expense.validate().map_err(validation_error)?;
    expense.updated_at = Utc::now();

    let updated = state.expense_repo.update(&expense).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(updated.organization_id),
        "expense",
        updated.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "amount": updated.amount }),
    ));

    Ok(Json(updated))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .expense_repo
        .find_by_id(&ctx.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;
    state.expense_repo.soft_delete(&ctx.tenant_id, &id).await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "expense",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}
