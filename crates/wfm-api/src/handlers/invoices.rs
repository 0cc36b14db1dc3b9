// ============================================================================
// WFM API - Invoice Handlers
// File: crates/wfm-api/src/handlers/invoices.rs
// Description: Invoice/estimate CRUD, payments, send, public links, stats
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use wfm_core::domain::{
    ActivityAction, ActivityLog, Invoice, InvoiceItem, InvoiceStatus, TaxDiscountType,
};
use wfm_core::repositories::{InvoiceFilter, InvoiceStats};
use wfm_core::services::{
    CreateInvoiceInput, InvoiceItemInput, TaxDiscountPolicy, UpdateInvoiceInput,
};
use wfm_shared::{Paginated, Pagination};

use crate::error::{validation_error, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct TaxDiscountPolicyDto {
    #[serde(default)]
    pub tax: f64,
    pub tax_type: Option<TaxDiscountType>,
    #[serde(default)]
    pub tax2: f64,
    pub tax2_type: Option<TaxDiscountType>,
    #[serde(default)]
    pub discount_value: f64,
    pub discount_type: Option<TaxDiscountType>,
    #[serde(default)]
    pub discount_after_tax: bool,
}

impl From<TaxDiscountPolicyDto> for TaxDiscountPolicy {
    fn from(dto: TaxDiscountPolicyDto) -> Self {
        Self {
            tax: dto.tax,
            tax_type: dto.tax_type,
            tax2: dto.tax2,
            tax2_type: dto.tax2_type,
            discount_value: dto.discount_value,
            discount_type: dto.discount_type,
            discount_after_tax: dto.discount_after_tax,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InvoiceItemDto {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub apply_tax: bool,
    #[serde(default)]
    pub apply_discount: bool,
    pub employee_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
}

impl From<InvoiceItemDto> for InvoiceItemInput {
    fn from(dto: InvoiceItemDto) -> Self {
        Self {
            description: dto.description,
            quantity: dto.quantity,
            price: dto.price,
            apply_tax: dto.apply_tax,
            apply_discount: dto.apply_discount,
            employee_id: dto.employee_id,
            expense_id: dto.expense_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub organization_id: Uuid,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,
    pub terms: Option<String>,
    #[serde(default)]
    pub policy: TaxDiscountPolicyDto,
    #[serde(default)]
    pub is_estimate: bool,
    #[serde(default)]
    pub already_paid: f64,
    pub items: Vec<InvoiceItemDto>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateInvoiceRequest {
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub terms: Option<String>,
    pub policy: Option<TaxDiscountPolicyDto>,
    pub items: Option<Vec<InvoiceItemDto>>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendInvoiceRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PublicLinkQuery {
    pub token: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct InvoiceListQuery {
    pub organization_id: Option<Uuid>,
    pub status: Option<String>,
    pub is_estimate: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// What a public link reveals. No token, tenant, or creator internals.
#[derive(Debug, Serialize)]
pub struct PublicInvoiceResponse {
    pub invoice_number: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub terms: Option<String>,
    pub total_value: f64,
    pub already_paid: f64,
    pub amount_due: f64,
    pub status: InvoiceStatus,
    pub is_estimate: bool,
    pub items: Vec<PublicInvoiceItem>,
}

#[derive(Debug, Serialize)]
pub struct PublicInvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total_value: f64,
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<InvoiceListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Invoice>>, ApiError> {
    let status = match filter.status.as_deref() {
        Some(raw) => Some(
            InvoiceStatus::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown invoice status: {}", raw)))?,
        ),
        None => None,
    };

    let page = state
        .invoice_service
        .list(
            &ctx.tenant_id,
            InvoiceFilter {
                organization_id: filter.organization_id,
                status,
                is_estimate: filter.is_estimate,
            },
            pagination,
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/v1/invoices/stats` aggregates non-deleted invoices.
pub async fn invoice_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<InvoiceStats>, ApiError> {
    let stats = state.invoice_service.stats(&ctx.tenant_id).await?;
    Ok(Json(stats))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    request.validate().map_err(validation_error)?;

    let (invoice, items) = state
        .invoice_service
        .create(
            &ctx.tenant_id,
            &ctx.actor(),
            CreateInvoiceInput {
                organization_id: request.organization_id,
                invoice_date: request.invoice_date,
                due_date: request.due_date,
                currency: request.currency,
                terms: request.terms,
                policy: request.policy.into(),
                is_estimate: request.is_estimate,
                already_paid: request.already_paid,
                items: request.items.into_iter().map(Into::into).collect(),
            },
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Created,
        Some(ctx.user_id),
        Some(format!(
            "{} #{} created",
            if invoice.is_estimate { "Estimate" } else { "Invoice" },
            invoice.invoice_number
        )),
        json!({ "invoice_number": invoice.invoice_number, "total": invoice.total_value }),
    ));

    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice, items })))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let (invoice, items) = state.invoice_service.get(&ctx.tenant_id, &id).await?;
    Ok(Json(InvoiceResponse { invoice, items }))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let (invoice, items) = state
        .invoice_service
        .update(
            &ctx.tenant_id,
            &ctx.actor(),
            &id,
            UpdateInvoiceInput {
                invoice_date: request.invoice_date,
                due_date: request.due_date,
                currency: request.currency,
                terms: request.terms,
                policy: request.policy.map(Into::into),
                items: request
                    .items
                    .map(|items| items.into_iter().map(Into::into).collect()),
            },
        )
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        None,
        json!({ "invoice_number": invoice.invoice_number, "total": invoice.total_value }),
    ));

    Ok(Json(InvoiceResponse { invoice, items }))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .invoice_service
        .delete(&ctx.tenant_id, &ctx.actor(), &id)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        None,
        "invoice",
        id,
        ActivityAction::Deleted,
        Some(ctx.user_id),
        None,
        json!({}),
    ));

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/invoices/{id}/payments` records a payment and re-derives
/// the payment status.
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = state
        .invoice_service
        .record_payment(&ctx.tenant_id, &ctx.actor(), &id, request.amount)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some(format!("Payment of {} recorded", request.amount)),
        json!({ "amount": request.amount, "status": invoice.status.as_str() }),
    ));

    Ok(Json(invoice))
}

/// `POST /api/v1/invoices/{id}/send` marks the invoice sent and emails a
/// summary. The mail leg is best effort.
pub async fn send_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    request.validate().map_err(validation_error)?;

    let invoice = state
        .invoice_service
        .send(&ctx.tenant_id, &ctx.actor(), &id, &request.email)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some(format!("Invoice #{} sent", invoice.invoice_number)),
        json!({ "invoice_number": invoice.invoice_number }),
    ));

    Ok(Json(invoice))
}

/// `POST /api/v1/invoices/{id}/link` generates (or rotates) the public link
/// token. The response carries the token on the invoice row.
pub async fn generate_link(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = state
        .invoice_service
        .generate_link(&ctx.tenant_id, &ctx.actor(), &id)
        .await?;
    Ok(Json(invoice))
}

/// `GET /api/v1/public/invoices/{id}?token=` resolves a tokenized public
/// link without authentication.
pub async fn public_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PublicLinkQuery>,
) -> Result<Json<PublicInvoiceResponse>, ApiError> {
    let (invoice, items) = state.invoice_service.public_invoice(&id, &query.token).await?;

    Ok(Json(PublicInvoiceResponse {
        invoice_number: invoice.invoice_number,
        invoice_date: invoice.invoice_date,
        due_date: invoice.due_date,
        currency: invoice.currency,
        terms: invoice.terms,
        total_value: invoice.total_value,
        already_paid: invoice.already_paid,
        amount_due: invoice.amount_due,
        status: invoice.status,
        is_estimate: invoice.is_estimate,
        items: items
            .into_iter()
            .map(|item| PublicInvoiceItem {
                description: item.description,
                quantity: item.quantity,
                price: item.price,
                total_value: item.total_value,
            })
            .collect(),
    }))
}

/// `POST /api/v1/invoices/{id}/accept`
pub async fn accept_estimate(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    set_estimate_status(state, ctx, id, true).await
}

/// `POST /api/v1/invoices/{id}/reject`
pub async fn reject_estimate(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    set_estimate_status(state, ctx, id, false).await
}

async fn set_estimate_status(
    state: AppState,
    ctx: AuthContext,
    id: Uuid,
    accepted: bool,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = state
        .invoice_service
        .set_estimate_status(&ctx.tenant_id, &ctx.actor(), &id, accepted)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some(format!(
            "Estimate #{} {}",
            invoice.invoice_number,
            if accepted { "accepted" } else { "rejected" }
        )),
        json!({ "status": invoice.status.as_str() }),
    ));

    Ok(Json(invoice))
}

/// `POST /api/v1/invoices/{id}/void`
pub async fn void_invoice(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = state
        .invoice_service
        .void(&ctx.tenant_id, &ctx.actor(), &id)
        .await?;

    state.activity.log(ActivityLog::new(
        ctx.tenant_id,
        Some(invoice.organization_id),
        "invoice",
        invoice.id,
        ActivityAction::Updated,
        Some(ctx.user_id),
        Some(format!("Invoice #{} voided", invoice.invoice_number)),
        json!({ "status": invoice.status.as_str() }),
    ));

    Ok(Json(invoice))
}
