//! Country reference data

use axum::{
    extract::{Query, State},
    Json,
};

use wfm_core::domain::Country;
use wfm_core::repositories::CountryRepository;
use wfm_shared::{Paginated, Pagination};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/v1/countries` lists the seeded reference table, ordered by name.
pub async fn list_countries(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Country>>, ApiError> {
    let page = state.country_repo.list(pagination).await?;
    Ok(Json(page))
}
