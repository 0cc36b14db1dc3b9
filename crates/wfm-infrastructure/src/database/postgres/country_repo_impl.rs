// ============================================================================
// WFM Infrastructure - PostgreSQL Country Repository
// File: crates/wfm-infrastructure/src/database/postgres/country_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use wfm_core::domain::Country;
use wfm_core::error::DomainError;
use wfm_core::repositories::CountryRepository;
use wfm_shared::{Paginated, Pagination};

pub struct PgCountryRepository {
    pool: PgPool,
}

impl PgCountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct CountryRow {
    pub id: Uuid,
    pub iso_code: String,
    pub country: String,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Country {
            id: row.id,
            iso_code: row.iso_code,
            country: row.country,
        }
    }
}

#[async_trait]
impl CountryRepository for PgCountryRepository {
    async fn list(&self, pagination: Pagination) -> Result<Paginated<Country>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error counting countries: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        let rows: Vec<CountryRow> = sqlx::query_as(
            r#"
            SELECT id, iso_code, country
            FROM countries
            ORDER BY country
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing countries: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }
}
