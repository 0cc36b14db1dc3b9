//! Country repository trait (port)

use async_trait::async_trait;

use crate::domain::Country;
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// Reference data, ordered by name. Not tenant-scoped.
    async fn list(&self, pagination: Pagination) -> Result<Paginated<Country>, DomainError>;
}
