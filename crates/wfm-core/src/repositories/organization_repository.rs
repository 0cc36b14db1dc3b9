//! Organization repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Organization;
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Organization>, DomainError>;
    async fn find_by_profile_link(
        &self,
        tenant_id: &Uuid,
        profile_link: &str,
    ) -> Result<Option<Organization>, DomainError>;
    async fn create(&self, organization: &Organization) -> Result<Organization, DomainError>;
    async fn update(&self, organization: &Organization) -> Result<Organization, DomainError>;
    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;
    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Paginated<Organization>, DomainError>;
}
