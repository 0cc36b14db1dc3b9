//! Tag repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Tag;
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    pub organization_id: Option<Uuid>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Tag>, DomainError>;
    async fn create(&self, tag: &Tag) -> Result<Tag, DomainError>;
    async fn update(&self, tag: &Tag) -> Result<Tag, DomainError>;
    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: TagFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Tag>, DomainError>;
}
