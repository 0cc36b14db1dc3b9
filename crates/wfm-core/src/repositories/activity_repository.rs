//! Activity log repository trait (port)
//!
//! Read side only. Writes go through the asynchronous activity logger,
//! which batches inserts off the request path.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ActivityAction, ActivityLog};
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub organization_id: Option<Uuid>,
    pub entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub action: Option<ActivityAction>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: ActivityFilter,
        pagination: Pagination,
    ) -> Result<Paginated<ActivityLog>, DomainError>;
}
