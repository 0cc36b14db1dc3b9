//! Employee notification repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{EmployeeNotification, NotificationSetting};
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None`/`false` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub receiver_id: Option<Uuid>,
    pub unread_only: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<Option<EmployeeNotification>, DomainError>;

    async fn create(
        &self,
        notification: &EmployeeNotification,
    ) -> Result<EmployeeNotification, DomainError>;

    async fn update(
        &self,
        notification: &EmployeeNotification,
    ) -> Result<EmployeeNotification, DomainError>;

    /// Returns the number of rows flipped to read.
    async fn mark_all_read(&self, tenant_id: &Uuid, receiver_id: &Uuid) -> Result<u64, DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: NotificationFilter,
        pagination: Pagination,
    ) -> Result<Paginated<EmployeeNotification>, DomainError>;

    async fn settings_for_employee(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
    ) -> Result<Option<NotificationSetting>, DomainError>;

    async fn create_settings(
        &self,
        settings: &NotificationSetting,
    ) -> Result<NotificationSetting, DomainError>;

    async fn update_settings(
        &self,
        settings: &NotificationSetting,
    ) -> Result<NotificationSetting, DomainError>;
}
