//! Employee repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::Employee;
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub organization_id: Option<Uuid>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Employee>, DomainError>;

    /// Resolve candidate ids against the organization. Ids that do not exist
    /// there are simply absent from the result.
    async fn find_by_ids(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Employee>, DomainError>;

    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError>;
    async fn update(&self, employee: &Employee) -> Result<Employee, DomainError>;
    async fn soft_delete(&self, tenant_id: &Uuid, organization_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;
    async fn restore(&self, tenant_id: &Uuid, organization_id: &Uuid, id: &Uuid) -> Result<Employee, DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: EmployeeFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError>;

    /// Employees active at any point of the date range.
    async fn find_working(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError>;
}
