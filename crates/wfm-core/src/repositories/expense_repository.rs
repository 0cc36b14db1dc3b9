//! Expense repository trait (port)

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Expense;
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

/// List filter. `None` means no constraint.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub organization_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub category: Option<String>,
}

/// Tenant-wide aggregate over non-deleted expenses.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseStats {
    pub count: i64,
    pub total_sum: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<Expense>, DomainError>;
    async fn create(&self, expense: &Expense) -> Result<Expense, DomainError>;
    async fn update(&self, expense: &Expense) -> Result<Expense, DomainError>;
    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: ExpenseFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Expense>, DomainError>;

    async fn stats(&self, tenant_id: &Uuid) -> Result<ExpenseStats, DomainError>;
}
