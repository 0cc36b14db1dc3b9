//! Expense domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Expense {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    /// Missing for organization-level expenses.
    pub employee_id: Option<Uuid>,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,

    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,

    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub value_date: NaiveDate,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        employee_id: Option<Uuid>,
        amount: f64,
        currency: String,
        category: String,
        purpose: Option<String>,
        value_date: NaiveDate,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let expense = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            employee_id,
            amount,
            currency: currency.trim().to_uppercase(),
            category: category.trim().to_string(),
            purpose,
            notes: None,
            value_date,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        expense.validate()?;
        Ok(expense)
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_expense_rejects_negative_amount() {
        let expense = Expense::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            -10.0,
            "USD".to_string(),
            "Travel".to_string(),
            None,
            Utc::now().date_naive(),
        );
        assert!(expense.is_err());
    }
}
