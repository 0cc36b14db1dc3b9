//! Employee domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Employee {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    /// Login account, when the employee has one.
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name too long"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub started_work_on: Option<NaiveDate>,
    pub ended_work_on: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "Bill rate cannot be negative"))]
    pub bill_rate_value: f64,
    pub bill_rate_currency: String,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Employee {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        user_id: Option<Uuid>,
        first_name: String,
        last_name: String,
        email: String,
        started_work_on: Option<NaiveDate>,
        bill_rate_value: f64,
        bill_rate_currency: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let employee = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            user_id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            started_work_on,
            ended_work_on: None,
            bill_rate_value,
            bill_rate_currency: bill_rate_currency.trim().to_uppercase(),
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        employee.validate()?;
        Ok(employee)
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Whether the employee counts as working at any point of the date range.
    /// Mirrors the working-employee list query: started before the range
    /// ends, and either still employed or ended after the range starts.
    pub fn works_within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        if !self.is_active || self.is_archived || self.deleted_at.is_some() {
            return false;
        }
        let started = match self.started_work_on {
            Some(d) => d <= to,
            None => false,
        };
        let not_ended = match self.ended_work_on {
            Some(d) => d >= from,
            None => true,
        };
        started && not_ended
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(started: Option<NaiveDate>, ended: Option<NaiveDate>) -> Employee {
        let mut e = Employee::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            "Ruslan".to_string(),
            "K".to_string(),
            "ruslan@example.com".to_string(),
            started,
            50.0,
            "USD".to_string(),
        )
        .unwrap();
        e.ended_work_on = ended;
        e
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn works_within_open_ended_employment() {
        let e = employee(Some(d("2024-01-01")), None);
        assert!(e.works_within(d("2024-06-01"), d("2024-06-30")));
    }

    #[test]
    fn works_within_excludes_future_hires() {
        let e = employee(Some(d("2025-01-01")), None);
        assert!(!e.works_within(d("2024-06-01"), d("2024-06-30")));
    }

    #[test]
    fn works_within_excludes_ended_before_range() {
        let e = employee(Some(d("2023-01-01")), Some(d("2024-01-31")));
        assert!(!e.works_within(d("2024-06-01"), d("2024-06-30")));
        // Ending inside the range still counts.
        assert!(e.works_within(d("2024-01-15"), d("2024-02-15")));
    }

    #[test]
    fn works_within_requires_start_date() {
        let e = employee(None, None);
        assert!(!e.works_within(d("2024-06-01"), d("2024-06-30")));
    }
}
