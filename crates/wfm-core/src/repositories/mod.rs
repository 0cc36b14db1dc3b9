//! Repository traits (ports)

pub mod activity_repository;
pub mod country_repository;
pub mod employee_repository;
pub mod expense_repository;
pub mod invoice_repository;
pub mod notification_repository;
pub mod organization_repository;
pub mod tag_repository;
pub mod team_repository;
pub mod tenant_repository;
pub mod user_repository;

pub use activity_repository::{ActivityFilter, ActivityLogRepository};
pub use country_repository::CountryRepository;
pub use employee_repository::{EmployeeFilter, EmployeeRepository};
pub use expense_repository::{ExpenseFilter, ExpenseRepository, ExpenseStats};
pub use invoice_repository::{InvoiceFilter, InvoiceRepository, InvoiceStats};
pub use notification_repository::{NotificationFilter, NotificationRepository};
pub use organization_repository::OrganizationRepository;
pub use tag_repository::{TagFilter, TagRepository};
pub use team_repository::TeamRepository;
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;
