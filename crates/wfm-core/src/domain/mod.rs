//! Domain entities for the workforce management API.

pub mod activity;
pub mod country;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod notification;
pub mod organization;
pub mod tag;
pub mod team;
pub mod tenant;
pub mod user;

pub use activity::{ActivityAction, ActivityLog};
pub use country::Country;
pub use employee::Employee;
pub use expense::Expense;
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus, TaxDiscountType};
pub use notification::{EmployeeNotification, NotificationKind, NotificationSetting};
pub use organization::Organization;
pub use tag::Tag;
pub use team::{OrganizationTeam, TeamMember};
pub use tenant::Tenant;
pub use user::{Role, User};
