//! Domain services (business logic)

pub mod auth_service;
pub mod employee_service;
pub mod invoice_service;
pub mod notification_service;
pub mod team_service;
pub mod tenant_service;

pub use auth_service::{AuthService, LoginResult, UserInfo};
pub use employee_service::{CreateEmployeeInput, EmployeeService, UpdateEmployeeInput};
pub use invoice_service::{
    compute_totals, Actor, CreateInvoiceInput, InvoiceItemInput, InvoiceService, InvoiceTotals,
    TaxDiscountPolicy, UpdateInvoiceInput,
};
pub use notification_service::{NotificationService, NotifyInput, UpdateSettingsInput};
pub use team_service::{plan_members, MembershipPlan, TeamService, UpdateTeamInput};
pub use tenant_service::{RegisterResult, TenantService};
