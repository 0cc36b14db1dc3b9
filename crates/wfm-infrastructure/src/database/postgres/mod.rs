//! PostgreSQL repository implementations

pub mod activity_repo_impl;
pub mod country_repo_impl;
pub mod employee_repo_impl;
pub mod expense_repo_impl;
pub mod invoice_repo_impl;
pub mod notification_repo_impl;
pub mod organization_repo_impl;
pub mod tag_repo_impl;
pub mod team_repo_impl;
pub mod tenant_repo_impl;
pub mod user_repo_impl;

pub use activity_repo_impl::PgActivityLogRepository;
pub use country_repo_impl::PgCountryRepository;
pub use employee_repo_impl::PgEmployeeRepository;
pub use expense_repo_impl::PgExpenseRepository;
pub use invoice_repo_impl::PgInvoiceRepository;
pub use notification_repo_impl::PgNotificationRepository;
pub use organization_repo_impl::PgOrganizationRepository;
pub use tag_repo_impl::PgTagRepository;
pub use team_repo_impl::PgTeamRepository;
pub use tenant_repo_impl::PgTenantRepository;
pub use user_repo_impl::PgUserRepository;
