//! # WFM Infrastructure
//!
//! PostgreSQL adapters, the SMTP invoice mailer, and the async activity
//! logger.

pub mod activity;
pub mod database;
pub mod email;

pub use activity::{ActivityLogger, LoggerConfig};
pub use database::{
    create_pool, PgActivityLogRepository, PgCountryRepository, PgEmployeeRepository,
    PgExpenseRepository, PgInvoiceRepository, PgNotificationRepository, PgOrganizationRepository,
    PgTagRepository, PgTeamRepository, PgTenantRepository, PgUserRepository, MIGRATOR,
};
pub use email::SmtpInvoiceMailer;
