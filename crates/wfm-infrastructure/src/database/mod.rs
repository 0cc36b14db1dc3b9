//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

pub use connection::create_pool;
pub use postgres::{
    PgActivityLogRepository, PgCountryRepository, PgEmployeeRepository, PgExpenseRepository,
    PgInvoiceRepository, PgNotificationRepository, PgOrganizationRepository, PgTagRepository,
    PgTeamRepository, PgTenantRepository, PgUserRepository,
};

/// Schema migrations, embedded at compile time and applied at boot.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
