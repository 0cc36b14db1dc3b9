// ============================================================================
// WFM API - Application State
// File: crates/wfm-api/src/state.rs
// Description: Wires repositories, services, and shared plumbing for axum
// ============================================================================

use std::sync::Arc;

use sqlx::PgPool;

use wfm_core::services::{
    AuthService, EmployeeService, InvoiceService, NotificationService, TeamService, TenantService,
};
use wfm_infrastructure::{
    ActivityLogger, LoggerConfig, PgActivityLogRepository, PgCountryRepository,
    PgEmployeeRepository, PgExpenseRepository, PgInvoiceRepository, PgNotificationRepository,
    PgOrganizationRepository, PgTagRepository, PgTeamRepository, PgTenantRepository,
    PgUserRepository, SmtpInvoiceMailer,
};
use wfm_security::JwtService;
use wfm_shared::config::AppConfig;
use wfm_shared::constants::LOGIN_ATTEMPTS_PER_MINUTE;

use crate::middleware::rate_limit::LoginRateLimiter;

pub type SharedAuthService = Arc<AuthService<PgUserRepository>>;
pub type SharedTenantService =
    Arc<TenantService<PgTenantRepository, PgOrganizationRepository, PgUserRepository>>;
pub type SharedEmployeeService = Arc<EmployeeService<PgEmployeeRepository, PgOrganizationRepository>>;
pub type SharedTeamService = Arc<TeamService<PgTeamRepository, PgEmployeeRepository>>;
pub type SharedInvoiceService =
    Arc<InvoiceService<PgInvoiceRepository, PgOrganizationRepository, SmtpInvoiceMailer>>;
pub type SharedNotificationService =
    Arc<NotificationService<PgNotificationRepository, PgEmployeeRepository>>;

/// Everything a request handler can reach. Cheap to clone; heavy parts are
/// behind `Arc` or are pools already.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: Arc<JwtService>,
    pub activity: ActivityLogger,
    pub login_limiter: Arc<LoginRateLimiter>,

    pub auth_service: SharedAuthService,
    pub tenant_service: SharedTenantService,
    pub employee_service: SharedEmployeeService,
    pub team_service: SharedTeamService,
    pub invoice_service: SharedInvoiceService,
    pub notification_service: SharedNotificationService,

    // Plain CRUD goes straight at the repositories.
    pub organization_repo: Arc<PgOrganizationRepository>,
    pub expense_repo: Arc<PgExpenseRepository>,
    pub tag_repo: Arc<PgTagRepository>,
    pub country_repo: Arc<PgCountryRepository>,
    pub user_repo: Arc<PgUserRepository>,
    pub activity_repo: Arc<PgActivityLogRepository>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig, mailer: SmtpInvoiceMailer) -> Self {
        let tenant_repo = Arc::new(PgTenantRepository::new(pool.clone()));
        let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
        let organization_repo = Arc::new(PgOrganizationRepository::new(pool.clone()));
        let employee_repo = Arc::new(PgEmployeeRepository::new(pool.clone()));
        let team_repo = Arc::new(PgTeamRepository::new(pool.clone()));
        let invoice_repo = Arc::new(PgInvoiceRepository::new(pool.clone()));
        let expense_repo = Arc::new(PgExpenseRepository::new(pool.clone()));
        let tag_repo = Arc::new(PgTagRepository::new(pool.clone()));
        let country_repo = Arc::new(PgCountryRepository::new(pool.clone()));
        let notification_repo = Arc::new(PgNotificationRepository::new(pool.clone()));
        let activity_repo = Arc::new(PgActivityLogRepository::new(pool.clone()));

        let jwt = Arc::new(JwtService::new(
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        ));

        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        ));
        let tenant_service = Arc::new(TenantService::new(
            tenant_repo,
            organization_repo.clone(),
            user_repo.clone(),
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        ));
        let employee_service = Arc::new(EmployeeService::new(
            employee_repo.clone(),
            organization_repo.clone(),
        ));
        let team_service = Arc::new(TeamService::new(team_repo, employee_repo.clone()));
        let invoice_service = Arc::new(InvoiceService::new(
            invoice_repo,
            organization_repo.clone(),
            Arc::new(mailer),
            config.jwt.secret.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            notification_repo,
            employee_repo,
        ));

        let activity = ActivityLogger::new(pool.clone(), LoggerConfig::default());
        let login_limiter = Arc::new(LoginRateLimiter::new(LOGIN_ATTEMPTS_PER_MINUTE));

        Self {
            pool,
            jwt,
            activity,
            login_limiter,
            auth_service,
            tenant_service,
            employee_service,
            team_service,
            invoice_service,
            notification_service,
            organization_repo,
            expense_repo,
            tag_repo,
            country_repo,
            user_repo,
            activity_repo,
        }
    }
}
