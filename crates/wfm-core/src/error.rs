//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not active")]
    UserNotActive,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Employee not found")]
    EmployeeNotFound,

    #[error("Team not found")]
    TeamNotFound,

    #[error("Invoice not found")]
    InvoiceNotFound,

    #[error("Expense not found")]
    ExpenseNotFound,

    #[error("Tag not found")]
    TagNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid invoice token")]
    InvalidInvoiceToken,

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email send error: {0}")]
    EmailSendError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
