//! Outgoing mail adapters

mod smtp_mailer;

pub use smtp_mailer::SmtpInvoiceMailer;
