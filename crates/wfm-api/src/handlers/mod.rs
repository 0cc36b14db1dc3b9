//! Request handlers, grouped by resource

pub mod activity_logs;
pub mod auth;
pub mod countries;
pub mod employees;
pub mod expenses;
pub mod health;
pub mod invoices;
pub mod notifications;
pub mod organizations;
pub mod tags;
pub mod teams;
pub mod tenants;
pub mod users;
