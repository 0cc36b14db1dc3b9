//! Asynchronous audit trail writer

mod logger;

pub use logger::{ActivityLogger, LoggerConfig};
