// Phase Job Queue Core - Domain Logic, Ports & Worker Pool
// NO infrastructure dependencies (database, HTTP and executors live in adapter crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
