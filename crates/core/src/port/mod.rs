// Port Layer - Interfaces for external collaborators

pub mod executor;
pub mod notifier;
pub mod time_provider;

// Re-exports
pub use executor::{ExecutionError, ExecutionResult, ExecutionStatus, Executor};
pub use notifier::{Notifier, NoopNotifier, JOB_QUEUE_ACTOR};
pub use time_provider::TimeProvider;
