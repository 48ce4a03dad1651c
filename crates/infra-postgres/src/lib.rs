// Phase Job Queue Infrastructure - PostgreSQL Adapter
// Implements: Notifier (metadata store stored functions)

mod connection;
mod notifier;

pub use connection::{connect_notifier, create_pool, PgStoreConfig};
pub use notifier::PgNotifier;

// Note: sqlx::Error is described by a helper in `notifier` rather than converted
// into AppError, since notifier failures are logged and never propagated
