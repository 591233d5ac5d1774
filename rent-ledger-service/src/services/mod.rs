pub mod aggregation;
pub mod database;
pub mod metrics;
pub mod store;

pub use database::{MongoDb, MongoLedgerStore};
pub use self::metrics::{get_metrics, init_metrics, record_status_tiers, record_write};
pub use store::{InMemoryLedgerStore, LedgerStore, StoreError};
