pub mod dashboard;
pub mod health;
pub mod records;

pub use dashboard::{dashboard, report};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use records::{
    create_record, delete_record, get_record, list_records, meta, search_records, update_record,
};
