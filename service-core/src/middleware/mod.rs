pub mod metrics;
pub mod request_id;

pub use self::metrics::metrics_middleware;
pub use self::request_id::{REQUEST_ID_HEADER, request_id_middleware};
